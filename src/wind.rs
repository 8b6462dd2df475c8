use crate::error::InvalidInputError;
use crate::interp::{Extrapolate, LinearSeries};
use ninterp::error::InterpolateError;

/// Discretely sampled wind-speed record with strictly increasing time.
#[derive(Debug, Clone)]
pub struct WindRecord {
    time: Vec<f64>,
    speed: Vec<f64>,
}

impl WindRecord {
    pub fn new(time: Vec<f64>, speed: Vec<f64>) -> Result<Self, InvalidInputError> {
        if time.len() != speed.len() {
            return Err(InvalidInputError::ColumnLengthMismatch {
                table: "wind record",
                left: time.len(),
                right: speed.len(),
            });
        }
        if time.len() < 2 {
            return Err(InvalidInputError::TooFewRows {
                table: "wind record",
                rows: time.len(),
            });
        }
        if let Some(row) = (1..time.len()).find(|&i| time[i] <= time[i - 1]) {
            return Err(InvalidInputError::NotStrictlyIncreasing {
                column: "time",
                row,
            });
        }
        Ok(Self { time, speed })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        false // construction requires at least 2 samples
    }

    pub fn times(&self) -> &[f64] {
        &self.time
    }

    pub fn speeds(&self) -> &[f64] {
        &self.speed
    }

    pub fn start_time(&self) -> f64 {
        self.time[0]
    }

    pub fn end_time(&self) -> f64 {
        self.time[self.time.len() - 1]
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    pub fn mean_speed(&self) -> f64 {
        self.speed.iter().sum::<f64>() / self.speed.len() as f64
    }

    /// Turbulence intensity, std(u)/mean(u) with the population deviation.
    pub fn turbulence_intensity(&self) -> f64 {
        let mean = self.mean_speed();
        let variance =
            self.speed.iter().map(|u| (u - mean) * (u - mean)).sum::<f64>() / self.speed.len() as f64;
        variance.sqrt() / mean
    }
}

/// Continuous-time wind speed u(t) built from a record by linear
/// interpolation.
///
/// Queries beyond the record's span extend the nearest edge segment's slope,
/// so the forcing stays defined when the adaptive solver probes slightly
/// outside the nominal interval. Evaluation is stateless; query times may
/// repeat or go backwards.
pub struct WindSignal {
    series: LinearSeries,
}

impl WindSignal {
    pub fn new(record: &WindRecord) -> Result<Self, InvalidInputError> {
        let series = LinearSeries::new(
            record.time.clone(),
            record.speed.clone(),
            Extrapolate::Enable,
        )?;
        Ok(Self { series })
    }

    pub fn speed(&self, t: f64) -> Result<f64, InterpolateError> {
        self.series.eval(t)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn record_statistics() {
        let record = WindRecord::new(vec![0., 1., 2., 3.], vec![6., 8., 10., 8.]).unwrap();
        assert_eq!(record.len(), 4);
        assert_relative_eq!(record.mean_speed(), 8.);
        assert_relative_eq!(record.duration(), 3.);
        // std = sqrt((4 + 0 + 4 + 0) / 4) = sqrt(2)
        assert_relative_eq!(record.turbulence_intensity(), 2.0_f64.sqrt() / 8.);
    }

    #[test]
    fn record_validation() {
        assert!(matches!(
            WindRecord::new(vec![0., 1.], vec![5.]),
            Err(InvalidInputError::ColumnLengthMismatch { .. })
        ));
        assert!(matches!(
            WindRecord::new(vec![0.], vec![5.]),
            Err(InvalidInputError::TooFewRows { .. })
        ));
        assert!(matches!(
            WindRecord::new(vec![0., 2., 2.], vec![5., 6., 7.]),
            Err(InvalidInputError::NotStrictlyIncreasing { column: "time", row: 2 })
        ));
    }

    #[test]
    fn interpolates_and_extrapolates_the_record() {
        let record = WindRecord::new(vec![0., 1., 2.], vec![5., 6., 7.]).unwrap();
        let signal = WindSignal::new(&record).unwrap();

        struct Case {
            t: f64,
            speed_exp: f64,
        }

        let test_cases = vec![
            // At the knots
            Case { t: 0.0, speed_exp: 5.0 },
            Case { t: 2.0, speed_exp: 7.0 },
            // Between samples
            Case { t: 0.5, speed_exp: 5.5 },
            // One unit beyond each edge, following the edge segment's slope
            Case { t: 3.0, speed_exp: 8.0 },
            Case { t: -1.0, speed_exp: 4.0 },
        ];

        for case in test_cases {
            assert_relative_eq!(signal.speed(case.t).unwrap(), case.speed_exp, epsilon = 1e-12);
        }
    }

    #[test]
    fn queries_are_side_effect_free() {
        let record = WindRecord::new(vec![0., 1., 2.], vec![5., 6., 7.]).unwrap();
        let signal = WindSignal::new(&record).unwrap();

        // Out-of-order and repeated queries must agree with themselves.
        let first = signal.speed(1.3).unwrap();
        let _ = signal.speed(0.2).unwrap();
        let _ = signal.speed(1.9).unwrap();
        assert_eq!(signal.speed(1.3).unwrap(), first);
    }
}
