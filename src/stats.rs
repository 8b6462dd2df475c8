use crate::solver::Trajectory;
use crate::wind::WindRecord;

/// Mean and population standard deviation of a sampled signal.
///
/// Both fields are NaN for an empty slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStats {
    pub mean: f64,
    pub std_dev: f64,
}

pub fn signal_stats(values: &[f64]) -> SignalStats {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    SignalStats {
        mean,
        std_dev: variance.sqrt(),
    }
}

/// Fatigue-relevant summary of one simulated record: the wind climate it
/// was driven by and the displacement statistics over the trajectory tail.
#[derive(Debug, Clone, Copy)]
pub struct ResponseStats {
    pub mean_wind_speed: f64,
    pub turbulence_intensity: f64,
    pub blade_relative: SignalStats,
    pub tower: SignalStats,
}

/// Summarizes a trajectory, discarding the start-up transient: only samples
/// at `t >= t_start + transient_skip` enter the statistics. The customary
/// skip for production records is 60 time units; 0 keeps everything.
pub fn response_stats(
    record: &WindRecord,
    trajectory: &Trajectory,
    transient_skip: f64,
) -> ResponseStats {
    let threshold = trajectory.time.first().copied().unwrap_or(0.) + transient_skip;
    let first_kept = trajectory.time.partition_point(|&t| t < threshold);

    let relative = trajectory.blade_relative();
    ResponseStats {
        mean_wind_speed: record.mean_speed(),
        turbulence_intensity: record.turbulence_intensity(),
        blade_relative: signal_stats(&relative[first_kept..]),
        tower: signal_stats(&trajectory.tower_position[first_kept..]),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn stats_match_hand_computed_values() {
        let s = signal_stats(&[1., 2., 3., 4.]);
        assert_relative_eq!(s.mean, 2.5);
        // variance = (2.25 + 0.25 + 0.25 + 2.25) / 4 = 1.25
        assert_relative_eq!(s.std_dev, 1.25_f64.sqrt());
    }

    #[test]
    fn constant_signal_has_zero_deviation() {
        let s = signal_stats(&[7., 7., 7.]);
        assert_relative_eq!(s.mean, 7.);
        assert_relative_eq!(s.std_dev, 0.);
    }

    #[test]
    fn transient_skip_drops_the_leading_samples() {
        let record = WindRecord::new(vec![0., 1., 2., 3.], vec![8., 8., 8., 8.]).unwrap();
        let trajectory = Trajectory {
            time: vec![0., 1., 2., 3.],
            blade_position: vec![100., 100., 2., 4.],
            tower_position: vec![0., 0., 1., 1.],
            blade_velocity: vec![0.; 4],
            tower_velocity: vec![0.; 4],
        };

        let stats = response_stats(&record, &trajectory, 2.);
        // Only t = 2 and t = 3 remain: relative displacement 1 and 3.
        assert_relative_eq!(stats.blade_relative.mean, 2.);
        assert_relative_eq!(stats.blade_relative.std_dev, 1.);
        assert_relative_eq!(stats.tower.mean, 1.);
        assert_relative_eq!(stats.mean_wind_speed, 8.);
    }
}
