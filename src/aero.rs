use crate::error::{DomainError, InvalidInputError};
use crate::interp::{Extrapolate, LinearSeries};

/// Thrust-coefficient curve Ct(wsp) built once from a lookup table.
///
/// The table's wind-speed column must be strictly increasing with at least
/// two rows. The production simulation path uses [`CtCurve::new`], which
/// extends the edge segments linearly beyond the table; [`CtCurve::clamped`]
/// and [`CtCurve::strict`] are the distinctly named alternate policies.
pub struct CtCurve {
    series: LinearSeries,
}

impl CtCurve {
    /// Extrapolating curve: queries beyond the table follow the nearest
    /// segment's slope.
    pub fn new(wind_speed: Vec<f64>, ct: Vec<f64>) -> Result<Self, InvalidInputError> {
        Self::with_policy(wind_speed, ct, Extrapolate::Enable)
    }

    /// Clamping curve: queries beyond the table hold the edge Ct value.
    /// Exploratory use only; not the reference behavior.
    pub fn clamped(wind_speed: Vec<f64>, ct: Vec<f64>) -> Result<Self, InvalidInputError> {
        Self::with_policy(wind_speed, ct, Extrapolate::Clamp)
    }

    /// Strict curve: queries beyond the table fail with a [`DomainError`].
    pub fn strict(wind_speed: Vec<f64>, ct: Vec<f64>) -> Result<Self, InvalidInputError> {
        Self::with_policy(wind_speed, ct, Extrapolate::Error)
    }

    fn with_policy(
        wind_speed: Vec<f64>,
        ct: Vec<f64>,
        extrapolate: Extrapolate<f64>,
    ) -> Result<Self, InvalidInputError> {
        if wind_speed.len() != ct.len() {
            return Err(InvalidInputError::ColumnLengthMismatch {
                table: "thrust coefficient",
                left: wind_speed.len(),
                right: ct.len(),
            });
        }
        if wind_speed.len() < 2 {
            return Err(InvalidInputError::TooFewRows {
                table: "thrust coefficient",
                rows: wind_speed.len(),
            });
        }
        if let Some(row) = (1..wind_speed.len()).find(|&i| wind_speed[i] <= wind_speed[i - 1]) {
            return Err(InvalidInputError::NotStrictlyIncreasing {
                column: "wind speed",
                row,
            });
        }
        let series = LinearSeries::new(wind_speed, ct, extrapolate)?;
        Ok(Self { series })
    }

    /// Thrust coefficient at a single wind speed.
    pub fn ct(&self, wind_speed: f64) -> Result<f64, DomainError> {
        self.series.eval(wind_speed).map_err(|source| DomainError {
            value: wind_speed,
            source,
        })
    }

    /// Thrust coefficients for a batch of wind speeds.
    pub fn ct_many(&self, wind_speeds: &[f64]) -> Result<Vec<f64>, DomainError> {
        wind_speeds.iter().map(|&wsp| self.ct(wsp)).collect()
    }
}

/// Quadratic-drag thrust, sign-preserving in the relative velocity.
///
/// `u_rel * |u_rel|` rather than `u_rel^2`, so the force reverses with the
/// relative flow instead of always pushing downwind.
pub fn thrust_force(air_density: f64, ct: f64, rotor_area: f64, u_rel: f64) -> f64 {
    0.5 * air_density * ct * rotor_area * u_rel * u_rel.abs()
}
