use ninterp::error::InterpolateError;
use thiserror::Error;

use crate::aero;
use crate::model::TurbineModel;
use crate::wind::WindSignal;

/// Immutable per-run bundle the equation of motion closes over: the
/// structural model, the wind signal, and the thrust coefficient held
/// constant for the whole record.
///
/// The Ct value is selected once from the record's mean wind speed, not
/// re-evaluated per timestep; this matches the reference model and changing
/// it would change the simulated response.
pub struct ForcingContext<'a> {
    pub model: &'a TurbineModel,
    pub wind: &'a WindSignal,
    pub ct: f64,
}

/// Failure while evaluating the state derivative.
#[derive(Debug, Error)]
pub enum DynamicsError {
    #[error("wind speed evaluation failed at t = {t}")]
    Wind {
        t: f64,
        #[source]
        source: InterpolateError,
    },

    #[error("wind speed is not finite at t = {t}")]
    NonFiniteWind { t: f64 },
}

impl ForcingContext<'_> {
    /// Aerodynamic thrust on the rotor DOF at time `t` for a given blade
    /// velocity. A malformed wind signal surfaces here instead of being
    /// clamped to something plausible.
    pub fn thrust(&self, t: f64, blade_velocity: f64) -> Result<f64, DynamicsError> {
        let u = self
            .wind
            .speed(t)
            .map_err(|source| DynamicsError::Wind { t, source })?;
        if !u.is_finite() {
            return Err(DynamicsError::NonFiniteWind { t });
        }
        let u_rel = u - blade_velocity;
        Ok(aero::thrust_force(
            self.model.air_density(),
            self.ct,
            self.model.rotor_area(),
            u_rel,
        ))
    }

    /// State derivative of `[x1, x2, x1_dot, x2_dot]`.
    ///
    /// Pure in `(t, y)`: adaptive solvers call this at repeated and
    /// non-monotonic times during step-size search and error estimation.
    pub fn derivative(&self, t: f64, y: &[f64; 4]) -> Result<[f64; 4], DynamicsError> {
        let f1 = self.thrust(t, y[2])?;

        let a = self.model.state_matrix();
        let mut dy = [0.; 4];
        for (i, dyi) in dy.iter_mut().enumerate() {
            *dyi = (0..4).map(|j| a[(i, j)] * y[j]).sum();
        }

        // Thrust acts on the blades only; F = [f1, 0] mapped through M^-1.
        let m_inv = self.model.mass_inverse();
        dy[2] += m_inv[(0, 0)] * f1;
        dy[3] += m_inv[(1, 0)] * f1;
        Ok(dy)
    }
}
