use std::{cell::RefCell, rc::Rc};

use itertools::izip;
use ode_solvers::{dop_shared::IntegrationError, Dopri5, SVector, System};
use thiserror::Error;

use crate::dynamics::{DynamicsError, ForcingContext};

/// Simulation state `[x1, x2, x1_dot, x2_dot]`.
pub type StateVector = SVector<f64, 4>;

/// Integration span, output grid, and error-control tolerances.
///
/// The trajectory is sampled on the fixed grid `t_start + k * dt_out`
/// (every point not beyond `t_end`), independent of the solver's internal
/// adaptive step sequence.
#[derive(Debug, Clone, Copy)]
pub struct SolverParameters {
    pub t_start: f64,
    pub t_end: f64,
    pub dt_out: f64,
    pub rel_tol: f64,
    pub abs_tol: f64,
}

impl SolverParameters {
    pub fn new(t_start: f64, t_end: f64) -> Self {
        Self {
            t_start,
            t_end,
            dt_out: 0.01,
            rel_tol: 1e-3,
            abs_tol: 1e-6,
        }
    }

    pub fn with_output_step(mut self, dt_out: f64) -> Self {
        self.dt_out = dt_out;
        self
    }

    pub fn with_tolerances(mut self, rel_tol: f64, abs_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self.abs_tol = abs_tol;
        self
    }
}

/// Sampled response on the output grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub blade_position: Vec<f64>,
    pub tower_position: Vec<f64>,
    pub blade_velocity: Vec<f64>,
    pub tower_velocity: Vec<f64>,
}

impl Trajectory {
    fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            blade_position: Vec::with_capacity(n),
            tower_position: Vec::with_capacity(n),
            blade_velocity: Vec::with_capacity(n),
            tower_velocity: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, t: f64, y: &StateVector) {
        self.time.push(t);
        self.blade_position.push(y[0]);
        self.tower_position.push(y[1]);
        self.blade_velocity.push(y[2]);
        self.tower_velocity.push(y[3]);
    }

    fn truncate(&mut self, n: usize) {
        self.time.truncate(n);
        self.blade_position.truncate(n);
        self.tower_position.truncate(n);
        self.blade_velocity.truncate(n);
        self.tower_velocity.truncate(n);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Blade displacement relative to the tower top, x1 - x2.
    pub fn blade_relative(&self) -> Vec<f64> {
        izip!(&self.blade_position, &self.tower_position)
            .map(|(x1, x2)| x1 - x2)
            .collect()
    }
}

/// Integration failure. The wrapped solver error carries the last time the
/// stepper successfully reached; derivative failures carry the failing time.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("integration span is empty: t_end {t_end} must exceed t_start {t_start}")]
    EmptySpan { t_start: f64, t_end: f64 },

    #[error("output step must be positive and finite, found {dt_out}")]
    BadOutputStep { dt_out: f64 },

    #[error(transparent)]
    Integration(#[from] IntegrationError),

    #[error("derivative evaluation failed")]
    Derivative {
        #[source]
        source: DynamicsError,
    },
}

/// Adapts the forcing context to the stepper's system trait, capturing the
/// first derivative failure so it can be reported after integration stops.
struct OdeAdapter<'a> {
    context: &'a ForcingContext<'a>,
    failure: Rc<RefCell<Option<DynamicsError>>>,
}

impl System<f64, StateVector> for OdeAdapter<'_> {
    fn system(&self, t: f64, y: &StateVector, dy: &mut StateVector) {
        match self.context.derivative(t, &[y[0], y[1], y[2], y[3]]) {
            Ok(d) => {
                for (i, di) in d.iter().enumerate() {
                    dy[i] = *di;
                }
            }
            Err(e) => {
                if self.failure.borrow().is_none() {
                    *self.failure.borrow_mut() = Some(e);
                }
                *dy = StateVector::from_element(f64::NAN);
            }
        }
    }

    fn solout(&mut self, _t: f64, _y: &StateVector, _dy: &StateVector) -> bool {
        // Stop stepping once a derivative evaluation has failed.
        self.failure.borrow().is_some()
    }
}

/// Integrates the equation of motion with an adaptive Dormand-Prince 5(4)
/// stepper, sampling dense output on the fixed grid of `parameters`.
pub fn simulate(
    context: &ForcingContext,
    parameters: &SolverParameters,
    initial_state: StateVector,
) -> Result<Trajectory, SolverError> {
    if !(parameters.t_end > parameters.t_start) {
        return Err(SolverError::EmptySpan {
            t_start: parameters.t_start,
            t_end: parameters.t_end,
        });
    }
    if !(parameters.dt_out > 0.) || !parameters.dt_out.is_finite() {
        return Err(SolverError::BadOutputStep {
            dt_out: parameters.dt_out,
        });
    }

    let failure = Rc::new(RefCell::new(None));
    let system = OdeAdapter {
        context,
        failure: Rc::clone(&failure),
    };

    let mut stepper = Dopri5::new(
        system,
        parameters.t_start,
        parameters.t_end,
        parameters.dt_out,
        initial_state,
        parameters.rel_tol,
        parameters.abs_tol,
    );
    let result = stepper.integrate();

    if let Some(source) = failure.borrow_mut().take() {
        return Err(SolverError::Derivative { source });
    }
    result?;

    let mut trajectory = Trajectory::with_capacity(stepper.x_out().len());
    for (t, y) in stepper.x_out().iter().zip(stepper.y_out()) {
        trajectory.push(*t, y);
    }

    // The stepper records the span endpoint as a final sample when it falls
    // off the grid; the trajectory contract is grid samples only.
    let span = parameters.t_end - parameters.t_start;
    let n_grid = (span / parameters.dt_out + 1e-9).floor() as usize + 1;
    trajectory.truncate(n_grid);

    Ok(trajectory)
}

/// [`simulate`] from the all-zero initial state.
pub fn simulate_from_rest(
    context: &ForcingContext,
    parameters: &SolverParameters,
) -> Result<Trajectory, SolverError> {
    simulate(context, parameters, StateVector::zeros())
}
