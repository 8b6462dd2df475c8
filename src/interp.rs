use ndarray::Array1;
use ninterp::{
    error::{InterpolateError, ValidateError},
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};

pub use ninterp::interpolator::Extrapolate;

/// Piecewise-linear series y(x) over a strictly increasing grid.
///
/// The behavior outside the grid is fixed at construction: `Enable` extends
/// the nearest edge segment linearly, `Clamp` holds the edge value, and
/// `Error` rejects the query.
pub struct LinearSeries(Interp1DOwned<f64, Linear>);

impl LinearSeries {
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        extrapolate: Extrapolate<f64>,
    ) -> Result<Self, ValidateError> {
        Ok(Self(Interp1DOwned::new(
            Array1::from_vec(x),
            Array1::from_vec(y),
            Linear,
            extrapolate,
        )?))
    }

    pub fn eval(&self, x: f64) -> Result<f64, InterpolateError> {
        self.0.interpolate(&[x])
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn interpolates_between_knots() {
        let series =
            LinearSeries::new(vec![0., 1., 2.], vec![0., 10., 40.], Extrapolate::Enable).unwrap();
        assert_relative_eq!(series.eval(0.5).unwrap(), 5.);
        assert_relative_eq!(series.eval(1.5).unwrap(), 25.);
    }

    #[test]
    fn policies_differ_beyond_the_grid() {
        let x = vec![0., 1., 2.];
        let y = vec![0., 10., 40.];

        let extend = LinearSeries::new(x.clone(), y.clone(), Extrapolate::Enable).unwrap();
        assert_relative_eq!(extend.eval(3.).unwrap(), 70.);

        let clamp = LinearSeries::new(x.clone(), y.clone(), Extrapolate::Clamp).unwrap();
        assert_relative_eq!(clamp.eval(3.).unwrap(), 40.);

        let strict = LinearSeries::new(x, y, Extrapolate::Error).unwrap();
        assert!(strict.eval(3.).is_err());
    }

    #[test]
    fn rejects_a_non_monotonic_grid() {
        assert!(LinearSeries::new(vec![0., 2., 1.], vec![0., 1., 2.], Extrapolate::Enable).is_err());
    }
}
