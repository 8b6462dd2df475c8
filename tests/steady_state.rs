use std::f64::consts::PI;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use turbie::{
    aero::CtCurve,
    dynamics::ForcingContext,
    model::{StructuralParameters, TurbineModel},
    solver::{simulate_from_rest, SolverParameters},
    wind::{WindRecord, WindSignal},
};

// m1 = m2 = 1 with strong structural damping so transients die quickly.
fn heavily_damped_params() -> StructuralParameters {
    StructuralParameters {
        mass_blade: 1. / 3.,
        mass_nacelle: 1.,
        mass_hub: 0.,
        mass_tower: 0.,
        damping_blade: 1.,
        damping_tower: 1.,
        stiffness_blade: 2.,
        stiffness_tower: 3.,
        rotor_diameter: 2., // rotor area pi
        air_density: 1.2,
    }
}

#[test]
fn constant_wind_settles_at_the_static_thrust_balance() {
    let model = TurbineModel::new(&heavily_damped_params()).unwrap();

    // Constant 1 m/s wind; the run Ct comes from the record's mean speed,
    // which sits exactly on a table knot.
    let record = WindRecord::new(vec![0., 400.], vec![1., 1.]).unwrap();
    let curve = CtCurve::new(vec![0.5, 1.0, 2.0], vec![0.85, 0.8, 0.75]).unwrap();
    let ct = curve.ct(record.mean_speed()).unwrap();
    assert_relative_eq!(ct, 0.8);

    let wind = WindSignal::new(&record).unwrap();
    let context = ForcingContext {
        model: &model,
        wind: &wind,
        ct,
    };
    let parameters = SolverParameters::new(0., 200.).with_tolerances(1e-8, 1e-10);
    let trajectory = simulate_from_rest(&context, &parameters).unwrap();

    // At rest u_rel = U, so F1 = 0.5 * rho * ct * A * U^2 and the
    // steady state solves K x_ss = [F1, 0]:
    //   K = [[2, -2], [-2, 5]], det = 6, x_ss = [5 F1 / 6, F1 / 3].
    let f1 = 0.5 * 1.2 * 0.8 * PI * 1. * 1.;
    let x1_expected = 5. * f1 / 6.;
    let x2_expected = f1 / 3.;

    let n = trajectory.len();
    assert_relative_eq!(trajectory.blade_position[n - 1], x1_expected, max_relative = 1e-3);
    assert_relative_eq!(trajectory.tower_position[n - 1], x2_expected, max_relative = 1e-3);
    assert_abs_diff_eq!(trajectory.blade_velocity[n - 1], 0., epsilon = 1e-4);
    assert_abs_diff_eq!(trajectory.tower_velocity[n - 1], 0., epsilon = 1e-4);

    // The tail should already be flat well before the end of the run.
    let settled = &trajectory.blade_position[n - 2000..];
    let min = settled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = settled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(max - min < 1e-3, "tail still oscillating: {min}..{max}");
}

#[test]
fn doubling_the_wind_roughly_quadruples_the_static_deflection() {
    let model = TurbineModel::new(&heavily_damped_params()).unwrap();
    let curve = CtCurve::new(vec![0.5, 1.0, 2.0], vec![0.8, 0.8, 0.8]).unwrap();

    let mut deflections = vec![];
    for u in [1., 2.] {
        let record = WindRecord::new(vec![0., 400.], vec![u, u]).unwrap();
        let wind = WindSignal::new(&record).unwrap();
        let context = ForcingContext {
            model: &model,
            wind: &wind,
            ct: curve.ct(record.mean_speed()).unwrap(),
        };
        let parameters = SolverParameters::new(0., 200.).with_tolerances(1e-8, 1e-10);
        let trajectory = simulate_from_rest(&context, &parameters).unwrap();
        deflections.push(trajectory.blade_position[trajectory.len() - 1]);
    }

    assert_relative_eq!(deflections[1] / deflections[0], 4., max_relative = 1e-3);
}
