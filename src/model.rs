use std::f64::consts::PI;

use faer::{mat, Mat};

use crate::error::InvalidInputError;

/// Structural and aerodynamic constants of the turbine, immutable once loaded.
#[derive(Debug, Clone, Copy)]
pub struct StructuralParameters {
    pub mass_blade: f64,      // mb, single blade (kg)
    pub mass_nacelle: f64,    // mn (kg)
    pub mass_hub: f64,        // mh (kg)
    pub mass_tower: f64,      // mt, equivalent tower mass (kg)
    pub damping_blade: f64,   // c1, rotor-tower coupling (N s/m)
    pub damping_tower: f64,   // c2, tower to ground (N s/m)
    pub stiffness_blade: f64, // k1, rotor-tower coupling (N/m)
    pub stiffness_tower: f64, // k2, tower to ground (N/m)
    pub rotor_diameter: f64,  // Dr (m)
    pub air_density: f64,     // rho (kg/m^3)
}

impl StructuralParameters {
    /// Swept rotor area, pi/4 * Dr^2.
    pub fn rotor_area(&self) -> f64 {
        PI / 4. * self.rotor_diameter * self.rotor_diameter
    }
}

/// Two-mass spring-damper chain reduced to first-order state-space form.
///
/// DOF 1 lumps the three blades, DOF 2 the nacelle, hub, and tower. c1/k1
/// couple the DOFs, c2/k2 ground DOF 2. The state vector is
/// `[x1, x2, x1_dot, x2_dot]` and the state matrix is
/// `A = [[0, I], [-M^-1 K, -M^-1 C]]`.
pub struct TurbineModel {
    m: Mat<f64>,
    c: Mat<f64>,
    k: Mat<f64>,
    m_inv: Mat<f64>,
    a: Mat<f64>,
    rotor_area: f64,
    air_density: f64,
}

impl TurbineModel {
    pub fn new(params: &StructuralParameters) -> Result<Self, InvalidInputError> {
        let m1 = 3. * params.mass_blade;
        let m2 = params.mass_nacelle + params.mass_hub + params.mass_tower;
        if m1 <= 0. {
            return Err(InvalidInputError::NonInvertibleMass {
                dof: "rotor",
                value: m1,
            });
        }
        if m2 <= 0. {
            return Err(InvalidInputError::NonInvertibleMass {
                dof: "tower",
                value: m2,
            });
        }

        let (c1, c2) = (params.damping_blade, params.damping_tower);
        let (k1, k2) = (params.stiffness_blade, params.stiffness_tower);

        let m = mat![[m1, 0.], [0., m2]];
        let c = mat![[c1, -c1], [-c1, c1 + c2]];
        let k = mat![[k1, -k1], [-k1, k1 + k2]];

        // M is diagonal, so its inverse is taken once here and the same
        // values feed the K block, the C block, and the input term.
        let m_inv = mat![[1. / m1, 0.], [0., 1. / m2]];
        let a = first_order_form(&m_inv, &c, &k);

        Ok(Self {
            m,
            c,
            k,
            m_inv,
            a,
            rotor_area: params.rotor_area(),
            air_density: params.air_density,
        })
    }

    /// 4x4 state matrix A.
    pub fn state_matrix(&self) -> &Mat<f64> {
        &self.a
    }

    pub fn mass(&self) -> &Mat<f64> {
        &self.m
    }

    pub fn damping(&self) -> &Mat<f64> {
        &self.c
    }

    pub fn stiffness(&self) -> &Mat<f64> {
        &self.k
    }

    pub fn mass_inverse(&self) -> &Mat<f64> {
        &self.m_inv
    }

    pub fn rotor_area(&self) -> f64 {
        self.rotor_area
    }

    pub fn air_density(&self) -> f64 {
        self.air_density
    }
}

fn first_order_form(m_inv: &Mat<f64>, c: &Mat<f64>, k: &Mat<f64>) -> Mat<f64> {
    let mut a = Mat::<f64>::zeros(4, 4);
    a[(0, 2)] = 1.;
    a[(1, 3)] = 1.;
    for i in 0..2 {
        for j in 0..2 {
            a[(i + 2, j)] = -(m_inv[(i, 0)] * k[(0, j)] + m_inv[(i, 1)] * k[(1, j)]);
            a[(i + 2, j + 2)] = -(m_inv[(i, 0)] * c[(0, j)] + m_inv[(i, 1)] * c[(1, j)]);
        }
    }
    a
}
