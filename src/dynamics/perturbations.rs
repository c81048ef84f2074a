/*
    SMD, spacecraft mission design
    Copyright (C) 2023 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::PropagatorKind;
use crate::cosmic::{Bodies, Orbit};
use crate::linalg::{Vector3, Vector7};
use crate::time::Epoch;
use crate::utils::r1;
use std::fmt;
use std::sync::Arc;

/// A user provided perturbation, returning the seven components to add to the derivative.
pub type ArbitraryPerturbation = Arc<dyn Fn(&Orbit, PropagatorKind) -> Vector7<f64> + Send + Sync>;

/// Configuration of the perturbing forces of a mission.
#[derive(Clone, Default)]
pub struct Perturbations {
    /// Enables the J2 secular rates of the RAAN and argument of periapsis (Gaussian VOP only)
    pub j2: bool,
    /// Third bodies pulling on the spacecraft
    pub perturbing_bodies: Vec<Bodies>,
    pub arbitrary: Option<ArbitraryPerturbation>,
}

impl Perturbations {
    pub fn with_bodies(bodies: &[Bodies]) -> Self {
        Self {
            perturbing_bodies: bodies.to_vec(),
            ..Default::default()
        }
    }

    /// Returns the perturbations to add to the derivative of the state.
    ///
    /// In Cartesian mode, the first three components are the acceleration in km/s^2 in the frame of the orbit.
    /// In Gaussian VOP mode, they are its radial, circumferential and normal components. The fuel component is zero.
    pub fn perturb(&self, orbit: &Orbit, epoch: Epoch, mode: PropagatorKind) -> Vector7<f64> {
        let mut pert = Vector7::zeros();
        let mut accel = Vector3::zeros();
        for body in &self.perturbing_bodies {
            accel += third_body(orbit, *body, epoch);
        }
        if mode == PropagatorKind::GaussianVOP && accel.norm() > 0.0 {
            accel = orbit.dcm_from_rcn_to_inertial().transpose() * accel;
        }
        pert.fixed_rows_mut::<3>(0).copy_from(&accel);
        if let Some(arbitrary) = &self.arbitrary {
            pert += arbitrary(orbit, mode);
        }
        pert[6] = 0.0;
        pert
    }
}

/// Returns the acceleration (km/s^2) from the provided third body on the spacecraft, including the indirect term
/// from the pull of this third body on the origin of the orbit. Zero if the third body is the origin itself.
pub fn third_body(orbit: &Orbit, body: Bodies, epoch: Epoch) -> Vector3<f64> {
    if body == orbit.origin {
        return Vector3::zeros();
    }
    let origin = orbit.origin.body();
    let (helio_origin, _) = origin.helio_state(epoch);
    let (helio_body, _) = body.body().helio_state(epoch);
    // Third body as seen from the origin, in the equatorial frame of the origin
    let r_ij = r1(-origin.tilt()) * (helio_body - helio_origin);
    // Spacecraft as seen from the third body
    let r_j = orbit.radius() - r_ij;
    -body.body().gm * (r_j / r_j.norm().powi(3) + r_ij / r_ij.norm().powi(3))
}

impl fmt::Debug for Perturbations {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Perturbations")
            .field("j2", &self.j2)
            .field("perturbing_bodies", &self.perturbing_bodies)
            .field("arbitrary", &self.arbitrary.is_some())
            .finish()
    }
}
