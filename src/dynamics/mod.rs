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

use crate::cosmic::AstroError;
use crate::linalg::Vector3;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use snafu::Snafu;

/// Third body and arbitrary perturbations.
pub mod perturbations;
pub use self::perturbations::*;

/// Gaussian variational equations of the classical orbital elements.
pub mod gauss;

/// Electric propulsion: thrusters and power system.
pub mod propulsion;

/// Waypoints and guidance laws.
pub mod guidance;
use self::guidance::GuidanceError;

/// Selects which parameterization of the orbit is integrated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagatorKind {
    /// Integrates the classical orbital elements with the Gaussian variational equations.
    /// Singular for circular, equatorial and hyperbolic orbits.
    #[default]
    GaussianVOP,
    /// Integrates the position and velocity, works in all cases.
    Cartesian,
}

/// Returns the two body acceleration in km/s^2 at the provided radius vector.
pub fn two_body(radius: &Vector3<f64>, gm: f64) -> Vector3<f64> {
    (-gm / radius.norm().powi(3)) * radius
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// Equations of motion produced a NaN or infinite value.
    #[snafu(display("derivative component {index} is {value} at {epoch}"))]
    NonFiniteDerivative {
        index: usize,
        value: f64,
        epoch: Epoch,
    },
    #[snafu(display(
        "thrusters draw {draw_w} W but the power system only provides {available_w} W"
    ))]
    PowerBudgetExceeded { draw_w: f64, available_w: f64 },
    /// Astrodynamics error.
    #[snafu(display("dynamical model encountered an astro error: {source}"))]
    DynamicsAstro { source: AstroError },
    /// Guidance error.
    #[snafu(display("dynamical model encountered an issue with the guidance: {source}"))]
    DynamicsGuidance { source: GuidanceError },
}
