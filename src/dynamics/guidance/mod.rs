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

use crate::cosmic::{AstroError, Bodies, Cargo, Orbit};
use crate::linalg::Vector3;
use crate::time::{Duration, Epoch};
use serde_derive::{Deserialize, Serialize};
use snafu::Snafu;
use std::fmt;

mod ruggiero;
pub use ruggiero::{Objective, OrbitTolerances, OrbitalElement, Ruggiero};

/// Default tolerance on the velocity of a `ReachVelocity` waypoint, in km/s
pub const VELOCITY_TOLERANCE_KM_S: f64 = 5.0;

/// Converts the alpha (in-plane) and beta (out-of-plane) angles in the RCN frame to the unit vector in the RCN frame
pub(crate) fn unit_vector_from_plane_angles(alpha: f64, beta: f64) -> Vector3<f64> {
    Vector3::new(
        alpha.sin() * beta.cos(),
        alpha.cos() * beta.cos(),
        beta.sin(),
    )
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GuidanceError {
    #[snafu(display("invalid guidance objective: {msg}"))]
    InvalidObjective { msg: String },
    #[snafu(display("guidance encountered {source}"))]
    GuidanceAstro { source: AstroError },
}

/// What happens once a waypoint is cleared. Actions are queued and only executed at the end of the step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WaypointAction {
    /// Switch the reference frame of the orbit to this body
    FrameSwitch(Bodies),
    AddCargo(Cargo),
    /// Drop the cargo of that name
    DropCargo(String),
}

impl fmt::Display for WaypointAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameSwitch(body) => write!(f, "switch to {body} frame"),
            Self::AddCargo(cargo) => write!(f, "add cargo {} ({} kg)", cargo.name, cargo.mass_kg),
            Self::DropCargo(name) => write!(f, "drop cargo {name}"),
        }
    }
}

/// The objective of a waypoint, each decides its own thrust direction.
#[derive(Clone, Debug, PartialEq)]
pub enum WaypointKind {
    /// Coast for the provided duration, the end epoch is set when first evaluated
    Loiter {
        duration: Duration,
        until: Option<Epoch>,
    },
    /// Thrust along the velocity until the distance to the central body is reached
    ReachDistance { distance_km: f64 },
    /// Thrust along or against the velocity until its norm is within tolerance of the target
    ReachVelocity {
        velocity_km_s: f64,
        tolerance_km_s: f64,
    },
    /// Steer with the Ruggiero law until all of the objectives are met
    TargetOrbit(Ruggiero),
    /// Thrust prograde until the orbit becomes hyperbolic
    ToHyperbolic,
    /// Thrust retrograde until the orbit becomes elliptical
    ToElliptical,
}

/// A waypoint of the spacecraft: once cleared it stays cleared, and its action is only available then.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub kind: WaypointKind,
    action: Option<WaypointAction>,
    cleared: bool,
}

impl Waypoint {
    pub fn new(kind: WaypointKind, action: Option<WaypointAction>) -> Self {
        Self {
            kind,
            action,
            cleared: false,
        }
    }

    /// Loiter, i.e. "wait for a given duration"
    pub fn loiter(duration: Duration, action: Option<WaypointAction>) -> Self {
        Self::new(
            WaypointKind::Loiter {
                duration,
                until: None,
            },
            action,
        )
    }

    pub fn reach_distance(distance_km: f64, action: Option<WaypointAction>) -> Self {
        Self::new(WaypointKind::ReachDistance { distance_km }, action)
    }

    /// Spiral out until leaving the sphere of influence of the provided body (or never for the Sun).
    pub fn outward_spiral(body: Bodies, action: Option<WaypointAction>) -> Self {
        Self::reach_distance(body.body().soi.unwrap_or(f64::INFINITY), action)
    }

    pub fn reach_velocity(velocity_km_s: f64, action: Option<WaypointAction>) -> Self {
        Self::new(
            WaypointKind::ReachVelocity {
                velocity_km_s,
                tolerance_km_s: VELOCITY_TOLERANCE_KM_S,
            },
            action,
        )
    }

    pub fn target_orbit(law: Ruggiero, action: Option<WaypointAction>) -> Self {
        Self::new(WaypointKind::TargetOrbit(law), action)
    }

    pub fn to_hyperbolic(action: Option<WaypointAction>) -> Self {
        Self::new(WaypointKind::ToHyperbolic, action)
    }

    pub fn to_elliptical(action: Option<WaypointAction>) -> Self {
        Self::new(WaypointKind::ToElliptical, action)
    }

    /// Returns whether this waypoint has been reached
    pub fn cleared(&self) -> bool {
        self.cleared
    }

    /// Returns the action to execute, only once the waypoint is cleared
    pub fn action(&self) -> Option<&WaypointAction> {
        if self.cleared {
            self.action.as_ref()
        } else {
            None
        }
    }

    /// Returns the unit thrust direction in the inertial frame of the orbit (zero to coast), and whether the
    /// waypoint was cleared by this very call. A waypoint already cleared always coasts.
    pub fn allocate_thrust(&mut self, orbit: &Orbit, epoch: Epoch) -> (Vector3<f64>, bool) {
        if self.cleared {
            return (Vector3::zeros(), false);
        }
        let (direction, reached) = match &mut self.kind {
            WaypointKind::Loiter { duration, until } => match until {
                None => {
                    *until = Some(epoch + *duration);
                    (Vector3::zeros(), false)
                }
                Some(end) => (Vector3::zeros(), epoch >= *end),
            },
            WaypointKind::ReachDistance { distance_km } => {
                if orbit.rmag() >= *distance_km {
                    (Vector3::zeros(), true)
                } else {
                    (prograde(orbit), false)
                }
            }
            WaypointKind::ReachVelocity {
                velocity_km_s,
                tolerance_km_s,
            } => {
                let vmag = orbit.vmag();
                if (vmag - *velocity_km_s).abs() < *tolerance_km_s {
                    (Vector3::zeros(), true)
                } else if vmag < *velocity_km_s {
                    (prograde(orbit), false)
                } else {
                    (-prograde(orbit), false)
                }
            }
            WaypointKind::TargetOrbit(law) => {
                if law.achieved(orbit) {
                    (Vector3::zeros(), true)
                } else {
                    (orbit.dcm_from_rcn_to_inertial() * law.direction(orbit), false)
                }
            }
            WaypointKind::ToHyperbolic => {
                if orbit.energy() >= 0.0 {
                    (Vector3::zeros(), true)
                } else {
                    (prograde(orbit), false)
                }
            }
            WaypointKind::ToElliptical => {
                if orbit.energy() < 0.0 {
                    (Vector3::zeros(), true)
                } else {
                    (-prograde(orbit), false)
                }
            }
        };
        if reached {
            self.cleared = true;
        }
        (direction, reached)
    }
}

/// Unit vector along the velocity of the orbit
fn prograde(orbit: &Orbit) -> Vector3<f64> {
    let v = orbit.velocity();
    let vmag = v.norm();
    if vmag > 0.0 {
        v / vmag
    } else {
        Vector3::zeros()
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WaypointKind::Loiter { duration, .. } => write!(f, "coasting for {duration}"),
            WaypointKind::ReachDistance { distance_km } => {
                write!(f, "reach distance of {distance_km:.1} km")
            }
            WaypointKind::ReachVelocity { velocity_km_s, .. } => {
                write!(f, "reach velocity of {velocity_km_s:.1} km/s")
            }
            WaypointKind::TargetOrbit(law) => write!(f, "{law}"),
            WaypointKind::ToHyperbolic => write!(f, "escape to a hyperbolic orbit"),
            WaypointKind::ToElliptical => write!(f, "capture into an elliptical orbit"),
        }?;
        if let Some(action) = &self.action {
            write!(f, " then {action}")?;
        }
        Ok(())
    }
}
