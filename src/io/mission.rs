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

use super::{
    duration_from_str, duration_to_str, epoch_from_str, epoch_to_str, maybe_epoch_from_str,
    maybe_epoch_to_str, ConfigError, ConfigRepr,
};
use crate::cosmic::{Bodies, Cargo, Orbit, Spacecraft};
use crate::dynamics::guidance::{
    Objective, Ruggiero, Waypoint, WaypointAction, WaypointKind, VELOCITY_TOLERANCE_KM_S,
};
use crate::dynamics::propulsion::{Eps, Thruster};
use crate::dynamics::{Perturbations, PropagatorKind};
use crate::errors::SmdError;
use crate::md::{CsvSink, Mission, MissionOpts};
use crate::propagators::PropOpts;
use crate::time::{Duration, Epoch, Unit};
use serde_derive::{Deserialize, Serialize};

fn invalid(msg: String) -> SmdError {
    SmdError::Config {
        source: ConfigError::InvalidConfig { msg },
    }
}

/// Initial orbit, either Cartesian or Keplerian with the angles in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OrbitConfig {
    Cartesian {
        x_km: f64,
        y_km: f64,
        z_km: f64,
        vx_km_s: f64,
        vy_km_s: f64,
        vz_km_s: f64,
    },
    Keplerian {
        sma_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
    },
}

impl OrbitConfig {
    pub fn build(&self, epoch: Epoch, origin: Bodies) -> Result<Orbit, SmdError> {
        match *self {
            Self::Cartesian {
                x_km,
                y_km,
                z_km,
                vx_km_s,
                vy_km_s,
                vz_km_s,
            } => Ok(Orbit::cartesian(
                x_km, y_km, z_km, vx_km_s, vy_km_s, vz_km_s, epoch, origin,
            )),
            Self::Keplerian {
                sma_km,
                ecc,
                inc_deg,
                raan_deg,
                aop_deg,
                ta_deg,
            } => Ok(Orbit::keplerian(
                sma_km, ecc, inc_deg, raan_deg, aop_deg, ta_deg, epoch, origin,
            )?),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WaypointConfig {
    Loiter {
        #[serde(serialize_with = "duration_to_str", deserialize_with = "duration_from_str")]
        duration: Duration,
        #[serde(default)]
        action: Option<WaypointAction>,
    },
    ReachDistance {
        distance_km: f64,
        #[serde(default)]
        action: Option<WaypointAction>,
    },
    /// Reach the sphere of influence of that body
    OutwardSpiral {
        body: Bodies,
        #[serde(default)]
        action: Option<WaypointAction>,
    },
    ReachVelocity {
        velocity_km_s: f64,
        #[serde(default)]
        tolerance_km_s: Option<f64>,
        #[serde(default)]
        action: Option<WaypointAction>,
    },
    TargetOrbit {
        objectives: Vec<Objective>,
        #[serde(default)]
        action: Option<WaypointAction>,
    },
    ToHyperbolic {
        #[serde(default)]
        action: Option<WaypointAction>,
    },
    ToElliptical {
        #[serde(default)]
        action: Option<WaypointAction>,
    },
}

impl WaypointConfig {
    pub fn build(&self) -> Result<Waypoint, SmdError> {
        let wp = match self {
            Self::Loiter { duration, action } => Waypoint::loiter(*duration, action.clone()),
            Self::ReachDistance {
                distance_km,
                action,
            } => Waypoint::reach_distance(*distance_km, action.clone()),
            Self::OutwardSpiral { body, action } => Waypoint::outward_spiral(*body, action.clone()),
            Self::ReachVelocity {
                velocity_km_s,
                tolerance_km_s,
                action,
            } => Waypoint::new(
                WaypointKind::ReachVelocity {
                    velocity_km_s: *velocity_km_s,
                    tolerance_km_s: tolerance_km_s.unwrap_or(VELOCITY_TOLERANCE_KM_S),
                },
                action.clone(),
            ),
            Self::TargetOrbit { objectives, action } => {
                Waypoint::target_orbit(Ruggiero::new(objectives)?, action.clone())
            }
            Self::ToHyperbolic { action } => Waypoint::to_hyperbolic(action.clone()),
            Self::ToElliptical { action } => Waypoint::to_elliptical(action.clone()),
        };
        Ok(wp)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpacecraftConfig {
    pub name: String,
    pub dry_mass_kg: f64,
    pub fuel_mass_kg: f64,
    #[serde(default)]
    pub eps: Eps,
    #[serde(default)]
    pub thrusters: Vec<Thruster>,
    #[serde(default)]
    pub cargo: Vec<Cargo>,
    #[serde(default)]
    pub waypoints: Vec<WaypointConfig>,
}

impl SpacecraftConfig {
    pub fn build(&self) -> Result<Spacecraft, SmdError> {
        if self.dry_mass_kg <= 0.0 {
            return Err(invalid(format!("dry mass must be positive, got {} kg", self.dry_mass_kg)));
        }
        if self.fuel_mass_kg < 0.0 {
            return Err(invalid(format!(
                "fuel mass cannot be negative, got {} kg",
                self.fuel_mass_kg
            )));
        }
        let waypoints = self
            .waypoints
            .iter()
            .map(|wp| wp.build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Spacecraft::new(
            &self.name,
            self.dry_mass_kg,
            self.fuel_mass_kg,
            self.eps,
            self.thrusters.clone(),
            self.cargo.clone(),
            waypoints,
        ))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerturbationsConfig {
    #[serde(default)]
    pub j2: bool,
    #[serde(default)]
    pub bodies: Vec<Bodies>,
}

impl From<&PerturbationsConfig> for Perturbations {
    fn from(cfg: &PerturbationsConfig) -> Self {
        Self {
            j2: cfg.j2,
            perturbing_bodies: cfg.bodies.clone(),
            arbitrary: None,
        }
    }
}

/// A whole mission: the spacecraft, its initial orbit and how to propagate it.
///
/// Without an end epoch, the mission runs until all of the waypoints are cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    pub spacecraft: SpacecraftConfig,
    pub origin: Bodies,
    pub orbit: OrbitConfig,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub start: Epoch,
    #[serde(
        default,
        serialize_with = "maybe_epoch_to_str",
        deserialize_with = "maybe_epoch_from_str"
    )]
    pub end: Option<Epoch>,
    #[serde(default)]
    pub propagator: PropagatorKind,
    #[serde(default)]
    pub perturbations: PerturbationsConfig,
    /// Integration step in seconds, defaults to ten seconds
    #[serde(default)]
    pub step_s: Option<f64>,
    /// Path of the CSV file to stream the history to
    #[serde(default)]
    pub history: Option<String>,
    #[serde(default)]
    pub status_period_s: Option<f64>,
}

impl ConfigRepr for MissionConfig {}

impl MissionConfig {
    /// Build the mission, with its history streamed to the CSV file if one is set.
    pub fn build(&self) -> Result<Mission, SmdError> {
        let prop_opts = match self.step_s {
            Some(step_s) if step_s > 0.0 && step_s.is_finite() => {
                PropOpts::with_fixed_step_s(step_s)
            }
            Some(step_s) => return Err(invalid(format!("step must be positive, got {step_s} s"))),
            None => PropOpts::default(),
        };
        if let Some(period) = self.status_period_s {
            if period <= 0.0 {
                return Err(invalid(format!("status period must be positive, got {period} s")));
            }
        }
        let sc = self.spacecraft.build()?;
        let orbit = self.orbit.build(self.start, self.origin)?;
        // Any end before the start means "until all waypoints are cleared"
        let end = self.end.unwrap_or(self.start - Unit::Second * 1);

        let opts = MissionOpts::builder()
            .propagator(self.propagator)
            .perturbations(Perturbations::from(&self.perturbations))
            .prop_opts(prop_opts)
            .status_period(self.status_period_s.map(|s| s * Unit::Second))
            .build();

        let mission = Mission::new(sc, orbit, self.start, end, opts);
        match &self.history {
            Some(path) => Ok(mission.with_history(Box::new(CsvSink::new(path)?))),
            None => Ok(mission),
        }
    }
}
