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

use super::Bodies;
use crate::dynamics::guidance::{Waypoint, WaypointAction};
use crate::dynamics::propulsion::{Eps, Thruster};
use serde_derive::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A piece of cargo carried by the spacecraft, its mass adds to the vehicle mass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub name: String,
    pub mass_kg: f64,
}

impl Cargo {
    pub fn new(name: &str, mass_kg: f64) -> Self {
        Self {
            name: name.to_string(),
            mass_kg,
        }
    }
}

/// Queue of the actions to execute at the end of the current step.
///
/// It is owned by the spacecraft of a single run, drained and cleared once per accepted step. A frame switch
/// to a given body is only queued once per step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionQueue {
    actions: Vec<WaypointAction>,
}

impl ActionQueue {
    pub fn push(&mut self, action: WaypointAction) {
        if matches!(action, WaypointAction::FrameSwitch(_)) && self.actions.contains(&action) {
            trace!("{action} already queued");
            return;
        }
        self.actions.push(action);
    }

    /// Returns whether a switch to the provided body is already queued
    pub fn switches_to(&self, body: Bodies) -> bool {
        self.actions.contains(&WaypointAction::FrameSwitch(body))
    }

    /// Takes all of the queued actions in order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<WaypointAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A spacecraft with its dry and fuel masses (in kg), its electric propulsion, its cargo and its waypoints.
#[derive(Clone, Debug)]
pub struct Spacecraft {
    pub name: String,
    /// Dry mass, i.e. mass without fuel nor cargo, in kg
    pub dry_mass_kg: f64,
    /// Fuel mass in kg, a negative fuel mass is reported but never clamped
    pub fuel_mass_kg: f64,
    pub thrusters: Vec<Thruster>,
    pub eps: Eps,
    pub cargo: Vec<Cargo>,
    /// The active waypoint is always the first one
    pub waypoints: VecDeque<Waypoint>,
    pub func_q: ActionQueue,
}

impl Spacecraft {
    pub fn new(
        name: &str,
        dry_mass_kg: f64,
        fuel_mass_kg: f64,
        eps: Eps,
        thrusters: Vec<Thruster>,
        cargo: Vec<Cargo>,
        waypoints: Vec<Waypoint>,
    ) -> Self {
        Self {
            name: name.to_string(),
            dry_mass_kg,
            fuel_mass_kg,
            thrusters,
            eps,
            cargo,
            waypoints: waypoints.into(),
            func_q: ActionQueue::default(),
        }
    }

    /// Total mass of the cargo in kg
    pub fn cargo_mass_kg(&self) -> f64 {
        self.cargo.iter().map(|c| c.mass_kg).sum()
    }

    /// Total mass of the vehicle in kg, including fuel and cargo
    pub fn mass_kg(&self) -> f64 {
        self.dry_mass_kg + self.fuel_mass_kg + self.cargo_mass_kg()
    }

    pub fn add_cargo(&mut self, cargo: Cargo) {
        info!("{}: loading {} ({} kg)", self.name, cargo.name, cargo.mass_kg);
        self.cargo.push(cargo);
    }

    /// Drops the first piece of cargo with that name, returning it if it was carried
    pub fn drop_cargo(&mut self, name: &str) -> Option<Cargo> {
        match self.cargo.iter().position(|c| c.name == name) {
            Some(idx) => {
                let cargo = self.cargo.remove(idx);
                info!("{}: dropped {} ({} kg)", self.name, cargo.name, cargo.mass_kg);
                Some(cargo)
            }
            None => {
                warn!("{}: no cargo named {name} to drop", self.name);
                None
            }
        }
    }

    /// Returns whether all of the waypoints have been cleared
    pub fn waypoints_cleared(&self) -> bool {
        self.waypoints.iter().all(|wp| wp.cleared())
    }

    /// Removes the cleared waypoints from the head of the queue
    pub(crate) fn pop_cleared_waypoints(&mut self) {
        while let Some(wp) = self.waypoints.front() {
            if !wp.cleared() {
                break;
            }
            debug!("{}: waypoint `{wp}` done", self.name);
            self.waypoints.pop_front();
        }
    }
}

impl fmt::Display for Spacecraft {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\tdry = {:.3} kg\tfuel = {:.3} kg\tcargo = {:.3} kg\twaypoints = {}",
            self.name,
            self.dry_mass_kg,
            self.fuel_mass_kg,
            self.cargo_mass_kg(),
            self.waypoints.len()
        )
    }
}
