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

/*! # smd

Spacecraft mission design: propagates a spacecraft under two-body gravity, third-body perturbations and
low-thrust electric propulsion, following a queue of waypoints and switching its reference frame
(patched conics) when leaving a sphere of influence.
*/

/// Provides the fixed step integrator and the contract any integrator uses to drive a mission.
pub mod propagators;

/// Provides the equations of motion: perturbations, Gaussian variational equations, propulsion and guidance.
pub mod dynamics;

/// Provides the solar system bodies, their ephemerides, orbits, frame switching and the spacecraft.
pub mod cosmic;

/// Utility functions shared by different modules, and which may be useful to engineers.
pub mod utils;

mod errors;
/// Functions which may fail will return an error, the library never panics on user input.
pub use self::errors::SmdError;

/// Mission configuration files.
pub mod io;

/// The propagation engine, history streaming and status reporting.
pub mod md;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;

    /// State integrated for a mission: six orbital components and the fuel mass
    pub type Vector7<T> = SVector<T, 7>;
}

/// Re-export some useful things
pub use self::cosmic::{Bodies, Orbit, Spacecraft};
pub use self::md::Mission;
