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

use snafu::prelude::*;
use std::fmt;

mod propagator;
pub use propagator::*;
mod rk;
pub use rk::*;
mod options;
pub use options::*;

use crate::cosmic::AstroError;
use crate::dynamics::DynamicsError;
use crate::linalg::Vector7;
use crate::time::Duration;

/// The contract between an integrator and the model it integrates: six orbital components and the fuel mass.
///
/// The time `t` is always in seconds since the start of the integration.
pub trait Integrable {
    /// Returns the state to integrate
    fn get_state(&self) -> Vector7<f64>;

    /// Returns the time derivative of the provided state
    fn derivative(&self, t: f64, state: &Vector7<f64>) -> Result<Vector7<f64>, PropagationError>;

    /// Commits the state of an accepted step
    fn set_state(&mut self, t: f64, state: &Vector7<f64>) -> Result<(), PropagationError>;

    /// Returns whether the integration must stop, checked before each step
    fn stop(&mut self, t: f64) -> bool;

    /// Time at which the integration ends, if known, so that the last step lands exactly on it
    fn final_time(&self) -> Option<f64> {
        None
    }
}

/// Stores the details of an integration.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct IntegrationDetails {
    /// step size of the last step
    pub step: Duration,
    /// number of accepted steps
    pub steps: u64,
    /// final time in seconds since the start of the integration
    pub t: f64,
}

impl fmt::Display for IntegrationDetails {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "IntegrationDetails {{step: {}, steps: {}, t: {} s}}",
            self.step, self.steps, self.t
        )
    }
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PropagationError {
    #[snafu(display("encountered a dynamics error {source}"))]
    Dynamics { source: DynamicsError },
    #[snafu(display("encountered an astro error {source}"))]
    PropAstro { source: AstroError },
}
