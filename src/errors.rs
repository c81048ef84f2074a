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
use crate::dynamics::guidance::GuidanceError;
use crate::dynamics::DynamicsError;
use crate::io::ConfigError;
use crate::propagators::PropagationError;
use snafu::prelude::*;

/// Top level error, every module error converts into it.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SmdError {
    #[snafu(display("astro error: {source}"))]
    Astro { source: AstroError },
    #[snafu(display("dynamics error: {source}"))]
    Dynamics { source: DynamicsError },
    #[snafu(display("guidance error: {source}"))]
    Guidance { source: GuidanceError },
    #[snafu(display("propagation failed: {source}"))]
    Propagation { source: PropagationError },
    #[snafu(display("configuration error: {source}"))]
    Config { source: ConfigError },
    #[snafu(display("history sink thread panicked"))]
    HistoryThread,
    #[snafu(display("could not export the history: {msg}"))]
    ExportError { msg: String },
}

impl From<AstroError> for SmdError {
    fn from(source: AstroError) -> Self {
        Self::Astro { source }
    }
}

impl From<DynamicsError> for SmdError {
    fn from(source: DynamicsError) -> Self {
        Self::Dynamics { source }
    }
}

impl From<GuidanceError> for SmdError {
    fn from(source: GuidanceError) -> Self {
        Self::Guidance { source }
    }
}

impl From<PropagationError> for SmdError {
    fn from(source: PropagationError) -> Self {
        Self::Propagation { source }
    }
}

impl From<ConfigError> for SmdError {
    fn from(source: ConfigError) -> Self {
        Self::Config { source }
    }
}
