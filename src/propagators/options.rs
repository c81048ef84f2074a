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

use std::fmt;

use crate::time::{Duration, Unit};
use typed_builder::TypedBuilder;

/// PropOpts stores the integrator options.
///
/// Only fixed step integration is supported, the default step is ten seconds.
#[derive(Clone, Copy, Debug, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct PropOpts {
    #[builder(default_code = "10.0 * Unit::Second")]
    pub step: Duration,
}

impl PropOpts {
    /// `with_fixed_step` initializes an `PropOpts` such that the integrator is used with a fixed
    ///  step size.
    pub fn with_fixed_step(step: Duration) -> Self {
        Self { step }
    }

    pub fn with_fixed_step_s(step: f64) -> Self {
        Self::with_fixed_step(step * Unit::Second)
    }

    /// Returns a string with the information about these options
    pub fn info(&self) -> String {
        format!("{self}")
    }
}

impl Default for PropOpts {
    fn default() -> Self {
        Self {
            step: 10.0 * Unit::Second,
        }
    }
}

impl fmt::Display for PropOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixed step: {}", self.step)
    }
}

#[test]
fn test_options() {
    let opts = PropOpts::with_fixed_step_s(1e-1);
    assert_eq!(opts.step, 1e-1 * Unit::Second);

    let opts: PropOpts = Default::default();
    assert_eq!(opts.step, 10.0 * Unit::Second);
    assert_eq!(opts, PropOpts::builder().build());

    let opts = PropOpts::builder().step(Unit::Minute * 1).build();
    assert_eq!(opts.info(), "fixed step: 1 min");
}
