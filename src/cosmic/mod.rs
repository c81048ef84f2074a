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

use crate::time::Epoch;
use snafu::Snafu;

mod bodies;
pub use self::bodies::*;

mod ephemeris;
pub use self::ephemeris::MeanElements;

mod orbit;
pub use self::orbit::*;

/// Patched conics frame switching between spheres of influence.
pub mod frames;

mod spacecraft;
pub use self::spacecraft::*;

/// Astronomical unit, in kilometers, according to the [IAU](https://www.iau.org/public/themes/measuring/).
pub const AU: f64 = 149_597_870.700;

/// From NIST special publication 330, 2008 edition, in meters per second squared
pub const STD_GRAVITY: f64 = 9.80665;

/// Tolerance on the eccentricity under which an orbit is considered parabolic.
pub const ECC_EPSILON: f64 = 5e-5;

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AstroError {
    #[snafu(display("true anomaly of {ta_rad} rad is singular in the Keplerian conversion"))]
    TrueAnomalySingular { ta_rad: f64 },
    #[snafu(display("eccentricity {ecc} unsupported: only circular and elliptical orbits are"))]
    UnsupportedEccentricity { ecc: f64 },
    #[snafu(display("already in orbit around {body} at {epoch}"))]
    InvalidFrameTransition { body: Bodies, epoch: Epoch },
    #[snafu(display("apoapsis radius {r_apo} km is below periapsis radius {r_peri} km"))]
    InvalidRadii { r_apo: f64, r_peri: f64 },
}
