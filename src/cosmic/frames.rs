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

use super::{AstroError, Bodies, InvalidFrameTransitionSnafu, Orbit};
use crate::utils::r1;
use snafu::ensure;

/// Converts the orbit into the frame centered on the provided body, at the epoch of the orbit.
///
/// Any switch between two planets goes through the heliocentric ecliptic frame: outward to the Sun by rotating by
/// the tilt of the origin and adding its heliocentric state, then inward to the destination by subtracting its
/// heliocentric state and rotating by the opposite of its tilt.
pub fn switch(orbit: &Orbit, to: Bodies) -> Result<Orbit, AstroError> {
    ensure!(
        orbit.origin != to,
        InvalidFrameTransitionSnafu {
            body: to,
            epoch: orbit.epoch
        }
    );
    debug!("switching from {} to {} at {}", orbit.origin, to, orbit.epoch);
    let helio = if orbit.origin.is_sun() {
        *orbit
    } else {
        to_heliocentric(orbit)
    };
    if to.is_sun() {
        Ok(helio)
    } else {
        Ok(from_heliocentric(&helio, to))
    }
}

fn to_heliocentric(orbit: &Orbit) -> Orbit {
    let body = orbit.origin.body();
    let dcm = r1(body.tilt());
    let (helio_r, helio_v) = body.helio_state(orbit.epoch);
    let r = dcm * orbit.radius() + helio_r;
    let v = dcm * orbit.velocity() + helio_v;
    Orbit::from_vectors(&r, &v, orbit.epoch, Bodies::Sun)
}

fn from_heliocentric(orbit: &Orbit, to: Bodies) -> Orbit {
    let body = to.body();
    let dcm = r1(-body.tilt());
    let (helio_r, helio_v) = body.helio_state(orbit.epoch);
    let r = dcm * (orbit.radius() - helio_r);
    let v = dcm * (orbit.velocity() - helio_v);
    Orbit::from_vectors(&r, &v, orbit.epoch, to)
}

#[test]
fn self_switch_fails() {
    let epoch = crate::time::Epoch::from_gregorian_utc_at_noon(2018, 5, 1);
    let orbit = Orbit::cartesian(7000.0, 0.0, 0.0, 0.0, 7.5, 0.0, epoch, Bodies::Earth);
    assert_eq!(
        switch(&orbit, Bodies::Earth).unwrap_err(),
        AstroError::InvalidFrameTransition {
            body: Bodies::Earth,
            epoch
        }
    );
}
