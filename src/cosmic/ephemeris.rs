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

use super::orbit::elements_to_cartesian;
use super::AU;
use crate::linalg::Vector3;
use crate::time::Epoch;
use crate::utils::between_pm_180;
use std::f64::consts::PI;

const SECONDS_PER_CENTURY: f64 = 36_525.0 * 86_400.0;

/// Mean orbital elements of a planet with their linear rates per Julian century, valid 1800 AD to 2050 AD.
///
/// Values and algorithm from E.M. Standish, _Keplerian Elements for Approximate Positions of the Major Planets_,
/// JPL Solar System Dynamics. The elements are given in the J2000 ecliptic frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeanElements {
    /// Semi major axis in AU
    pub sma_au: f64,
    pub ecc: f64,
    /// Inclination in degrees
    pub inc_deg: f64,
    /// Mean longitude in degrees
    pub mean_long_deg: f64,
    /// Longitude of perihelion in degrees
    pub long_peri_deg: f64,
    /// Longitude of the ascending node in degrees
    pub raan_deg: f64,
    /// Rates of each of the above, in the same units per Julian century
    pub rates: [f64; 6],
}

impl MeanElements {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        sma_au: f64,
        ecc: f64,
        inc_deg: f64,
        mean_long_deg: f64,
        long_peri_deg: f64,
        raan_deg: f64,
        rates: [f64; 6],
    ) -> Self {
        Self {
            sma_au,
            ecc,
            inc_deg,
            mean_long_deg,
            long_peri_deg,
            raan_deg,
            rates,
        }
    }

    /// Returns the heliocentric position (km) and velocity (km/s) in the ecliptic J2000 frame at the provided epoch.
    pub fn state(&self, epoch: Epoch, sun_gm: f64) -> (Vector3<f64>, Vector3<f64>) {
        let centuries = epoch.to_tdb_seconds() / SECONDS_PER_CENTURY;
        let sma = (self.sma_au + self.rates[0] * centuries) * AU;
        let ecc = self.ecc + self.rates[1] * centuries;
        let inc = self.inc_deg + self.rates[2] * centuries;
        let mean_long = self.mean_long_deg + self.rates[3] * centuries;
        let long_peri = self.long_peri_deg + self.rates[4] * centuries;
        let raan = self.raan_deg + self.rates[5] * centuries;

        let aop = long_peri - raan;
        let ma = between_pm_180(mean_long - long_peri).to_radians();
        let ea = solve_kepler(ma, ecc);
        let ta = 2.0
            * ((1.0 + ecc).sqrt() * (ea / 2.0).sin()).atan2((1.0 - ecc).sqrt() * (ea / 2.0).cos());

        elements_to_cartesian(
            sun_gm,
            sma,
            ecc,
            inc.to_radians(),
            raan.to_radians(),
            aop.to_radians(),
            ta,
        )
    }
}

/// Solves Kepler's equation M = E - e sin E for the eccentric anomaly with Newton Raphson iterations.
fn solve_kepler(ma: f64, ecc: f64) -> f64 {
    let mut ea = if ecc < 0.8 { ma } else { PI };
    for _ in 0..50 {
        let delta = (ea - ecc * ea.sin() - ma) / (1.0 - ecc * ea.cos());
        ea -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}
