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

use crate::cosmic::{CelestialBody, KeplerianElements};
use crate::linalg::{Vector3, Vector6};

/// Returns the time derivative of the classical orbital elements (a, e, i, Ω, ω, ν) under the provided perturbing
/// acceleration, given in its radial, circumferential and normal components (km/s^2).
///
/// Equations from Ruggiero et al. (IEPC 2011-102); the true anomaly rate follows Vallado, 4th edition, page 636.
/// When `j2` is set and the body has a non zero J2, the secular J2 rates of the RAAN and AoP are added.
///
/// The angles are not normalized here: they are only wrapped once the step is accepted.
pub fn gaussian_vop(
    oe: &KeplerianElements,
    body: &CelestialBody,
    f_rcn: &Vector3<f64>,
    j2: bool,
) -> Vector6<f64> {
    let (fr, fs, fw) = (f_rcn[0], f_rcn[1], f_rcn[2]);
    let p = oe.semi_parameter();
    let h = (body.gm * p).sqrt();
    let (sin_ta, cos_ta) = oe.ta.sin_cos();
    let r = p / (1.0 + oe.ecc * cos_ta);
    let (sin_i, cos_i) = oe.inc.sin_cos();
    let (sin_u, cos_u) = (oe.aop + oe.ta).sin_cos();

    let sma_dt = (2.0 * oe.sma.powi(2) / h) * (oe.ecc * sin_ta * fr + (p / r) * fs);
    let ecc_dt = (p * sin_ta * fr + fs * ((p + r) * cos_ta + r * oe.ecc)) / h;
    let inc_dt = fw * r * cos_u / h;
    let mut raan_dt = fw * r * sin_u / (h * sin_i);
    let mut aop_dt = (-p * cos_ta * fr + (p + r) * sin_ta * fs) / (h * oe.ecc) - raan_dt * cos_i;
    let ta_dt = h / r.powi(2) + (p * cos_ta * fr - (p + r) * sin_ta * fs) / (oe.ecc * h);

    if j2 && body.j2 > 0.0 {
        let n = (body.gm / oe.sma.powi(3)).sqrt();
        let ratio = (body.radius / p).powi(2);
        raan_dt += -1.5 * n * body.j2 * ratio * cos_i;
        aop_dt += 0.75 * n * body.j2 * ratio * (5.0 * cos_i.powi(2) - 1.0);
    }

    Vector6::new(sma_dt, ecc_dt, inc_dt, raan_dt, aop_dt, ta_dt)
}
