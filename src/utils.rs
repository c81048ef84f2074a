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

use crate::linalg::{Matrix3, Vector3};
use std::f64::consts::TAU;

/// Rotation of a frame about the X axis, angle in radians.
pub fn r1(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation of a frame about the Y axis, angle in radians.
pub fn r2(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Rotation of a frame about the Z axis, angle in radians.
pub fn r3(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Returns the 3-1-3 Euler rotation R3(θ3)·R1(θ2)·R3(θ1).
pub fn r3r1r3(theta1: f64, theta2: f64, theta3: f64) -> Matrix3<f64> {
    r3(theta3) * r1(theta2) * r3(theta1)
}

/// Returns the DCM from the perifocal (PQW) frame to the inertial frame of the orbit.
/// All angles in radians.
pub fn pqw_to_inertial(inc: f64, raan: f64, aop: f64) -> Matrix3<f64> {
    r3r1r3(-aop, -inc, -raan)
}

/// Returns the provided angle bounded between 0.0 and 360.0
pub fn between_0_360(angle: f64) -> f64 {
    let mut bounded = angle % 360.0;
    if bounded < 0.0 {
        bounded += 360.0;
    }
    bounded
}

/// Returns the provided angle bounded between -180.0 and +180.0
pub fn between_pm_180(angle: f64) -> f64 {
    let mut bounded = between_0_360(angle);
    if bounded > 180.0 {
        bounded -= 360.0;
    }
    bounded
}

/// Returns the provided angle (in radians) bounded in [0, 2π)
pub fn between_0_tau(angle: f64) -> f64 {
    let mut bounded = angle % TAU;
    if bounded < 0.0 {
        bounded += TAU;
    }
    // Guards against -1e-17 % TAU + TAU rounding to TAU itself
    if bounded >= TAU {
        bounded -= TAU;
    }
    bounded
}

/// Converts a Cartesian vector into spherical coordinates [r, θ, φ] where θ is the polar angle
/// measured from +Z and φ the azimuth in radians. A zero vector returns a zero vector.
pub fn cartesian_to_spherical(v: &Vector3<f64>) -> Vector3<f64> {
    let r = v.norm();
    if r < f64::EPSILON {
        return Vector3::zeros();
    }
    let theta = (v[2] / r).clamp(-1.0, 1.0).acos();
    let phi = v[1].atan2(v[0]);
    Vector3::new(r, theta, phi)
}

/// Converts spherical coordinates [r, θ, φ] (see `cartesian_to_spherical`) into a Cartesian vector.
pub fn spherical_to_cartesian(s: &Vector3<f64>) -> Vector3<f64> {
    let (r, theta, phi) = (s[0], s[1], s[2]);
    if r.abs() < f64::EPSILON {
        return Vector3::zeros();
    }
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    Vector3::new(r * sin_t * cos_p, r * sin_t * sin_p, r * cos_t)
}

/// Returns the unit vector of the provided vector, or the zero vector if its norm is zero.
pub fn unit_vector(v: &Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n < f64::EPSILON {
        Vector3::zeros()
    } else {
        v / n
    }
}

/// Returns the acos of the input, clamped so that rounding errors never lead to NaN.
pub(crate) fn safe_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// Returns whether two angles (in radians) are equal modulo 2π, within the provided tolerance.
pub fn angles_equal(a: f64, b: f64, tol: f64) -> bool {
    let diff = between_0_tau(a - b);
    diff < tol || (TAU - diff) < tol
}
