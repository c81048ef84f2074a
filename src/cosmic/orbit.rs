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

use super::{
    AstroError, Bodies, InvalidRadiiSnafu, TrueAnomalySingularSnafu, UnsupportedEccentricitySnafu,
};
use crate::linalg::{Matrix3, Vector3, Vector6};
use crate::time::{Duration, Epoch, Unit};
use crate::utils::{between_0_tau, pqw_to_inertial, safe_acos};
use snafu::ensure;
use std::f64::consts::TAU;
use std::fmt;

/// Below this value, the true anomaly is considered to be zero and the Keplerian conversion is refused.
pub const TA_EPSILON: f64 = 1e-10;
/// Below this value, an orbit is considered circular or equatorial in the elements computation.
const DEGENERATE_EPSILON: f64 = 1e-11;

/// Classical orbital elements, all angles in radians.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeplerianElements {
    /// Semi major axis in km
    pub sma: f64,
    pub ecc: f64,
    pub inc: f64,
    pub raan: f64,
    pub aop: f64,
    pub ta: f64,
}

impl KeplerianElements {
    pub fn new(sma: f64, ecc: f64, inc: f64, raan: f64, aop: f64, ta: f64) -> Self {
        Self {
            sma,
            ecc,
            inc,
            raan,
            aop,
            ta,
        }
    }

    /// Builds the elements from a vector ordered as a, e, i, Ω, ω, ν
    pub fn from_vector(v: &Vector6<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    /// Returns the elements as a vector ordered as a, e, i, Ω, ω, ν
    pub fn to_vector(&self) -> Vector6<f64> {
        Vector6::new(self.sma, self.ecc, self.inc, self.raan, self.aop, self.ta)
    }

    /// Semi parameter (semi latus rectum) in km
    pub fn semi_parameter(&self) -> f64 {
        self.sma * (1.0 - self.ecc.powi(2))
    }

    /// Returns whether the elements can be converted into a Cartesian state without singularity.
    pub fn validate(&self) -> Result<(), AstroError> {
        ensure!(
            (0.0..1.0).contains(&self.ecc),
            UnsupportedEccentricitySnafu { ecc: self.ecc }
        );
        let ta = between_0_tau(self.ta);
        ensure!(
            ta >= TA_EPSILON && TAU - ta >= TA_EPSILON,
            TrueAnomalySingularSnafu { ta_rad: self.ta }
        );
        Ok(())
    }
}

/// Orbit defines an orbital state around one of the registered bodies.
///
/// Regardless of the constructor used, this struct stores all the state information in Cartesian coordinates
/// as these are always non singular. The frame is the equatorial frame of the origin, or the ecliptic J2000
/// frame when the origin is the Sun.
#[derive(Copy, Clone, Debug)]
pub struct Orbit {
    /// in km
    pub x: f64,
    /// in km
    pub y: f64,
    /// in km
    pub z: f64,
    /// in km/s
    pub vx: f64,
    /// in km/s
    pub vy: f64,
    /// in km/s
    pub vz: f64,
    pub epoch: Epoch,
    pub origin: Bodies,
}

impl Orbit {
    /// Creates a new Orbit around the provided body at the provided Epoch.
    ///
    /// **Units:** km, km, km, km/s, km/s, km/s
    #[allow(clippy::too_many_arguments)]
    pub fn cartesian(
        x: f64,
        y: f64,
        z: f64,
        vx: f64,
        vy: f64,
        vz: f64,
        epoch: Epoch,
        origin: Bodies,
    ) -> Self {
        Self {
            x,
            y,
            z,
            vx,
            vy,
            vz,
            epoch,
            origin,
        }
    }

    /// Creates a new Orbit from the radius and velocity vectors.
    pub fn from_vectors(r: &Vector3<f64>, v: &Vector3<f64>, epoch: Epoch, origin: Bodies) -> Self {
        Self::cartesian(r[0], r[1], r[2], v[0], v[1], v[2], epoch, origin)
    }

    /// Creates a new Orbit around the provided body from the Keplerian orbital elements.
    ///
    /// **Units:** km, none, degrees, degrees, degrees, degrees
    ///
    /// Fails if the true anomaly is zero (modulo 360 degrees) or if the orbit is not circular or elliptical.
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian(
        sma: f64,
        ecc: f64,
        inc: f64,
        raan: f64,
        aop: f64,
        ta: f64,
        epoch: Epoch,
        origin: Bodies,
    ) -> Result<Self, AstroError> {
        let elements = KeplerianElements::new(
            sma,
            ecc,
            inc.to_radians(),
            raan.to_radians(),
            aop.to_radians(),
            ta.to_radians(),
        );
        Self::from_elements(&elements, epoch, origin)
    }

    /// Creates a new Orbit from elements in radians, failing on the same singularities as `keplerian`.
    pub fn from_elements(
        elements: &KeplerianElements,
        epoch: Epoch,
        origin: Bodies,
    ) -> Result<Self, AstroError> {
        elements.validate()?;
        Ok(Self::from_elements_unchecked(elements, epoch, origin))
    }

    /// Creates a new Orbit from elements in radians without checking the singularities.
    /// Used while propagating the elements, when passing through ν = 0 is perfectly valid.
    pub(crate) fn from_elements_unchecked(
        elements: &KeplerianElements,
        epoch: Epoch,
        origin: Bodies,
    ) -> Self {
        let (r, v) = elements_to_cartesian(
            origin.body().gm,
            elements.sma,
            elements.ecc,
            elements.inc,
            elements.raan,
            elements.aop,
            elements.ta,
        );
        Self::from_vectors(&r, &v, epoch, origin)
    }

    /// Returns the gravitational parameter of the origin of this orbit in km^3/s^2
    pub fn gm(&self) -> f64 {
        self.origin.body().gm
    }

    /// Returns the radius vector of this Orbit in [km, km, km]
    pub fn radius(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Returns the velocity vector of this Orbit in [km/s, km/s, km/s]
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.vx, self.vy, self.vz)
    }

    /// Returns the magnitude of the radius vector in km
    pub fn rmag(&self) -> f64 {
        self.radius().norm()
    }

    /// Returns the magnitude of the velocity vector in km/s
    pub fn vmag(&self) -> f64 {
        self.velocity().norm()
    }

    /// Returns this state as a Cartesian Vector6 in [km, km, km, km/s, km/s, km/s]
    pub fn to_cartesian_vec(&self) -> Vector6<f64> {
        Vector6::new(self.x, self.y, self.z, self.vx, self.vy, self.vz)
    }

    /// Returns the orbital momentum vector
    pub fn hvec(&self) -> Vector3<f64> {
        self.radius().cross(&self.velocity())
    }

    /// Returns the norm of the orbital momentum
    pub fn hmag(&self) -> f64 {
        self.hvec().norm()
    }

    /// Returns the specific mechanical energy in km^2/s^2
    pub fn energy(&self) -> f64 {
        self.vmag().powi(2) / 2.0 - self.gm() / self.rmag()
    }

    /// Returns the semi-major axis in km
    pub fn sma(&self) -> f64 {
        -self.gm() / (2.0 * self.energy())
    }

    /// Returns the eccentricity vector (no unit)
    pub fn evec(&self) -> Vector3<f64> {
        let r = self.radius();
        let v = self.velocity();
        ((v.norm_squared() - self.gm() / r.norm()) * r - (r.dot(&v)) * v) / self.gm()
    }

    /// Returns the eccentricity (no unit)
    pub fn ecc(&self) -> f64 {
        self.evec().norm()
    }

    /// Returns the semi parameter (or semilatus rectum) in km
    pub fn semi_parameter(&self) -> f64 {
        self.hmag().powi(2) / self.gm()
    }

    /// Returns the radius of periapsis in km
    pub fn periapsis(&self) -> f64 {
        self.sma() * (1.0 - self.ecc())
    }

    /// Returns the radius of apoapsis in km
    pub fn apoapsis(&self) -> f64 {
        self.sma() * (1.0 + self.ecc())
    }

    /// Returns the orbital period, only meaningful for closed orbits
    pub fn period(&self) -> Duration {
        TAU * (self.sma().powi(3) / self.gm()).sqrt() * Unit::Second
    }

    /// Returns the classical orbital elements in radians.
    ///
    /// The right ascension uses the sign of the second component of the node vector, the argument of periapsis the
    /// sign of the out of plane component of the eccentricity vector, and the true anomaly the sign of r·v.
    /// Equatorial orbits have a zero RAAN and circular orbits a zero argument of periapsis.
    pub fn elements(&self) -> KeplerianElements {
        let r = self.radius();
        let v = self.velocity();
        let h = self.hvec();
        let node = Vector3::new(-h[1], h[0], 0.0);
        let evec = self.evec();
        let ecc = evec.norm();
        let sma = self.sma();
        let inc = safe_acos(h[2] / h.norm());

        let equatorial = node.norm() < DEGENERATE_EPSILON * h.norm();
        let circular = ecc < DEGENERATE_EPSILON;

        let raan = if equatorial {
            0.0
        } else {
            let raan = safe_acos(node[0] / node.norm());
            if node[1] < 0.0 {
                TAU - raan
            } else {
                raan
            }
        };

        // Reference direction of the periapsis in the orbital plane
        let line_of_nodes = if equatorial {
            Vector3::x()
        } else {
            node / node.norm()
        };

        let aop = if circular {
            0.0
        } else {
            let aop = safe_acos(line_of_nodes.dot(&evec) / ecc);
            let flip = if equatorial {
                evec[1] * h[2].signum() < 0.0
            } else {
                evec[2] < 0.0
            };
            if flip {
                TAU - aop
            } else {
                aop
            }
        };

        let ta = if circular {
            // Argument of latitude
            let u = safe_acos(line_of_nodes.dot(&r) / r.norm());
            let flip = if equatorial {
                r[1] * h[2].signum() < 0.0
            } else {
                r[2] < 0.0
            };
            if flip {
                TAU - u
            } else {
                u
            }
        } else {
            let ta = safe_acos(evec.dot(&r) / (ecc * r.norm()));
            if r.dot(&v) < 0.0 {
                TAU - ta
            } else {
                ta
            }
        };

        KeplerianElements::new(sma, ecc, inc, raan, aop, ta)
    }

    /// Returns the inclination in degrees
    pub fn inc_deg(&self) -> f64 {
        self.elements().inc.to_degrees()
    }

    /// Returns the right ascension of the ascending node in degrees
    pub fn raan_deg(&self) -> f64 {
        self.elements().raan.to_degrees()
    }

    /// Returns the argument of periapsis in degrees
    pub fn aop_deg(&self) -> f64 {
        self.elements().aop.to_degrees()
    }

    /// Returns the true anomaly in degrees
    pub fn ta_deg(&self) -> f64 {
        self.elements().ta.to_degrees()
    }

    /// Returns the DCM to rotate a vector from the radial, circumferential, normal frame of this orbit to its inertial frame.
    pub fn dcm_from_rcn_to_inertial(&self) -> Matrix3<f64> {
        let r_hat = self.radius() / self.rmag();
        let n_hat = self.hvec() / self.hmag();
        let c_hat = n_hat.cross(&r_hat);
        Matrix3::from_columns(&[r_hat, c_hat, n_hat])
    }

    /// Returns whether both orbits are in the same frame at the same epoch, and their states within the tolerances.
    pub fn eq_within(&self, other: &Self, radial_tol_km: f64, velocity_tol_km_s: f64) -> bool {
        self.epoch == other.epoch
            && self.origin == other.origin
            && (self.radius() - other.radius()).amax() < radial_tol_km
            && (self.velocity() - other.velocity()).amax() < velocity_tol_km_s
    }
}

impl PartialEq for Orbit {
    /// Two states are equal if their position are equal within one centimeter and their velocities within one centimeter per second.
    fn eq(&self, other: &Orbit) -> bool {
        self.eq_within(other, 1e-5, 1e-5)
    }
}

impl fmt::Display for Orbit {
    // Prints the Keplerian orbital elements with units
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let oe = self.elements();
        write!(
            f,
            "[{}] {}\tsma = {:.6} km\tecc = {:.6}\tinc = {:.6} deg\traan = {:.6} deg\taop = {:.6} deg\tta = {:.6} deg",
            self.origin,
            self.epoch,
            oe.sma,
            oe.ecc,
            oe.inc.to_degrees(),
            oe.raan.to_degrees(),
            oe.aop.to_degrees(),
            oe.ta.to_degrees()
        )
    }
}

impl fmt::LowerExp for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] {}\tposition = [{:e}, {:e}, {:e}] km\tvelocity = [{:e}, {:e}, {:e}] km/s",
            self.origin, self.epoch, self.x, self.y, self.z, self.vx, self.vy, self.vz
        )
    }
}

/// Computes the position and velocity from the classical elements (radians) in the frame of the elements.
pub(crate) fn elements_to_cartesian(
    gm: f64,
    sma: f64,
    ecc: f64,
    inc: f64,
    raan: f64,
    aop: f64,
    ta: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let p = sma * (1.0 - ecc.powi(2));
    let (sin_ta, cos_ta) = ta.sin_cos();
    let radius = p / (1.0 + ecc * cos_ta);
    let sqrt_gm_p = (gm / p).sqrt();
    let r_pqw = Vector3::new(radius * cos_ta, radius * sin_ta, 0.0);
    let v_pqw = Vector3::new(-sqrt_gm_p * sin_ta, sqrt_gm_p * (ecc + cos_ta), 0.0);
    let dcm = pqw_to_inertial(inc, raan, aop);
    (dcm * r_pqw, dcm * v_pqw)
}

/// Returns the semi major axis (km) and the eccentricity from the apoapsis and periapsis radii (km).
pub fn radii_to_sma_ecc(r_apo: f64, r_peri: f64) -> Result<(f64, f64), AstroError> {
    ensure!(r_apo >= r_peri, InvalidRadiiSnafu { r_apo, r_peri });
    let sma = (r_peri + r_apo) / 2.0;
    let ecc = (r_apo - r_peri) / (r_apo + r_peri);
    Ok((sma, ecc))
}
