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
    unit_vector_from_plane_angles, GuidanceAstroSnafu, GuidanceError, InvalidObjectiveSnafu,
};
use crate::cosmic::{KeplerianElements, Orbit, UnsupportedEccentricitySnafu};
use crate::linalg::Vector3;
use crate::utils::between_pm_180;
use serde_derive::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use std::f64::consts::FRAC_PI_2 as half_pi;
use std::fmt;

/// The osculating elements which the Ruggiero law can control.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitalElement {
    Sma,
    Ecc,
    Inc,
    Raan,
    Aop,
}

impl OrbitalElement {
    /// Value of this element, in km for the SMA and in degrees for the angles
    pub fn value(&self, oe: &KeplerianElements) -> f64 {
        match self {
            Self::Sma => oe.sma,
            Self::Ecc => oe.ecc,
            Self::Inc => oe.inc.to_degrees(),
            Self::Raan => oe.raan.to_degrees(),
            Self::Aop => oe.aop.to_degrees(),
        }
    }

    /// Returns `to - from`, wrapped in [-180, 180] degrees for the angles.
    fn delta(&self, from: f64, to: f64) -> f64 {
        match self {
            Self::Sma | Self::Ecc => to - from,
            Self::Inc | Self::Raan | Self::Aop => between_pm_180(to - from),
        }
    }
}

impl fmt::Display for OrbitalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sma => "sma",
            Self::Ecc => "ecc",
            Self::Inc => "inc",
            Self::Raan => "raan",
            Self::Aop => "aop",
        };
        write!(f, "{name}")
    }
}

/// A desired value of an orbital element, in km for the SMA and degrees for the angles.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub element: OrbitalElement,
    pub desired: f64,
    pub tolerance: f64,
}

impl Objective {
    pub fn within_tolerance(element: OrbitalElement, desired: f64, tolerance: f64) -> Self {
        Self {
            element,
            desired,
            tolerance,
        }
    }

    /// Returns whether the osculating elements are within tolerance of this objective
    pub fn achieved(&self, oe: &KeplerianElements) -> bool {
        self.element
            .delta(self.element.value(oe), self.desired)
            .abs()
            < self.tolerance
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ± {}", self.element, self.desired, self.tolerance)
    }
}

/// Tolerances of a target orbit, used to build the objectives of the Ruggiero law.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitTolerances {
    pub sma_km: f64,
    pub ecc: f64,
    /// Tolerance on the inclination, RAAN and argument of periapsis in degrees
    pub angle_deg: f64,
}

impl Default for OrbitTolerances {
    fn default() -> Self {
        Self {
            sma_km: 20.0,
            ecc: 5e-5,
            angle_deg: 1e-2,
        }
    }
}

/// Ruggiero defines the closed loop guidance law from IEPC 2011-102
#[derive(Clone, Debug, PartialEq)]
pub struct Ruggiero {
    objectives: Vec<Objective>,
    /// Minimum efficiency to correct a given orbital element, zero means always correct
    eta_thresholds: Vec<f64>,
    /// Osculating elements when the law first steered the spacecraft
    init: Option<KeplerianElements>,
}

/// The Ruggiero is a locally optimal guidance law of a state for specific osculating elements.
/// NOTE: The efficiency parameter for AoP is NOT implemented: the paper's formulation is broken.
impl Ruggiero {
    pub fn new(objectives: &[Objective]) -> Result<Self, GuidanceError> {
        Self::with_eta_thresholds(objectives, &vec![0.0; objectives.len()])
    }

    pub fn with_eta_thresholds(
        objectives: &[Objective],
        eta_thresholds: &[f64],
    ) -> Result<Self, GuidanceError> {
        ensure!(
            !objectives.is_empty() && objectives.len() <= 5,
            InvalidObjectiveSnafu {
                msg: format!(
                    "must provide between 1 and 5 objectives (included), provided {}",
                    objectives.len()
                )
            }
        );
        ensure!(
            objectives.len() <= eta_thresholds.len(),
            InvalidObjectiveSnafu {
                msg: format!(
                    "must provide at least {} efficiency threshold values, provided {}",
                    objectives.len(),
                    eta_thresholds.len()
                )
            }
        );
        for (i, obj) in objectives.iter().enumerate() {
            ensure!(
                obj.tolerance > 0.0,
                InvalidObjectiveSnafu {
                    msg: format!("tolerance of {obj} must be positive")
                }
            );
            ensure!(
                !objectives[..i].iter().any(|o| o.element == obj.element),
                InvalidObjectiveSnafu {
                    msg: format!("{} targeted more than once", obj.element)
                }
            );
        }
        Ok(Self {
            objectives: objectives.to_vec(),
            eta_thresholds: eta_thresholds[..objectives.len()].to_vec(),
            init: None,
        })
    }

    /// Targets all five elements of the provided orbit, whose elements are in radians (the true anomaly is ignored).
    pub fn target(
        target: &KeplerianElements,
        tolerances: &OrbitTolerances,
    ) -> Result<Self, GuidanceError> {
        if !(0.0..1.0).contains(&target.ecc) {
            return Err(UnsupportedEccentricitySnafu { ecc: target.ecc }.build())
                .context(GuidanceAstroSnafu);
        }
        Self::new(&[
            Objective::within_tolerance(OrbitalElement::Sma, target.sma, tolerances.sma_km),
            Objective::within_tolerance(OrbitalElement::Ecc, target.ecc, tolerances.ecc),
            Objective::within_tolerance(
                OrbitalElement::Inc,
                target.inc.to_degrees(),
                tolerances.angle_deg,
            ),
            Objective::within_tolerance(
                OrbitalElement::Raan,
                target.raan.to_degrees(),
                tolerances.angle_deg,
            ),
            Objective::within_tolerance(
                OrbitalElement::Aop,
                target.aop.to_degrees(),
                tolerances.angle_deg,
            ),
        ])
    }

    /// Same as `target` but from an orbit, which must be closed.
    pub fn target_orbit(
        target: &Orbit,
        tolerances: &OrbitTolerances,
    ) -> Result<Self, GuidanceError> {
        let oe = target.elements();
        if oe.sma < 0.0 {
            return Err(UnsupportedEccentricitySnafu { ecc: oe.ecc }.build())
                .context(GuidanceAstroSnafu);
        }
        Self::target(&oe, tolerances)
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Returns the efficiency η ∈ [0; 1] of correcting a specific orbital element at the provided osculating orbit
    pub fn efficiency(element: OrbitalElement, osc: &Orbit, oe: &KeplerianElements) -> f64 {
        let e = oe.ecc;
        let ta = oe.ta;
        let aop = oe.aop;
        match element {
            OrbitalElement::Sma => {
                osc.vmag() * ((oe.sma * (1.0 - e)) / (osc.gm() * (1.0 + e))).sqrt()
            }
            OrbitalElement::Ecc => {
                let num = 1.0 + 2.0 * e * ta.cos() + ta.cos().powi(2);
                let denom = 1.0 + e * ta.cos();
                // Divided by two so that the maximum at ν = 0 is one
                num / (2.0 * denom)
            }
            OrbitalElement::Inc => {
                let num = (aop + ta).cos().abs()
                    * ((1.0 - e.powi(2) * aop.sin().powi(2)).sqrt() - e * aop.cos().abs());
                num / (1.0 + e * ta.cos())
            }
            OrbitalElement::Raan => {
                let num = (aop + ta).sin().abs()
                    * ((1.0 - e.powi(2) * aop.cos().powi(2)).sqrt() - e * aop.sin().abs());
                num / (1.0 + e * ta.cos())
            }
            OrbitalElement::Aop => 1.0,
        }
    }

    /// Computes the weight at which to correct this orbital element, will be zero if the current efficiency is below the threshold
    fn weighting(
        &self,
        obj: &Objective,
        osc: &Orbit,
        oe: &KeplerianElements,
        init: &KeplerianElements,
        eta_threshold: f64,
    ) -> f64 {
        let el = obj.element;
        let init_val = el.value(init);
        let osc_val = el.value(oe);
        let target = obj.desired;
        let tol = obj.tolerance;

        let eta = Self::efficiency(el, osc, oe);

        if el.delta(osc_val, target).abs() < tol || eta < eta_threshold {
            0.0
        } else {
            // Add the tolerance to the initial value if the parameter is to be kept fixed (i.e. target and initial are equal)
            let init_val = if el.delta(init_val, target).abs() < tol {
                init_val + tol
            } else {
                init_val
            };
            el.delta(osc_val, target) / el.delta(init_val, target).abs()
        }
    }

    /// Returns whether the guidance law has achieved all goals
    pub fn achieved(&self, osc: &Orbit) -> bool {
        let oe = osc.elements();
        self.objectives.iter().all(|obj| obj.achieved(&oe))
    }

    /// Returns the unit thrust direction in the RCN frame of the osculating orbit, or zero if there is nothing to correct.
    /// The first call records the initial osculating elements used to weight each objective.
    pub fn direction(&mut self, osc: &Orbit) -> Vector3<f64> {
        let oe = osc.elements();
        let init = *self.init.get_or_insert(oe);
        let (e, ta, aop) = (oe.ecc, oe.ta, oe.aop);
        let (sin_ta, cos_ta) = ta.sin_cos();
        let mut steering = Vector3::zeros();
        for (obj, eta_threshold) in self.objectives.iter().zip(&self.eta_thresholds) {
            let weight = self.weighting(obj, osc, &oe, &init, *eta_threshold);
            if weight.abs() <= 0.0 {
                continue;
            }

            match obj.element {
                OrbitalElement::Sma => {
                    let alpha = (e * sin_ta).atan2(1.0 + e * cos_ta);
                    steering += unit_vector_from_plane_angles(alpha, 0.0) * weight;
                }
                OrbitalElement::Ecc => {
                    let ea = 2.0
                        * ((1.0 - e).sqrt() * (ta / 2.0).sin())
                            .atan2((1.0 + e).sqrt() * (ta / 2.0).cos());
                    let alpha = sin_ta.atan2(cos_ta + ea.cos());
                    steering += unit_vector_from_plane_angles(alpha, 0.0) * weight;
                }
                OrbitalElement::Inc => {
                    let beta = half_pi.copysign((ta + aop).cos());
                    steering += unit_vector_from_plane_angles(0.0, beta) * weight;
                }
                OrbitalElement::Raan => {
                    let beta = half_pi.copysign((ta + aop).sin());
                    steering += unit_vector_from_plane_angles(0.0, beta) * weight;
                }
                OrbitalElement::Aop => {
                    let oe2 = 1.0 - e.powi(2);
                    let e3 = e.powi(3);
                    // Optimal true anomaly for in-plane thrusting
                    let sqrt_val = (0.25 * (oe2 / e3).powi(2) + 1.0 / 27.0).sqrt();
                    let opti_ta_alpha = ((oe2 / (2.0 * e3) + sqrt_val).powf(1.0 / 3.0)
                        - (-oe2 / (2.0 * e3) + sqrt_val).powf(1.0 / 3.0)
                        - 1.0 / e)
                        .acos();
                    // Optimal true anomaly for out of plane thrusting
                    let opti_ta_beta = (-e * aop.cos()).acos() - aop;
                    if (ta - opti_ta_alpha).abs() < (ta - opti_ta_beta).abs() {
                        let p = oe.semi_parameter();
                        let alpha = (-p * cos_ta).atan2((p + osc.rmag()) * sin_ta);
                        steering += unit_vector_from_plane_angles(alpha, 0.0) * weight;
                    } else {
                        let beta = half_pi.copysign(-(ta + aop).sin()) * oe.inc.cos();
                        steering += unit_vector_from_plane_angles(0.0, beta) * weight;
                    }
                }
            }
        }

        if steering.norm() > 0.0 {
            steering / steering.norm()
        } else {
            steering
        }
    }
}

impl fmt::Display for Ruggiero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objs: Vec<String> = self.objectives.iter().map(|o| format!("{o}")).collect();
        write!(f, "Ruggiero targeting {}", objs.join(", "))
    }
}
