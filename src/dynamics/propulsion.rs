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

use super::{DynamicsError, PowerBudgetExceededSnafu};
use crate::cosmic::STD_GRAVITY;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;

/// How a thruster converts its input power into thrust.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ThrustModel {
    /// Constant thrust (N) and specific impulse (s)
    Fixed { thrust_n: f64, isp_s: f64 },
    /// Thrust computed from the input power with T = 2ηP / (g0 Isp), where the efficiency η is linearly interpolated
    /// from the (power in W, efficiency) points of the curve.
    Efficiency { isp_s: f64, curve: Vec<(f64, f64)> },
}

/// An electric thruster running at its maximum operating point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thruster {
    pub name: String,
    /// Operating voltage in V
    #[serde(default)]
    pub voltage_v: f64,
    /// Power drawn at the operating point in W
    #[serde(default)]
    pub power_w: f64,
    pub model: ThrustModel,
}

impl Thruster {
    /// A generic electric thruster with a fixed thrust and Isp, and which draws no power from the EPS.
    pub fn generic(name: &str, thrust_n: f64, isp_s: f64) -> Self {
        Self {
            name: name.to_string(),
            voltage_v: 0.0,
            power_w: 0.0,
            model: ThrustModel::Fixed { thrust_n, isp_s },
        }
    }

    /// A thruster whose thrust is computed from its efficiency at the provided operating point.
    pub fn with_efficiency(
        name: &str,
        voltage_v: f64,
        power_w: f64,
        isp_s: f64,
        curve: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            name: name.to_string(),
            voltage_v,
            power_w,
            model: ThrustModel::Efficiency { isp_s, curve },
        }
    }

    pub fn isp_s(&self) -> f64 {
        match self.model {
            ThrustModel::Fixed { isp_s, .. } | ThrustModel::Efficiency { isp_s, .. } => isp_s,
        }
    }

    /// Returns the exhaust velocity v_e in meters per second
    pub fn exhaust_velocity_m_s(&self) -> f64 {
        self.isp_s() * STD_GRAVITY
    }

    /// Efficiency at the operating power of this thruster
    pub fn efficiency(&self) -> f64 {
        match &self.model {
            ThrustModel::Fixed { thrust_n, .. } => {
                if self.power_w > 0.0 {
                    thrust_n * self.exhaust_velocity_m_s() / (2.0 * self.power_w)
                } else {
                    1.0
                }
            }
            ThrustModel::Efficiency { curve, .. } => interpolate(curve, self.power_w),
        }
    }

    /// Thrust in Newtons at the operating point
    pub fn thrust_n(&self) -> f64 {
        match &self.model {
            ThrustModel::Fixed { thrust_n, .. } => *thrust_n,
            ThrustModel::Efficiency { .. } => {
                2.0 * self.efficiency() * self.power_w / self.exhaust_velocity_m_s()
            }
        }
    }

    /// Fuel mass flow in kg/s at the operating point
    pub fn mass_flow_kg_s(&self) -> f64 {
        self.thrust_n() / self.exhaust_velocity_m_s()
    }
}

fn interpolate(curve: &[(f64, f64)], x: f64) -> f64 {
    match curve {
        [] => 0.0,
        [(_, y)] => *y,
        _ => {
            if x <= curve[0].0 {
                return curve[0].1;
            }
            for pair in curve.windows(2) {
                let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
                if x <= x1 {
                    return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
                }
            }
            curve[curve.len() - 1].1
        }
    }
}

/// Electrical power system of the spacecraft.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Eps {
    #[default]
    Unlimited,
    /// Maximum power available to the thrusters in W
    Capped { power_w: f64 },
}

impl Eps {
    /// Checks that the power system can provide the requested power.
    pub fn draw(&self, draw_w: f64) -> Result<(), DynamicsError> {
        if let Self::Capped { power_w } = self {
            ensure!(
                draw_w <= *power_w,
                PowerBudgetExceededSnafu {
                    draw_w,
                    available_w: *power_w
                }
            );
        }
        Ok(())
    }
}

/// Returns the total thrust (N) and fuel mass flow (kg/s) of all of the thrusters firing at their operating point,
/// or an error if the power system cannot sustain them.
pub fn max_thrust(thrusters: &[Thruster], eps: &Eps) -> Result<(f64, f64), DynamicsError> {
    let draw_w: f64 = thrusters.iter().map(|t| t.power_w).sum();
    eps.draw(draw_w)?;
    Ok(thrusters.iter().fold((0.0, 0.0), |(thrust, flow), t| {
        (thrust + t.thrust_n(), flow + t.mass_flow_kg_s())
    }))
}
