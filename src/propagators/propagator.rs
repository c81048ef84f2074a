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

use super::{Integrable, IntegrationDetails, PropOpts, PropagationError, RK, RK4Fixed};
use crate::linalg::Vector7;
use crate::time::Unit;
use std::marker::PhantomData;

/// A fixed step integrator driving an `Integrable` until it requests to stop.
#[derive(Clone, Copy, Debug)]
pub struct FixedStep<M: RK = RK4Fixed> {
    pub opts: PropOpts,
    _method: PhantomData<M>,
}

impl FixedStep<RK4Fixed> {
    /// Default propagator is an RK4 with a ten second step.
    pub fn rk4(opts: PropOpts) -> Self {
        Self::new(opts)
    }
}

impl Default for FixedStep<RK4Fixed> {
    fn default() -> Self {
        Self::rk4(PropOpts::default())
    }
}

impl<M: RK> FixedStep<M> {
    pub fn new(opts: PropOpts) -> Self {
        Self {
            opts,
            _method: PhantomData,
        }
    }

    /// Integrates until `stop` returns true, checking it before each step.
    /// If the integrable knows its final time, the last step is shortened to land exactly on it.
    pub fn solve<I: Integrable>(
        &self,
        model: &mut I,
    ) -> Result<IntegrationDetails, PropagationError> {
        let step_s = self.opts.step.to_seconds();
        let mut details = IntegrationDetails {
            step: self.opts.step,
            ..Default::default()
        };
        let mut t = 0.0;
        while !model.stop(t) {
            let mut h = step_s;
            let mut next_t = t + h;
            if let Some(tf) = model.final_time() {
                if next_t > tf {
                    h = tf - t;
                    next_t = tf;
                }
            }
            if h <= 0.0 {
                break;
            }
            let state = model.get_state();
            let next_state = self.derive(model, t, &state, h)?;
            t = next_t;
            model.set_state(t, &next_state)?;
            details.step = h * Unit::Second;
            details.steps += 1;
        }
        details.t = t;
        Ok(details)
    }

    /// Computes y_{n+1} from the tableau of the method. Everything passed to this function is in **seconds**.
    fn derive<I: Integrable>(
        &self,
        model: &I,
        t: f64,
        state: &Vector7<f64>,
        step_size: f64,
    ) -> Result<Vector7<f64>, PropagationError> {
        let stages = M::stages();
        let mut k: Vec<Vector7<f64>> = Vec::with_capacity(stages);
        k.push(model.derivative(t, state)?);
        let mut a_idx: usize = 0;
        for i in 0..(stages - 1) {
            // Let's compute the c_i by summing the relevant items from the list of coefficients.
            // \sum_{j=1}^{i-1} a_ij  ∀ i ∈ [2, s]
            let mut ci: f64 = 0.0;
            // The wi stores the a_{s1} * k_1 + a_{s2} * k_2 + ... + a_{s, s-1} * k_{s-1} +
            let mut wi = Vector7::zeros();
            for kj in &k[0..i + 1] {
                let a_ij = M::a_coeffs()[a_idx];
                ci += a_ij;
                wi += a_ij * kj;
                a_idx += 1;
            }
            k.push(model.derivative(t + ci * step_size, &(state + step_size * wi))?);
        }
        let mut next_state = *state;
        for (b_i, ki) in M::b_coeffs().iter().zip(&k) {
            next_state += step_size * b_i * ki;
        }
        Ok(next_state)
    }
}
