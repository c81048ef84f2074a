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

use crate::cosmic::{frames, Bodies, KeplerianElements, Orbit, Spacecraft, ECC_EPSILON};
use crate::dynamics::gauss::gaussian_vop;
use crate::dynamics::guidance::WaypointAction;
use crate::dynamics::propulsion::max_thrust;
use crate::dynamics::{two_body, DynamicsError, Perturbations, PropagatorKind};
use crate::errors::SmdError;
use crate::linalg::{Vector3, Vector6, Vector7};
use crate::propagators::{
    DynamicsSnafu, FixedStep, Integrable, IntegrationDetails, PropAstroSnafu, PropOpts,
    PropagationError,
};
use crate::time::{Duration, Epoch, Unit};
use crate::utils::between_0_tau;
use snafu::ResultExt;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use typed_builder::TypedBuilder;

mod history;
pub use history::{CsvSink, HistorySink, MemorySink, MissionState};
use history::HistoryStream;

mod status;
pub use status::MissionStatus;
use status::StatusReporter;

/// Collision is only cleared once the spacecraft is this far above the surface, as a fraction of the radius.
const REVIVAL_MARGIN: f64 = 1.01;

/// Options of a mission propagation.
#[derive(Clone, Debug, TypedBuilder)]
pub struct MissionOpts {
    #[builder(default)]
    pub propagator: PropagatorKind,
    #[builder(default)]
    pub perturbations: Perturbations,
    #[builder(default)]
    pub prop_opts: PropOpts,
    /// Number of states the history channel holds before the propagation blocks
    #[builder(default = 1000)]
    pub history_capacity: usize,
    /// Period of the status logs while propagating, none disables them
    #[builder(default_code = "Some(10.0 * Unit::Second)")]
    pub status_period: Option<Duration>,
}

impl Default for MissionOpts {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Cooperative cancellation of a propagation, polled once per accepted step. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissionPhase {
    Nominal,
    Collided,
    Done,
}

/// A spacecraft flying from a start epoch to an end epoch, following its waypoints.
///
/// If the end epoch is before the start epoch, the mission ends once all of the waypoints are cleared.
pub struct Mission {
    pub sc: Spacecraft,
    orbit: Orbit,
    /// Integrated state in Gaussian VOP mode, the orbit is regenerated from it
    elements: KeplerianElements,
    pub start: Epoch,
    pub end: Epoch,
    current: Epoch,
    opts: MissionOpts,
    /// Unit thrust direction in the RCN frame of the last committed orbit
    thrust_rcn: Vector3<f64>,
    collided: bool,
    /// Parent frame entered automatically on leaving the sphere of influence
    auto_switch: Option<Bodies>,
    done: bool,
    stop_handle: StopHandle,
    history: Option<HistoryStream>,
    snapshot: Arc<RwLock<MissionStatus>>,
}

impl Mission {
    pub fn new(sc: Spacecraft, orbit: Orbit, start: Epoch, end: Epoch, opts: MissionOpts) -> Self {
        if end < start {
            warn!("{}: no end date, propagating until all waypoints are cleared", sc.name);
        }
        let mut orbit = orbit;
        orbit.epoch = start;
        let status = MissionStatus {
            epoch: start,
            fuel_mass_kg: sc.fuel_mass_kg,
            orbit,
        };
        let mut me = Self {
            sc,
            elements: orbit.elements(),
            orbit,
            start,
            end,
            current: start,
            opts,
            thrust_rcn: Vector3::zeros(),
            collided: false,
            auto_switch: None,
            done: false,
            stop_handle: StopHandle::default(),
            history: None,
            snapshot: Arc::new(RwLock::new(status)),
        };
        me.update_guidance();
        me
    }

    /// Streams the history of this mission to the provided sink, on its own thread.
    pub fn with_history(mut self, sink: Box<dyn HistorySink>) -> Self {
        self.history = Some(HistoryStream::spawn(sink, self.opts.history_capacity));
        self
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    /// Osculating elements, exactly as integrated in Gaussian VOP mode
    pub fn elements(&self) -> KeplerianElements {
        match self.opts.propagator {
            PropagatorKind::GaussianVOP => self.elements,
            PropagatorKind::Cartesian => self.orbit.elements(),
        }
    }

    pub fn current(&self) -> Epoch {
        self.current
    }

    pub fn opts(&self) -> &MissionOpts {
        &self.opts
    }

    /// Thrust direction currently commanded, in the RCN frame
    pub fn thrust_direction(&self) -> Vector3<f64> {
        self.thrust_rcn
    }

    pub fn collided(&self) -> bool {
        self.collided
    }

    pub fn phase(&self) -> MissionPhase {
        if self.done {
            MissionPhase::Done
        } else if self.collided {
            MissionPhase::Collided
        } else {
            MissionPhase::Nominal
        }
    }

    /// Returns a handle which stops the propagation at the next step when triggered, from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    pub fn status(&self) -> MissionStatus {
        MissionStatus {
            epoch: self.current,
            fuel_mass_kg: self.sc.fuel_mass_kg,
            orbit: self.orbit,
        }
    }

    /// Epoch at `t` seconds from the start, landing exactly on the end epoch once reached
    fn epoch_at(&self, t: f64) -> Epoch {
        match self.final_time() {
            Some(tf) if t >= tf => self.end,
            _ => self.start + t * Unit::Second,
        }
    }

    fn log_status(&self) {
        info!("{}: {}", self.sc.name, self.status());
    }

    /// Propagates until the end epoch, or until all the waypoints are cleared if there is no end epoch.
    /// Returns once the history sink has recorded every state.
    pub fn propagate(&mut self) -> Result<IntegrationDetails, SmdError> {
        info!(
            "{}: propagating from {} ({:?}, {})",
            self.sc.name,
            self.start,
            self.opts.propagator,
            self.opts.prop_opts
        );
        self.log_status();
        let mut reporter = self.opts.status_period.map(|period| {
            StatusReporter::spawn(
                self.sc.name.clone(),
                Arc::clone(&self.snapshot),
                std::time::Duration::from_secs_f64(period.to_seconds().max(1e-3)),
            )
        });

        let v_init = self.orbit.vmag();
        let rslt = FixedStep::rk4(self.opts.prop_opts).solve(self);
        let v_final = self.orbit.vmag();

        if let Some(reporter) = reporter.as_mut() {
            reporter.stop();
        }
        self.finish();
        if let Some(history) = self.history.as_mut() {
            history.join()?;
        }
        let details = rslt?;

        let duration = self.current - self.start;
        let mut dur_str = format!("{duration}");
        if duration > 1.0 * Unit::Day {
            dur_str += &format!(" (~{:.1}d)", duration.to_unit(Unit::Day));
        }
        info!(
            "{}: finished after {dur_str} in {} steps, Δv = {:.6} km/s",
            self.sc.name,
            details.steps,
            (v_final - v_init).abs()
        );
        self.log_status();
        if self.sc.fuel_mass_kg < 0.0 {
            error!("{}: out of fuel, fuel mass is {:.3} kg", self.sc.name, self.sc.fuel_mass_kg);
        }
        Ok(details)
    }

    /// Marks the mission as done, records the last state and closes the history.
    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.emit();
        self.done = true;
        if let Some(history) = self.history.as_mut() {
            history.close();
        }
    }

    fn emit(&mut self) {
        if let Some(history) = self.history.as_mut() {
            history.send(MissionState {
                epoch: self.current,
                sc: self.sc.clone(),
                orbit: self.orbit,
            });
        }
    }

    /// Drops the cleared waypoints and computes the thrust direction from the active one, on the committed orbit.
    fn update_guidance(&mut self) {
        self.sc.pop_cleared_waypoints();
        let orbit = self.orbit;
        let epoch = self.current;
        let direction = match self.sc.waypoints.front_mut() {
            Some(wp) => {
                let (direction, cleared_now) = wp.allocate_thrust(&orbit, epoch);
                if cleared_now {
                    info!("{}: waypoint `{wp}` cleared at {epoch}", self.sc.name);
                    match wp.action() {
                        Some(WaypointAction::FrameSwitch(body))
                            if *body == orbit.origin && self.auto_switch == Some(*body) =>
                        {
                            debug!("{}: already switched to the {body} frame", self.sc.name);
                        }
                        Some(action) => self.sc.func_q.push(action.clone()),
                        None => {}
                    }
                }
                direction
            }
            None => Vector3::zeros(),
        };
        self.thrust_rcn = to_rcn(&orbit, &direction);
    }

    /// Recomputes the thrust direction of the active waypoint on the committed orbit, without clearing it.
    fn steer(&mut self) {
        let orbit = self.orbit;
        let direction = match self.sc.waypoints.front() {
            Some(wp) => wp.clone().allocate_thrust(&orbit, self.current).0,
            None => Vector3::zeros(),
        };
        self.thrust_rcn = to_rcn(&orbit, &direction);
    }

    /// Executes the action, returning whether the frame of the orbit changed.
    fn execute(&mut self, action: WaypointAction) -> Result<bool, PropagationError> {
        debug!("{}: executing `{action}`", self.sc.name);
        match action {
            WaypointAction::FrameSwitch(body) => {
                let prev = self.orbit.origin;
                self.orbit = frames::switch(&self.orbit, body).context(PropAstroSnafu)?;
                self.elements = self.orbit.elements();
                info!("{}: switched from {prev} to {body} frame at {}", self.sc.name, self.current);
                Ok(true)
            }
            WaypointAction::AddCargo(cargo) => {
                self.sc.add_cargo(cargo);
                Ok(false)
            }
            WaypointAction::DropCargo(name) => {
                self.sc.drop_cargo(&name);
                Ok(false)
            }
        }
    }

    /// Returns the thrust acceleration magnitude (km/s^2) and the mass flow (kg/s) for the provided fuel mass.
    fn propulsion(&self, fuel_mass_kg: f64) -> Result<(f64, f64), PropagationError> {
        if self.thrust_rcn.norm() <= 0.0 {
            return Ok((0.0, 0.0));
        }
        let (thrust_n, flow_kg_s) =
            max_thrust(&self.sc.thrusters, &self.sc.eps).context(DynamicsSnafu)?;
        let mass_kg = self.sc.dry_mass_kg + self.sc.cargo_mass_kg() + fuel_mass_kg;
        Ok((thrust_n / mass_kg * 1e-3, flow_kg_s))
    }
}

/// Expresses an inertial direction in the RCN frame of the orbit
fn to_rcn(orbit: &Orbit, direction: &Vector3<f64>) -> Vector3<f64> {
    if direction.norm() > 0.0 {
        orbit.dcm_from_rcn_to_inertial().transpose() * direction
    } else {
        Vector3::zeros()
    }
}

impl Integrable for Mission {
    fn get_state(&self) -> Vector7<f64> {
        let orbital = match self.opts.propagator {
            PropagatorKind::GaussianVOP => self.elements.to_vector(),
            PropagatorKind::Cartesian => self.orbit.to_cartesian_vec(),
        };
        let mut state = Vector7::zeros();
        state.fixed_rows_mut::<6>(0).copy_from(&orbital);
        state[6] = self.sc.fuel_mass_kg;
        state
    }

    fn derivative(&self, t: f64, state: &Vector7<f64>) -> Result<Vector7<f64>, PropagationError> {
        let epoch = self.epoch_at(t);
        let origin = self.orbit.origin;
        let (accel, flow_kg_s) = self.propulsion(state[6])?;
        let orbital: Vector6<f64> = state.fixed_rows::<6>(0).into_owned();

        let mut d = Vector7::zeros();
        match self.opts.propagator {
            PropagatorKind::Cartesian => {
                let r = orbital.fixed_rows::<3>(0).into_owned();
                let v = orbital.fixed_rows::<3>(3).into_owned();
                let osc = Orbit::from_vectors(&r, &v, epoch, origin);
                let pert = self.opts.perturbations.perturb(&osc, epoch, PropagatorKind::Cartesian);
                let mut a = two_body(&r, origin.body().gm) + pert.fixed_rows::<3>(0);
                if accel > 0.0 {
                    a += self.orbit.dcm_from_rcn_to_inertial() * self.thrust_rcn * accel;
                }
                d.fixed_rows_mut::<3>(0).copy_from(&v);
                d.fixed_rows_mut::<3>(3).copy_from(&a);
            }
            PropagatorKind::GaussianVOP => {
                let oe = KeplerianElements::from_vector(&orbital);
                let osc = Orbit::from_elements_unchecked(&oe, epoch, origin);
                let pert =
                    self.opts.perturbations.perturb(&osc, epoch, PropagatorKind::GaussianVOP);
                let f_rcn = self.thrust_rcn * accel + pert.fixed_rows::<3>(0);
                let d_oe = gaussian_vop(&oe, origin.body(), &f_rcn, self.opts.perturbations.j2);
                d.fixed_rows_mut::<6>(0).copy_from(&d_oe);
            }
        }
        d[6] = -flow_kg_s;

        for (index, value) in d.iter().enumerate() {
            if !value.is_finite() {
                return Err(PropagationError::Dynamics {
                    source: DynamicsError::NonFiniteDerivative {
                        index,
                        value: *value,
                        epoch,
                    },
                });
            }
        }
        Ok(d)
    }

    fn set_state(&mut self, t: f64, state: &Vector7<f64>) -> Result<(), PropagationError> {
        // The history records the state as it was before this step
        self.emit();

        self.current = self.epoch_at(t);
        let origin = self.orbit.origin;
        match self.opts.propagator {
            PropagatorKind::GaussianVOP => {
                let mut oe = KeplerianElements::from_vector(&state.fixed_rows::<6>(0).into_owned());
                oe.ecc = oe.ecc.abs();
                oe.inc = between_0_tau(oe.inc);
                oe.raan = between_0_tau(oe.raan);
                oe.aop = between_0_tau(oe.aop);
                oe.ta = between_0_tau(oe.ta);
                self.elements = oe;
                self.orbit = Orbit::from_elements_unchecked(&oe, self.current, origin);
            }
            PropagatorKind::Cartesian => {
                let r = state.fixed_rows::<3>(0).into_owned();
                let v = state.fixed_rows::<3>(3).into_owned();
                self.orbit = Orbit::from_vectors(&r, &v, self.current, origin);
            }
        }

        let fuel_mass_kg = state[6];
        if self.sc.fuel_mass_kg > 0.0 && fuel_mass_kg <= 0.0 {
            error!("{}: no more fuel at {}", self.sc.name, self.current);
        }
        self.sc.fuel_mass_kg = fuel_mass_kg;

        self.update_guidance();

        let body = origin.body();
        let rmag = self.orbit.rmag();
        // Elements are singular for parabolic orbits, Cartesian states are not
        let near_parabolic = match self.opts.propagator {
            PropagatorKind::GaussianVOP => (self.elements.ecc - 1.0).abs() < ECC_EPSILON,
            PropagatorKind::Cartesian => false,
        };
        if !self.collided && rmag < body.radius {
            self.collided = true;
            error!("{}: collided with {origin} at {}", self.sc.name, self.current);
        } else if self.collided && rmag > body.radius * REVIVAL_MARGIN {
            self.collided = false;
            error!("{}: revived above {origin} at {}", self.sc.name, self.current);
        } else if !origin.is_sun() && (body.outside_soi(rmag) || near_parabolic) {
            if let Some(parent) = body.parent {
                self.sc.func_q.push(WaypointAction::FrameSwitch(parent));
                self.auto_switch = Some(parent);
            }
        }

        let queued = self.sc.func_q.drain();
        if !queued.is_empty() {
            trace!("{}: {} queued action(s)", self.sc.name, queued.len());
        }
        let mut switched = false;
        for action in queued {
            switched |= self.execute(action)?;
        }
        if switched {
            self.steer();
        }

        let status = self.status();
        if let Ok(mut snapshot) = self.snapshot.write() {
            *snapshot = status;
        }
        Ok(())
    }

    fn stop(&mut self, t: f64) -> bool {
        if self.done {
            return true;
        }
        let stop = if self.stop_handle.is_stopped() {
            info!("{}: stop requested at {}", self.sc.name, self.current);
            true
        } else if self.end < self.start {
            self.sc.waypoints_cleared()
        } else {
            t >= (self.end - self.start).to_seconds()
        };
        if stop {
            self.finish();
        }
        stop
    }

    fn final_time(&self) -> Option<f64> {
        if self.end >= self.start {
            Some((self.end - self.start).to_seconds())
        } else {
            None
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} from {} to {} ({:?})", self.sc, self.start, self.end, self.opts.propagator)
    }
}
