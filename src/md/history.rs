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

use crate::cosmic::{Orbit, Spacecraft};
use crate::errors::SmdError;
use crate::time::Epoch;
use serde_derive::Serialize;
use std::fmt;
use std::fs::File;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Snapshot of a mission at a given epoch, as streamed to the history sink.
#[derive(Clone, Debug)]
pub struct MissionState {
    pub epoch: Epoch,
    pub sc: Spacecraft,
    pub orbit: Orbit,
}

impl fmt::Display for MissionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\tfuel = {:.3} kg\t{}", self.epoch, self.sc.fuel_mass_kg, self.orbit)
    }
}

/// A consumer of the mission history. It runs on its own thread and receives every state in order.
pub trait HistorySink: Send {
    fn record(&mut self, state: MissionState);

    /// Called once, after the last state was recorded
    fn close(&mut self) {}
}

/// Keeps the whole history in memory. Clones share the same storage, so a clone kept by the caller
/// can inspect what the mission streamed.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    states: Arc<Mutex<Vec<MissionState>>>,
}

impl MemorySink {
    /// Returns a copy of all of the states recorded so far
    pub fn states(&self) -> Vec<MissionState> {
        match self.states.lock() {
            Ok(states) => states.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.states.lock() {
            Ok(states) => states.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistorySink for MemorySink {
    fn record(&mut self, state: MissionState) {
        match self.states.lock() {
            Ok(mut states) => states.push(state),
            Err(poisoned) => poisoned.into_inner().push(state),
        }
    }
}

#[derive(Serialize)]
struct CsvRow {
    epoch: String,
    frame: String,
    x_km: f64,
    y_km: f64,
    z_km: f64,
    vx_km_s: f64,
    vy_km_s: f64,
    vz_km_s: f64,
    sma_km: f64,
    ecc: f64,
    inc_deg: f64,
    raan_deg: f64,
    aop_deg: f64,
    ta_deg: f64,
    fuel_mass_kg: f64,
    mass_kg: f64,
}

impl From<&MissionState> for CsvRow {
    fn from(state: &MissionState) -> Self {
        let o = &state.orbit;
        Self {
            epoch: format!("{}", state.epoch),
            frame: format!("{}", o.origin),
            x_km: o.x,
            y_km: o.y,
            z_km: o.z,
            vx_km_s: o.vx,
            vy_km_s: o.vy,
            vz_km_s: o.vz,
            sma_km: o.sma(),
            ecc: o.ecc(),
            inc_deg: o.inc_deg(),
            raan_deg: o.raan_deg(),
            aop_deg: o.aop_deg(),
            ta_deg: o.ta_deg(),
            fuel_mass_kg: state.sc.fuel_mass_kg,
            mass_kg: state.sc.mass_kg(),
        }
    }
}

/// Writes each state as a row of a CSV file, with the Cartesian state, the orbital elements in degrees and the masses.
pub struct CsvSink {
    csv_out: csv::Writer<File>,
    path: String,
}

impl CsvSink {
    pub fn new(path: &str) -> Result<Self, SmdError> {
        match csv::Writer::from_path(path) {
            Ok(wtr) => {
                info!("Saving history to {path}");
                Ok(Self {
                    csv_out: wtr,
                    path: path.to_string(),
                })
            }
            Err(e) => Err(SmdError::ExportError { msg: e.to_string() }),
        }
    }
}

impl HistorySink for CsvSink {
    fn record(&mut self, state: MissionState) {
        if let Err(e) = self.csv_out.serialize(CsvRow::from(&state)) {
            error!("could not write state at {} to {}: {e}", state.epoch, self.path);
        }
    }

    fn close(&mut self) {
        if let Err(e) = self.csv_out.flush() {
            error!("could not flush {}: {e}", self.path);
        }
    }
}

/// Producer side of the history: a bounded channel drained by a dedicated thread which feeds the sink.
/// Sending blocks when the channel is full, so no state is ever dropped.
pub(crate) struct HistoryStream {
    tx: Option<SyncSender<MissionState>>,
    handle: Option<JoinHandle<()>>,
}

impl HistoryStream {
    pub(crate) fn spawn(mut sink: Box<dyn HistorySink>, capacity: usize) -> Self {
        let (tx, rx): (SyncSender<MissionState>, Receiver<MissionState>) = sync_channel(capacity);
        let handle = thread::spawn(move || {
            for state in rx {
                sink.record(state);
            }
            sink.close();
        });
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    pub(crate) fn send(&mut self, state: MissionState) {
        if let Some(tx) = &self.tx {
            if tx.send(state).is_err() {
                warn!("history sink is gone, no more states will be recorded");
                self.tx = None;
            }
        }
    }

    /// Closes the channel: the sink receives the states still queued and is then closed.
    pub(crate) fn close(&mut self) {
        self.tx = None;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    /// Closes the channel and waits for the sink to be done.
    pub(crate) fn join(&mut self) -> Result<(), SmdError> {
        self.close();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| SmdError::HistoryThread),
            None => Ok(()),
        }
    }
}
