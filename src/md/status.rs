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

use crate::cosmic::Orbit;
use crate::time::Epoch;
use std::fmt;
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

/// What the status reporter prints: the latest committed epoch, fuel and orbit of the mission.
#[derive(Copy, Clone, Debug)]
pub struct MissionStatus {
    pub epoch: Epoch,
    pub fuel_mass_kg: f64,
    pub orbit: Orbit,
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\tfuel = {:.3} kg\t{}", self.epoch, self.fuel_mass_kg, self.orbit)
    }
}

/// Periodically logs the shared status snapshot until stopped. It only ever reads the snapshot.
pub(crate) struct StatusReporter {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StatusReporter {
    pub(crate) fn spawn(
        name: String,
        snapshot: Arc<RwLock<MissionStatus>>,
        period: StdDuration,
    ) -> Self {
        let (tx, rx) = channel::<()>();
        let handle = thread::spawn(move || loop {
            match rx.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => match snapshot.read() {
                    Ok(status) => info!("{name}: {status}"),
                    Err(_) => break,
                },
                // Stop requested or the mission is gone
                _ => break,
            }
        });
        Self {
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub(crate) fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            // The thread may already have exited
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("status reporter panicked");
            }
        }
    }
}

impl Drop for StatusReporter {
    fn drop(&mut self) {
        self.stop();
    }
}
