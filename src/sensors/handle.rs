//! Per-sensor handle state.
//!
//! A [`SensorHandle`] represents one physical probe: its immutable address
//! plus display metadata and the last successfully observed reading. All
//! mutable fields live behind a single per-handle lock, so a snapshot never
//! mixes fields from two different mutation events and one slow sensor
//! never blocks reads of another.

use crate::driver::{DriverError, SensorDriver};
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;

/// Record of the most recent failed read, kept until the next success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadFailure {
    pub message: String,
    pub attempts: u32,
}

impl From<DriverError> for ReadFailure {
    fn from(err: DriverError) -> Self {
        Self {
            message: err.message,
            attempts: err.attempts,
        }
    }
}

#[derive(Debug)]
struct HandleState {
    name: String,
    location: String,
    temperature: f64,
    humidity: f64,
    last_error: Option<ReadFailure>,
}

/// Point-in-time copy of one handle's state.
///
/// `last_error` is dropped from the JSON form when there is no failure on
/// record, so consumers can treat its presence as the health signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub name: String,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ReadFailure>,
}

/// One physical temperature/humidity probe and its last known reading.
pub struct SensorHandle {
    address: u32,
    state: RwLock<HandleState>,
}

impl SensorHandle {
    /// Create a handle with zero readings and no failure on record.
    pub fn new(address: u32, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            address,
            state: RwLock::new(HandleState {
                name: name.into(),
                location: location.into(),
                temperature: 0.0,
                humidity: 0.0,
                last_error: None,
            }),
        }
    }

    /// Pin number or bus id this handle polls. Fixed at construction.
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Replace the display name.
    pub fn rename(&self, name: impl Into<String>) {
        self.state.write().name = name.into();
    }

    /// Replace the location label.
    pub fn relocate(&self, location: impl Into<String>) {
        self.state.write().location = location.into();
    }

    /// Read the hardware once and fold the result into the cached state.
    ///
    /// Invoked only by the manager's read cycle. The driver call happens
    /// outside the state lock so snapshot readers are never stuck behind
    /// slow hardware. On success the reading pair is written and any failure
    /// record cleared in one critical section; on failure the previous
    /// reading stays available and the failure is recorded instead.
    pub(crate) fn refresh(&self, driver: &dyn SensorDriver, retries: u32) {
        match driver.read(self.address, retries) {
            Ok(reading) => {
                let mut state = self.state.write();
                state.temperature = reading.temperature;
                state.humidity = reading.humidity;
                state.last_error = None;
            }
            Err(err) => {
                debug!("Sensor {} read failed: {}", self.address, err);
                self.state.write().last_error = Some(err.into());
            }
        }
    }

    /// Copy out the current state under one lock acquisition.
    pub fn snapshot(&self) -> SensorSnapshot {
        let state = self.state.read();
        SensorSnapshot {
            name: state.name.clone(),
            location: state.location.clone(),
            temperature: state.temperature,
            humidity: state.humidity,
            last_error: state.last_error.clone(),
        }
    }
}
