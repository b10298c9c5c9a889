//! Relay state management.
//!
//! Thread-safe cached state for the optocoupler relay bank. The logical
//! ON/OFF state lives here so the presentation layer can report it without
//! touching hardware; the GPIO write itself happens at the driver level and
//! is a no-op on development machines without GPIO.

use crate::error::{Result, TentboxError};
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One relay and its cached logical state.
///
/// Can be flipped from any thread. `active_high` records whether driving the
/// pin high energizes the relay; it only matters to the hardware layer, the
/// cached state here is always logical ON/OFF.
pub struct Relay {
    name: String,
    active_high: bool,
    location: RwLock<String>,
    state: AtomicBool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelaySnapshot {
    pub location: String,
    pub on: bool,
}

impl Relay {
    pub fn new(name: impl Into<String>, location: impl Into<String>, initial: bool) -> Self {
        Self {
            name: name.into(),
            active_high: true,
            location: RwLock::new(location.into()),
            state: AtomicBool::new(initial),
        }
    }

    /// Mark the relay as energized-on-low. Only the hardware layer cares;
    /// the cached state stays logical.
    pub fn with_active_high(mut self, active_high: bool) -> Self {
        self.active_high = active_high;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn active_high(&self) -> bool {
        self.active_high
    }

    pub fn is_on(&self) -> bool {
        self.state.load(Ordering::SeqCst)
    }

    /// Set the logical state and update the cache.
    pub fn set(&self, on: bool) {
        let old = self.state.swap(on, Ordering::SeqCst);
        if old != on {
            debug!("Relay {:?} switched {}", self.name, if on { "on" } else { "off" });
        }
    }

    /// Flip the logical state and return the new value.
    pub fn toggle(&self) -> bool {
        // fetch_xor with true flips the bit
        let new = !self.state.fetch_xor(true, Ordering::SeqCst);
        debug!("Relay {:?} toggled to {}", self.name, new);
        new
    }

    pub fn relocate(&self, location: impl Into<String>) {
        *self.location.write() = location.into();
    }

    pub fn snapshot(&self) -> RelaySnapshot {
        RelaySnapshot {
            location: self.location.read().clone(),
            on: self.is_on(),
        }
    }
}

/// Name-keyed registry of relays.
pub struct RelayBank {
    relays: RwLock<BTreeMap<String, Arc<Relay>>>,
}

impl RelayBank {
    pub fn new() -> Self {
        Self {
            relays: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn add(&self, relay: Relay) -> Result<()> {
        let mut relays = self.relays.write();
        if relays.contains_key(relay.name()) {
            return Err(TentboxError::DuplicateRelay(relay.name().to_string()));
        }
        relays.insert(relay.name().to_string(), Arc::new(relay));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<Relay>> {
        self.relays
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| TentboxError::RelayNotFound(name.to_string()))
    }

    pub fn set(&self, name: &str, on: bool) -> Result<()> {
        self.get(name)?.set(on);
        Ok(())
    }

    pub fn snapshot(&self) -> BTreeMap<String, RelaySnapshot> {
        self.relays
            .read()
            .iter()
            .map(|(name, relay)| (name.clone(), relay.snapshot()))
            .collect()
    }
}

impl Default for RelayBank {
    fn default() -> Self {
        Self::new()
    }
}
