//! Sensor registry and periodic read cycle.
//!
//! The [`SensorManager`] owns the address-keyed registry of handles and a
//! single background task that polls them on a fixed schedule. The registry
//! lock is never held across a driver call, so registration, removal and
//! snapshots stay responsive no matter how slow the hardware is.

use crate::driver::SensorDriver;
use crate::error::{Result, TentboxError};
use crate::sensors::{SensorHandle, SensorSnapshot};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Attempts handed to the driver per refresh. Matches what DHT-style probes
/// need to get one clean pulse train.
const READ_RETRIES: u32 = 3;

struct Cycle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the sensor handles and the background task that refreshes them.
///
/// All operations are safe to call from any number of concurrent callers;
/// only one read cycle can run at a time.
pub struct SensorManager {
    handles: Arc<RwLock<HashMap<u32, Arc<SensorHandle>>>>,
    driver: Arc<dyn SensorDriver>,
    cycle: Mutex<Option<Cycle>>,
}

impl SensorManager {
    pub fn new(driver: Arc<dyn SensorDriver>) -> Self {
        Self {
            handles: Arc::new(RwLock::new(HashMap::new())),
            driver,
            cycle: Mutex::new(None),
        }
    }

    /// Add a handle to the registry.
    ///
    /// Fails with [`TentboxError::DuplicateAddress`] if the address is
    /// already taken; the registry is left untouched in that case.
    pub fn register(&self, handle: SensorHandle) -> Result<()> {
        let address = handle.address();
        match self.handles.write().entry(address) {
            Entry::Occupied(_) => Err(TentboxError::DuplicateAddress(address)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(handle));
                debug!("Registered sensor at address {}", address);
                Ok(())
            }
        }
    }

    /// Remove the handle at `address`.
    ///
    /// Safe while the cycle is running: the handle drops out of the next
    /// pass, and a refresh already in flight completes against an `Arc`
    /// nothing reads any more, so its result is simply discarded.
    pub fn unregister(&self, address: u32) -> Result<()> {
        match self.handles.write().remove(&address) {
            Some(_) => {
                debug!("Unregistered sensor at address {}", address);
                Ok(())
            }
            None => Err(TentboxError::SensorNotFound(address)),
        }
    }

    /// Spawn the periodic read cycle.
    ///
    /// Fails with [`TentboxError::AlreadyRunning`] if a cycle exists; a
    /// second unsupervised loop would double-poll the hardware, so this is
    /// a loud error rather than a silent no-op. A zero interval is rejected
    /// with [`TentboxError::ZeroInterval`] up front: `tokio::time::interval`
    /// panics on a zero period, which would kill the spawned task while the
    /// manager still reports itself as running.
    pub fn start(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(TentboxError::ZeroInterval);
        }
        let mut cycle = self.cycle.lock();
        if cycle.is_some() {
            return Err(TentboxError::AlreadyRunning);
        }
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_read_cycle(
            self.handles.clone(),
            self.driver.clone(),
            interval,
            cancel.clone(),
        ));
        *cycle = Some(Cycle { cancel, task });
        info!("Sensor read cycle started (interval {:?})", interval);
        Ok(())
    }

    /// Stop the read cycle and wait for the in-flight pass to drain.
    ///
    /// No refresh begins after this returns. A second call fails with
    /// [`TentboxError::NotRunning`], symmetric with [`Self::start`].
    pub async fn stop(&self) -> Result<()> {
        let Cycle { cancel, task } = self.cycle.lock().take().ok_or(TentboxError::NotRunning)?;
        cancel.cancel();
        if let Err(err) = task.await {
            warn!("Read cycle task ended abnormally: {}", err);
        }
        info!("Sensor read cycle stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.cycle.lock().is_some()
    }

    /// Per-handle-consistent view of every registered sensor, ordered by
    /// address.
    ///
    /// The registry lock is held only for the map clone; each handle is then
    /// copied under its own lock, so this never waits on a driver call and
    /// never blocks the read cycle.
    pub fn snapshot(&self) -> BTreeMap<u32, SensorSnapshot> {
        let handles: Vec<Arc<SensorHandle>> = self.handles.read().values().cloned().collect();
        handles
            .iter()
            .map(|handle| (handle.address(), handle.snapshot()))
            .collect()
    }
}

/// Tick-driven polling loop.
///
/// Runs on a fixed schedule: a pass that overruns the interval causes
/// skipped ticks instead of stretching the effective polling period. Each
/// pass works from a stable copy of the registry taken at pass start, so
/// registrations land on the next tick and removals mid-pass are harmless.
/// Cancellation is observed between passes; a pass in progress drains fully.
async fn run_read_cycle(
    handles: Arc<RwLock<HashMap<u32, Arc<SensorHandle>>>>,
    driver: Arc<dyn SensorDriver>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let pass: Vec<Arc<SensorHandle>> = handles.read().values().cloned().collect();
        debug!("Read pass over {} sensors", pass.len());

        for handle in pass {
            let driver = driver.clone();
            // Driver calls are blocking and slow; keep them off the runtime.
            let joined =
                tokio::task::spawn_blocking(move || handle.refresh(driver.as_ref(), READ_RETRIES))
                    .await;
            if let Err(err) = joined {
                warn!("Sensor refresh task panicked: {}", err);
            }
        }
    }
}
