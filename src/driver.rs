//! Hardware driver boundary.
//!
//! A [`SensorDriver`] performs one physical probe read, retrying internally
//! with whatever backoff the hardware needs. Calls are blocking and can take
//! a while (DHT-style probes are slow); the read cycle runs them on the
//! blocking thread pool so the async runtime is never stalled.

use std::fmt;

/// One successful probe reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
}

/// Driver failure after all retries were exhausted.
#[derive(Debug, Clone)]
pub struct DriverError {
    pub message: String,
    pub attempts: u32,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no reading after {} attempts: {}",
            self.attempts, self.message
        )
    }
}

impl std::error::Error for DriverError {}

/// Blocking access to one kind of physical sensor, addressed by pin or bus id.
pub trait SensorDriver: Send + Sync {
    /// Read the probe at `address`, retrying up to `retries` times.
    ///
    /// Backoff between attempts is the driver's concern. An `Err` means all
    /// retries were spent; the caller decides what to do with the stale state.
    fn read(&self, address: u32, retries: u32) -> Result<Reading, DriverError>;
}

/// Deterministic in-process driver for development machines without GPIO.
///
/// Produces a fixed, address-derived reading so the rest of the controller
/// can be exercised end to end off the Pi.
pub struct SimulatedDriver;

impl SensorDriver for SimulatedDriver {
    fn read(&self, address: u32, _retries: u32) -> Result<Reading, DriverError> {
        Ok(Reading {
            temperature: 20.0 + (address % 8) as f64 * 0.5,
            humidity: 40.0 + (address % 16) as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_reading_is_stable_per_address() {
        let driver = SimulatedDriver;
        let first = driver.read(4, 3).unwrap();
        let second = driver.read(4, 3).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, driver.read(5, 3).unwrap());
    }
}
