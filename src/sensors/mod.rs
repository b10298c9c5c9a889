//! Sensor state management.
//!
//! This module owns the in-memory representation of each probe and the
//! background read cycle that keeps those representations fresh. Readings
//! are cached on the handle so presentation code always gets the last
//! successful value even while the hardware is misbehaving.

pub mod handle;
pub mod manager;

pub use handle::{ReadFailure, SensorHandle, SensorSnapshot};
pub use manager::SensorManager;
