//! Tentbox controller library.
//!
//! This library provides the core functionality for sampling grow-tent
//! environment sensors on a fixed schedule and exposing their latest
//! readings as a serializable snapshot. Hardware access goes through the
//! [`driver::SensorDriver`] boundary so the same read cycle runs against
//! real probes or a simulation.

pub mod config;
pub mod driver;
pub mod error;
pub mod relays;
pub mod sensors;
