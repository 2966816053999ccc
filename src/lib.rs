//! Hydrogen storage and dispatch sizing.
//!
//! Simulates a plant hour by hour over a generation profile, dispatching
//! stored gas to a client under tiered supply rules and venting when storage
//! saturates, then sizes cylinder storage and its capital cost from the run.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod profile;
/// Simulation engine, sizing evaluation, sweeps, and memoization.
pub mod sim;

pub use config::DispatchConfig;
pub use error::SizingError;
pub use profile::HourlyProfile;
pub use sim::engine::simulate;
pub use sim::sizing::SizingResult;
