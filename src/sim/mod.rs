/// Memoized results keyed by profile and configuration.
pub mod cache;
/// Hour-by-hour dispatch engine.
pub mod engine;
/// Cylinder count and cost from a finished run.
pub mod sizing;
/// Parameter sweeps over many configurations.
pub mod sweep;
/// Run state, hour records, and dispatch rules.
pub mod types;
