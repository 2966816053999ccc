//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use h2_sizing::config::DispatchConfig;
use h2_sizing::profile::{self, HourlyProfile};
use h2_sizing::sim::types::VentingRule;

/// Tolerance for accumulated floating-point sums.
pub const EPS: f64 = 1e-6;

/// One reference stack on a flat profile (ten hours of 350).
pub fn flat_config() -> DispatchConfig {
    DispatchConfig {
        installed_capacity: 350.0,
        base_stack_capacity: 350.0,
        stock_high_threshold: 2000.0,
        supply_rate_high: 500.0,
        supply_rate_low: 100.0,
        storage_capacity: 100_000.0,
        cylinder_capacity: 26.0,
        cylinder_cost_per_unit: 32_500.0,
        venting_rule: VentingRule::GenerationGated,
    }
}

/// Small store that overflows while generation exceeds the high rate.
pub fn venting_config(rule: VentingRule) -> DispatchConfig {
    DispatchConfig {
        stock_high_threshold: 2000.0,
        supply_rate_high: 200.0,
        supply_rate_low: 100.0,
        storage_capacity: 1000.0,
        venting_rule: rule,
        ..flat_config()
    }
}

/// Builds a profile from literal values.
pub fn profile(values: Vec<f64>) -> HourlyProfile {
    HourlyProfile::new(values).expect("fixture profile should be valid")
}

/// The bundled one-year reference profile.
pub fn default_profile() -> HourlyProfile {
    profile::load_default().expect("bundled profile should load")
}
