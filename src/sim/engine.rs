//! Hourly storage/dispatch simulation.

use crate::config::DispatchConfig;
use crate::error::SizingError;
use crate::profile::HourlyProfile;

use super::sizing::SizingResult;
use super::types::{DispatchTier, HourRecord, SimulationState};

/// Simulation engine stepping one profile through a fixed configuration.
///
/// Owns the only mutable state of a run. The profile is borrowed, so many
/// engines can share one profile across threads.
pub struct Engine<'a> {
    profile: &'a HourlyProfile,
    config: DispatchConfig,
    state: SimulationState,
}

impl<'a> Engine<'a> {
    /// Creates an engine with empty storage.
    ///
    /// The configuration is expected to have passed
    /// [`DispatchConfig::validate`].
    pub fn new(profile: &'a HourlyProfile, config: DispatchConfig) -> Self {
        Self {
            profile,
            config,
            state: SimulationState::default(),
        }
    }

    /// Executes hour `t` against the current state.
    ///
    /// # Returns
    ///
    /// The hour's record, or `None` if `t` is past the end of the profile.
    pub fn step(&mut self, t: usize) -> Option<HourRecord> {
        let sample = *self.profile.values().get(t)?;
        Some(transition(&mut self.state, t, sample, &self.config))
    }

    /// Executes every hour and returns the trajectory.
    pub fn run(&mut self) -> Vec<HourRecord> {
        let mut records = Vec::with_capacity(self.profile.len());
        for (t, sample) in self.profile.iter().enumerate() {
            records.push(transition(&mut self.state, t, sample, &self.config));
        }
        log_summary(&self.state, self.profile.len());
        records
    }

    /// State accumulated so far.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Configuration driving this run.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Sizing metrics for the state accumulated so far.
    pub fn result(&self) -> SizingResult {
        SizingResult::evaluate(&self.state, &self.config)
    }
}

/// Applies one hour of generation, dispatch, and venting to `state`.
///
/// # Arguments
///
/// * `state` - Run state, updated in place
/// * `hour` - Hour index, copied into the record
/// * `sample` - Normalized profile value for this hour
/// * `config` - Dispatch parameters
pub fn transition(
    state: &mut SimulationState,
    hour: usize,
    sample: f64,
    config: &DispatchConfig,
) -> HourRecord {
    let generation = (sample / config.base_stack_capacity) * config.installed_capacity;
    let stock_pre_supply = state.stock + generation;

    let tier = DispatchTier::select(
        stock_pre_supply,
        config.stock_high_threshold,
        config.supply_rate_low,
    );
    let scheduled = match tier {
        DispatchTier::High => config.supply_rate_high,
        DispatchTier::Low => config.supply_rate_low,
        DispatchTier::Zero => 0.0,
    };
    if scheduled <= 0.0 {
        state.zero_supply_hours += 1;
    }

    let supply = scheduled.min(stock_pre_supply);
    let stock_after_supply = stock_pre_supply - supply;
    let vent = config.venting_rule.vent(
        stock_after_supply,
        generation,
        supply,
        config.storage_capacity,
        config.supply_rate_high,
    );
    let stock = stock_after_supply - vent;

    state.stock = stock;
    state.generated += generation;
    state.supplied += supply;
    state.vented += vent;
    state.peak_stock = state.peak_stock.max(stock);

    HourRecord {
        hour,
        generation,
        stock_pre_supply,
        tier,
        supply,
        vent,
        stock,
    }
}

/// Runs a full simulation and evaluates its sizing metrics.
///
/// Deterministic and free of shared state: identical inputs always give
/// identical results, and calls may run concurrently. An empty profile
/// yields a zeroed result.
pub fn simulate(profile: &HourlyProfile, config: &DispatchConfig) -> SizingResult {
    let mut state = SimulationState::default();
    for (t, sample) in profile.iter().enumerate() {
        transition(&mut state, t, sample, config);
    }
    log_summary(&state, profile.len());
    SizingResult::evaluate(&state, config)
}

/// Validates `config`, then runs [`simulate`].
///
/// # Errors
///
/// Returns [`SizingError::InvalidConfig`] for the first invalid field.
pub fn simulate_checked(
    profile: &HourlyProfile,
    config: &DispatchConfig,
) -> Result<SizingResult, SizingError> {
    config.validate()?;
    Ok(simulate(profile, config))
}

fn log_summary(state: &SimulationState, hours: usize) {
    tracing::debug!(
        hours,
        generated = state.generated,
        supplied = state.supplied,
        vented = state.vented,
        peak_stock = state.peak_stock,
        zero_supply_hours = state.zero_supply_hours,
        "simulation finished"
    );
}
