//! Post-hoc sizing metrics from a finished run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;

use super::types::SimulationState;

/// Hours per zero-supply day.
const HOURS_PER_DAY: u64 = 24;

/// Capital-sizing summary of one simulation run.
///
/// Serialized with camelCase keys, e.g. `totalHydrogenGenerated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingResult {
    /// Total generation over the horizon (NM3).
    pub total_hydrogen_generated: f64,
    /// Total volume dispatched to the client (NM3).
    pub total_hydrogen_supplied: f64,
    /// Total volume vented (NM3).
    pub total_hydrogen_vented: f64,
    /// Highest end-of-hour stock (NM3).
    pub peak_stock: f64,
    /// Hours with no scheduled supply.
    pub zero_supply_hours: u64,
    /// Zero-supply hours rounded up to whole days.
    pub zero_supply_days: u64,
    /// Cylinders needed to hold the peak stock.
    pub number_of_cylinders: u64,
    /// `number_of_cylinders * cylinder_cost_per_unit`.
    pub capital_cost: f64,
}

impl SizingResult {
    /// Derives sizing metrics from final run aggregates.
    ///
    /// `config.cylinder_capacity` must be positive, which
    /// [`DispatchConfig::validate`] guarantees.
    pub fn evaluate(state: &SimulationState, config: &DispatchConfig) -> Self {
        let number_of_cylinders = cylinders_for(state.peak_stock, config.cylinder_capacity);
        Self {
            total_hydrogen_generated: state.generated,
            total_hydrogen_supplied: state.supplied,
            total_hydrogen_vented: state.vented,
            peak_stock: state.peak_stock,
            zero_supply_hours: state.zero_supply_hours,
            zero_supply_days: zero_supply_days(state.zero_supply_hours),
            number_of_cylinders,
            capital_cost: number_of_cylinders as f64 * config.cylinder_cost_per_unit,
        }
    }
}

/// Whole days covering `hours`, rounding any partial day up.
pub fn zero_supply_days(hours: u64) -> u64 {
    hours.div_ceil(HOURS_PER_DAY)
}

/// Cylinders needed to hold `peak_stock`. An exact multiple does not round up.
pub fn cylinders_for(peak_stock: f64, cylinder_capacity: f64) -> u64 {
    if peak_stock <= 0.0 || cylinder_capacity <= 0.0 {
        return 0;
    }
    (peak_stock / cylinder_capacity).ceil() as u64
}

impl fmt::Display for SizingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Report ---")?;
        writeln!(
            f,
            "Hydrogen generated:    {:.0} NM3",
            self.total_hydrogen_generated
        )?;
        writeln!(
            f,
            "Hydrogen supplied:     {:.0} NM3",
            self.total_hydrogen_supplied
        )?;
        writeln!(
            f,
            "Hydrogen vented:       {:.0} NM3",
            self.total_hydrogen_vented
        )?;
        writeln!(f, "Peak storage level:    {:.0} NM3", self.peak_stock)?;
        writeln!(
            f,
            "Zero-supply time:      {} h ({} days)",
            self.zero_supply_hours, self.zero_supply_days
        )?;
        writeln!(f, "Cylinders required:    {}", self.number_of_cylinders)?;
        write!(f, "Capital cost:          {:.2}", self.capital_cost)
    }
}
