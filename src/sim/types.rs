//! Core simulation types: run state, per-hour records, and dispatch rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How surplus stock above the storage capacity is vented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VentingRule {
    /// Vent `generation - supply` only when post-supply stock exceeds
    /// storage capacity *and* this hour's generation exceeds the high
    /// supply rate. Hours that overflow on lower generation keep the excess.
    /// When supply exceeds generation the vent is negative and the stock
    /// grows by the difference.
    #[default]
    GenerationGated,
    /// Vent exactly the volume above storage capacity whenever it overflows.
    ExcessOverCapacity,
}

impl VentingRule {
    /// Volume to vent for one hour.
    ///
    /// # Arguments
    ///
    /// * `stock_after_supply` - Stock after this hour's dispatch
    /// * `generation` - Scaled generation for this hour
    /// * `supply` - Volume dispatched this hour (already clamped)
    /// * `storage_capacity` - Configured storage volume
    /// * `supply_rate_high` - Configured high supply rate
    pub fn vent(
        self,
        stock_after_supply: f64,
        generation: f64,
        supply: f64,
        storage_capacity: f64,
        supply_rate_high: f64,
    ) -> f64 {
        if stock_after_supply <= storage_capacity {
            return 0.0;
        }
        match self {
            Self::GenerationGated if generation > supply_rate_high => generation - supply,
            Self::GenerationGated => 0.0,
            Self::ExcessOverCapacity => stock_after_supply - storage_capacity,
        }
    }
}

/// Supply bracket selected for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchTier {
    /// Pre-supply stock above the high-stock threshold.
    High,
    /// Pre-supply stock above the low supply rate.
    Low,
    /// Not enough stock to supply.
    Zero,
}

impl DispatchTier {
    /// Selects the tier for a pre-supply stock level. Comparisons are strict
    /// and evaluated high first.
    pub fn select(stock_pre_supply: f64, stock_high_threshold: f64, supply_rate_low: f64) -> Self {
        if stock_pre_supply > stock_high_threshold {
            Self::High
        } else if stock_pre_supply > supply_rate_low {
            Self::Low
        } else {
            Self::Zero
        }
    }

    /// Label used in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Zero => "zero",
        }
    }
}

impl fmt::Display for DispatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of one run. Starts empty at hour 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationState {
    /// Current inventory (NM3).
    pub stock: f64,
    /// Cumulative generation.
    pub generated: f64,
    /// Cumulative supply to the client.
    pub supplied: f64,
    /// Cumulative vented volume.
    pub vented: f64,
    /// Hours in which no supply was scheduled.
    pub zero_supply_hours: u64,
    /// Running maximum of `stock`.
    pub peak_stock: f64,
}

/// Everything that happened in one simulated hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRecord {
    /// Hour index within the profile.
    pub hour: usize,
    /// Profile value scaled to installed capacity.
    pub generation: f64,
    /// Carried stock plus this hour's generation.
    pub stock_pre_supply: f64,
    /// Selected supply bracket.
    pub tier: DispatchTier,
    /// Dispatched volume after clamping to available stock.
    pub supply: f64,
    /// Vented volume.
    pub vent: f64,
    /// Stock carried into the next hour.
    pub stock: f64,
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hour {}: gen={:.2} pre={:.2} tier={} supply={:.2} vent={:.2} stock={:.2}",
            self.hour,
            self.generation,
            self.stock_pre_supply,
            self.tier,
            self.supply,
            self.vent,
            self.stock
        )
    }
}
