//! Memoized sizing results keyed by profile and configuration.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::config::DispatchConfig;
use crate::error::SizingError;
use crate::profile::HourlyProfile;

use super::engine::simulate;
use super::sizing::SizingResult;
use super::types::VentingRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    profile: u64,
    hours: usize,
    config: [u64; 8],
    venting_rule: VentingRule,
}

impl CacheKey {
    fn new(profile: &HourlyProfile, config: &DispatchConfig) -> Self {
        Self {
            profile: profile.fingerprint(),
            hours: profile.len(),
            config: [
                config.installed_capacity.to_bits(),
                config.base_stack_capacity.to_bits(),
                config.stock_high_threshold.to_bits(),
                config.supply_rate_high.to_bits(),
                config.supply_rate_low.to_bits(),
                config.storage_capacity.to_bits(),
                config.cylinder_capacity.to_bits(),
                config.cylinder_cost_per_unit.to_bits(),
            ],
            venting_rule: config.venting_rule,
        }
    }
}

/// Default number of results kept by [`SizingCache::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug)]
struct Entry {
    profile: HourlyProfile,
    result: SizingResult,
}

/// Results of earlier runs, reused when the same inputs come back.
///
/// Simulation is deterministic, so a hit returns exactly what a fresh run
/// would. Each entry keeps its profile and a hit requires the values to match,
/// so a fingerprint collision is a miss. Once `capacity` results are stored
/// the oldest one is evicted. Invalid configurations are never stored.
#[derive(Debug)]
pub struct SizingCache {
    entries: FxHashMap<CacheKey, Entry>,
    order: VecDeque<CacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for SizingCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl SizingCache {
    /// Creates an empty cache holding up to [`DEFAULT_CACHE_CAPACITY`] results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache holding up to `capacity` results (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up a stored result, counting the hit or miss.
    pub fn get(
        &mut self,
        profile: &HourlyProfile,
        config: &DispatchConfig,
    ) -> Option<SizingResult> {
        let key = CacheKey::new(profile, config);
        match self.entries.get(&key) {
            Some(entry) if entry.profile == *profile => {
                self.hits += 1;
                Some(entry.result.clone())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores a result, evicting the oldest entry when full.
    ///
    /// `result` must come from simulating `profile` under a validated `config`.
    pub fn insert(
        &mut self,
        profile: &HourlyProfile,
        config: &DispatchConfig,
        result: SizingResult,
    ) {
        let key = CacheKey::new(profile, config);
        let entry = Entry {
            profile: profile.clone(),
            result,
        };
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = entry;
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key);
        self.entries.insert(key, entry);
    }

    /// Returns the cached result for these inputs, running the simulation on
    /// a miss.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidConfig`] if `config` fails validation.
    pub fn get_or_run(
        &mut self,
        profile: &HourlyProfile,
        config: &DispatchConfig,
    ) -> Result<SizingResult, SizingError> {
        config.validate()?;
        if let Some(result) = self.get(profile, config) {
            return Ok(result);
        }
        let result = simulate(profile, config);
        self.insert(profile, config, result.clone());
        Ok(result)
    }

    /// Maximum number of stored results.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that ran a simulation.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drops every stored result and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
