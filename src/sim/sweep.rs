//! Parameter sweeps: many configurations against one profile.
//!
//! Runs share nothing but the borrowed profile, so with the `parallel`
//! feature they are spread over the rayon pool. Output order always matches
//! input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::DispatchConfig;
use crate::error::SizingError;
use crate::profile::HourlyProfile;

use super::engine::simulate_checked;
use super::sizing::SizingResult;

/// Validates and simulates every configuration.
pub fn sweep(
    profile: &HourlyProfile,
    configs: &[DispatchConfig],
) -> Vec<Result<SizingResult, SizingError>> {
    tracing::debug!(runs = configs.len(), hours = profile.len(), "starting sweep");

    #[cfg(feature = "parallel")]
    let results = configs
        .par_iter()
        .map(|config| simulate_checked(profile, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = configs
        .iter()
        .map(|config| simulate_checked(profile, config))
        .collect();

    results
}

/// Builds one configuration per value by applying `set` to a copy of `base`.
///
/// ```
/// use h2_sizing::config::DispatchConfig;
/// use h2_sizing::sim::sweep::grid;
///
/// let configs = grid(&DispatchConfig::baseline(), &[5000.0, 11000.0], |c, v| {
///     c.installed_capacity = v;
/// });
/// assert_eq!(configs.len(), 2);
/// assert_eq!(configs[1].installed_capacity, 11000.0);
/// ```
pub fn grid(
    base: &DispatchConfig,
    values: &[f64],
    set: impl Fn(&mut DispatchConfig, f64),
) -> Vec<DispatchConfig> {
    values
        .iter()
        .map(|&v| {
            let mut config = *base;
            set(&mut config, v);
            config
        })
        .collect()
}
