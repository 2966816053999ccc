//! Dispatch/sizing configuration, TOML loading, presets, and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SizingError;
use crate::profile::{self, HourlyProfile};
use crate::sim::types::VentingRule;

/// Flat dispatch and sizing parameters for one simulation run.
///
/// Volumes are in NM3, rates in NM3 per hour. All fields default to the
/// baseline plant; see [`DispatchConfig::baseline`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Installed electrolyser stack capacity the profile is scaled to.
    pub installed_capacity: f64,
    /// Reference stack capacity the profile was normalized against.
    pub base_stack_capacity: f64,
    /// Pre-supply stock above which the high supply rate applies.
    pub stock_high_threshold: f64,
    /// Contracted supply rate while stock is high.
    pub supply_rate_high: f64,
    /// Base supply rate; also the minimum stock needed to supply at all.
    pub supply_rate_low: f64,
    /// Total storage volume before venting is considered.
    pub storage_capacity: f64,
    /// Volume held by one cylinder.
    pub cylinder_capacity: f64,
    /// Capital cost of one cylinder.
    pub cylinder_cost_per_unit: f64,
    /// How surplus above storage capacity is vented.
    pub venting_rule: VentingRule,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl DispatchConfig {
    /// Baseline plant: 11 000 NM3/h installed, 100 000 NM3 storage,
    /// 26 NM3 cylinders at 200 bar.
    pub fn baseline() -> Self {
        Self {
            installed_capacity: 11_000.0,
            base_stack_capacity: 350.0,
            stock_high_threshold: 80_000.0,
            supply_rate_high: 7_649.125,
            supply_rate_low: 6_258.375,
            storage_capacity: 100_000.0,
            cylinder_capacity: 26.0,
            cylinder_cost_per_unit: 32_500.0,
            venting_rule: VentingRule::GenerationGated,
        }
    }

    /// Pilot plant: ten reference stacks with a proportionally smaller store.
    pub fn pilot() -> Self {
        Self {
            installed_capacity: 3_500.0,
            stock_high_threshold: 25_000.0,
            supply_rate_high: 2_400.0,
            supply_rate_low: 1_900.0,
            storage_capacity: 30_000.0,
            ..Self::baseline()
        }
    }

    /// One reference stack running the profile unscaled.
    pub fn single_stack() -> Self {
        Self {
            installed_capacity: 350.0,
            stock_high_threshold: 2_000.0,
            supply_rate_high: 500.0,
            supply_rate_low: 100.0,
            ..Self::baseline()
        }
    }

    /// Checks every field in declaration order and reports the first violation.
    ///
    /// `supply_rate_high < supply_rate_low` is accepted; the tier rules still
    /// apply in order, the high tier just dispatches less than the low one.
    /// `stock_high_threshold` only has to be finite; a negative threshold puts
    /// every hour in the high tier.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), SizingError> {
        require_positive("installed_capacity", self.installed_capacity)?;
        require_positive("base_stack_capacity", self.base_stack_capacity)?;
        require_finite("stock_high_threshold", self.stock_high_threshold)?;
        require_non_negative("supply_rate_high", self.supply_rate_high)?;
        require_non_negative("supply_rate_low", self.supply_rate_low)?;
        require_positive("storage_capacity", self.storage_capacity)?;
        require_positive("cylinder_capacity", self.cylinder_capacity)?;
        require_non_negative("cylinder_cost_per_unit", self.cylinder_cost_per_unit)?;

        if self.supply_rate_high < self.supply_rate_low {
            tracing::warn!(
                supply_rate_high = self.supply_rate_high,
                supply_rate_low = self.supply_rate_low,
                "high supply rate is below the low supply rate"
            );
        }
        Ok(())
    }
}

fn require_finite(field: &str, value: f64) -> Result<(), SizingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SizingError::invalid_config(
            field,
            format!("must be finite, got {value}"),
        ))
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), SizingError> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(SizingError::invalid_config(
            field,
            format!("must be > 0, got {value}"),
        ));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> Result<(), SizingError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(SizingError::invalid_config(
            field,
            format!("must be >= 0, got {value}"),
        ));
    }
    Ok(())
}

/// Where the hourly profile comes from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// CSV profile to load instead of the bundled default.
    pub path: Option<PathBuf>,
}

/// Top-level sizing configuration parsed from TOML.
///
/// ```toml
/// [dispatch]
/// installed_capacity = 11000.0
/// venting_rule = "generation_gated"
///
/// [profile]
/// path = "profiles/site.csv"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizingConfig {
    /// Dispatch and sizing parameters.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Profile source.
    #[serde(default)]
    pub profile: ProfileConfig,
}

impl SizingConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "pilot", "single_stack"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidConfig`] if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, SizingError> {
        let dispatch = match name {
            "baseline" => DispatchConfig::baseline(),
            "pilot" => DispatchConfig::pilot(),
            "single_stack" => DispatchConfig::single_stack(),
            _ => {
                return Err(SizingError::invalid_config(
                    "preset",
                    format!(
                        "unknown preset \"{name}\", available: {}",
                        Self::PRESETS.join(", ")
                    ),
                ));
            }
        };
        Ok(Self {
            dispatch,
            profile: ProfileConfig::default(),
        })
    }

    /// Parses a configuration from a TOML file.
    ///
    /// A relative `profile.path` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidConfig`] if the file cannot be read or
    /// the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, SizingError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SizingError::invalid_config("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(profile_path), Some(dir)) = (cfg.profile.path.as_mut(), path.parent()) {
            if profile_path.is_relative() {
                *profile_path = dir.join(&*profile_path);
            }
        }
        Ok(cfg)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidConfig`] if the TOML is invalid or
    /// contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, SizingError> {
        toml::from_str(s).map_err(|e| SizingError::invalid_config("toml", e.to_string()))
    }

    /// Loads the configured profile, falling back to the bundled default.
    ///
    /// # Errors
    ///
    /// Propagates the loader's [`SizingError`].
    pub fn load_profile(&self) -> Result<HourlyProfile, SizingError> {
        match &self.profile.path {
            Some(path) => profile::load_from_path(path),
            None => profile::load_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_valid() {
        assert_eq!(DispatchConfig::baseline().validate(), Ok(()));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in SizingConfig::PRESETS {
            let cfg = SizingConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let result = cfg.map(|c| c.dispatch.validate());
            assert_eq!(result, Ok(Ok(())), "preset \"{name}\" should be valid");
        }
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = SizingConfig::from_preset("nonexistent").err();
        assert_eq!(err.as_ref().and_then(SizingError::field), Some("preset"));
    }

    #[test]
    fn zero_cylinder_capacity_is_rejected() {
        let cfg = DispatchConfig {
            cylinder_capacity: 0.0,
            ..DispatchConfig::baseline()
        };
        let err = cfg.validate().err();
        assert_eq!(
            err.as_ref().and_then(SizingError::field),
            Some("cylinder_capacity")
        );
    }

    #[test]
    fn validation_fails_fast_on_first_field() {
        let cfg = DispatchConfig {
            installed_capacity: -1.0,
            storage_capacity: 0.0,
            cylinder_capacity: 0.0,
            ..DispatchConfig::baseline()
        };
        let err = cfg.validate().err();
        assert_eq!(
            err.as_ref().and_then(SizingError::field),
            Some("installed_capacity")
        );
    }

    #[test]
    fn negative_supply_rate_is_rejected() {
        let cfg = DispatchConfig {
            supply_rate_low: -5.0,
            ..DispatchConfig::baseline()
        };
        let err = cfg.validate().err();
        assert_eq!(
            err.as_ref().and_then(SizingError::field),
            Some("supply_rate_low")
        );
    }

    #[test]
    fn nan_capacity_is_rejected() {
        let cfg = DispatchConfig {
            base_stack_capacity: f64::NAN,
            ..DispatchConfig::baseline()
        };
        let err = cfg.validate().err();
        assert_eq!(
            err.as_ref().and_then(SizingError::field),
            Some("base_stack_capacity")
        );
    }

    #[test]
    fn negative_threshold_is_accepted() {
        let cfg = DispatchConfig {
            stock_high_threshold: -1.0,
            ..DispatchConfig::baseline()
        };
        assert_eq!(cfg.validate(), Ok(()));

        let cfg = DispatchConfig {
            stock_high_threshold: f64::INFINITY,
            ..DispatchConfig::baseline()
        };
        let err = cfg.validate().err();
        assert_eq!(
            err.as_ref().and_then(SizingError::field),
            Some("stock_high_threshold")
        );
    }

    #[test]
    fn zero_cylinder_cost_is_allowed() {
        let cfg = DispatchConfig {
            cylinder_cost_per_unit: 0.0,
            ..DispatchConfig::baseline()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn inverted_supply_rates_are_accepted() {
        let cfg = DispatchConfig {
            supply_rate_high: 100.0,
            supply_rate_low: 500.0,
            ..DispatchConfig::baseline()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[dispatch]
installed_capacity = 7000.0
base_stack_capacity = 350.0
stock_high_threshold = 50000.0
supply_rate_high = 5000.0
supply_rate_low = 4000.0
storage_capacity = 60000.0
cylinder_capacity = 30.0
cylinder_cost_per_unit = 30000.0
venting_rule = "excess_over_capacity"

[profile]
path = "site.csv"
"#;
        let cfg = SizingConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(
            cfg.as_ref().map(|c| c.dispatch.installed_capacity),
            Some(7000.0)
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.dispatch.venting_rule),
            Some(VentingRule::ExcessOverCapacity)
        );
        assert_eq!(
            cfg.as_ref().and_then(|c| c.profile.path.clone()),
            Some(PathBuf::from("site.csv"))
        );
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[dispatch]
cylinder_capacity = 50.0
"#;
        let cfg = SizingConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.dispatch.cylinder_capacity), Some(50.0));
        assert_eq!(
            cfg.as_ref().map(|c| c.dispatch.installed_capacity),
            Some(11_000.0)
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.dispatch.venting_rule),
            Some(VentingRule::GenerationGated)
        );
        assert_eq!(cfg.and_then(|c| c.profile.path), None);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
[dispatch]
installed_capacity = 1.0
bogus_field = true
"#;
        let err = SizingConfig::from_toml_str(toml).err();
        assert_eq!(err.as_ref().and_then(SizingError::field), Some("toml"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = SizingConfig::from_toml_file(Path::new("/nonexistent/sizing.toml")).err();
        assert_eq!(err.as_ref().and_then(SizingError::field), Some("config"));
    }
}
