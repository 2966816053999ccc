//! Hourly generation profiles: loading, lenient CSV parsing, and serialization.
//!
//! A profile is a normalized generation shape, one value per hour, scaled at
//! simulation time to the installed capacity. Accepted CSV text has no header
//! and holds either one value per line or a single comma-separated line.

use std::fs::{self, File};
use std::hash::Hasher;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rustc_hash::FxHasher;

use crate::error::SizingError;

/// Hours in one non-leap year.
pub const CANONICAL_HORIZON: usize = 8760;

/// Location of the bundled reference profile.
pub const DEFAULT_PROFILE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/base_profile.csv");

/// Ordered, immutable sequence of non-negative hourly values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyProfile {
    values: Vec<f64>,
}

impl HourlyProfile {
    /// Wraps hourly values.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidProfile`] if any value is negative or
    /// not finite.
    pub fn new(values: Vec<f64>) -> Result<Self, SizingError> {
        if let Some((hour, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(SizingError::InvalidProfile(format!(
                "hour {hour} has value {v}, expected a finite value >= 0"
            )));
        }
        Ok(Self { values })
    }

    /// Hourly values in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of hours.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the profile holds no hours.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the hourly values.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Sum of all hourly values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest hourly value, 0 for an empty profile.
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Stable hash of the exact value bit patterns, for memoization keys.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_usize(self.values.len());
        for v in &self.values {
            hasher.write_u64(v.to_bits());
        }
        hasher.finish()
    }
}

/// Why a CSV token was left out of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a decimal number.
    NotNumeric,
    /// NaN or infinite.
    NonFinite,
    /// Below zero.
    Negative,
}

/// A token dropped while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedToken {
    /// 1-based line number.
    pub line: u64,
    /// 1-based field index within the line.
    pub column: usize,
    /// Token text after trimming.
    pub token: String,
    /// Why it was dropped.
    pub reason: SkipReason,
}

/// Parsed profile plus the tokens that were dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    /// Profile built from the accepted tokens.
    pub profile: HourlyProfile,
    /// Dropped tokens in reading order.
    pub skipped: Vec<SkippedToken>,
}

/// Parses CSV text into a profile, silently dropping unusable tokens.
///
/// # Errors
///
/// Returns [`SizingError::InvalidProfile`] if no numeric token remains.
pub fn parse(text: &str) -> Result<HourlyProfile, SizingError> {
    parse_with_report(text).map(|report| report.profile)
}

/// Parses CSV text into a profile and reports every dropped token.
///
/// Empty tokens, such as the one after a trailing comma, are ignored without
/// being reported. Quotes carry no meaning: a `"` stays part of its token,
/// and commas and line breaks always separate values.
///
/// # Errors
///
/// Returns [`SizingError::InvalidProfile`] if no numeric token remains or the
/// text is not readable as CSV.
pub fn parse_with_report(text: &str) -> Result<ParseReport, SizingError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut values = Vec::new();
    let mut skipped = Vec::new();
    let mut record = csv::StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                return Err(SizingError::InvalidProfile(format!("malformed CSV: {e}")));
            }
        }
        let line = record.position().map_or(0, csv::Position::line);

        for (idx, token) in record.iter().enumerate() {
            if token.is_empty() {
                continue;
            }
            let reason = match token.parse::<f64>() {
                Ok(v) if !v.is_finite() => SkipReason::NonFinite,
                Ok(v) if v < 0.0 => SkipReason::Negative,
                Ok(v) => {
                    values.push(v);
                    continue;
                }
                Err(_) => SkipReason::NotNumeric,
            };
            skipped.push(SkippedToken {
                line,
                column: idx + 1,
                token: token.to_string(),
                reason,
            });
        }
    }

    if values.is_empty() {
        return Err(SizingError::InvalidProfile(
            "no numeric values found".to_string(),
        ));
    }
    if !skipped.is_empty() {
        tracing::warn!(
            skipped = skipped.len(),
            accepted = values.len(),
            "dropped unusable profile tokens"
        );
    }
    if values.len() != CANONICAL_HORIZON {
        tracing::debug!(hours = values.len(), "profile length differs from one year");
    }

    Ok(ParseReport {
        profile: HourlyProfile { values },
        skipped,
    })
}

/// Renders a profile as one value per line with no trailing newline.
///
/// Values use the shortest decimal form that reads back to the same `f64`.
pub fn serialize(profile: &HourlyProfile) -> String {
    let mut out = String::with_capacity(profile.len() * 8);
    for (i, v) in profile.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&v.to_string());
    }
    out
}

/// Writes the serialized profile to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_profile(profile: &HourlyProfile, mut writer: impl Write) -> io::Result<()> {
    writer.write_all(serialize(profile).as_bytes())?;
    writer.flush()
}

/// Writes the serialized profile to a file, e.g. as an editable template.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_profile(profile: &HourlyProfile, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_profile(profile, BufWriter::new(file))
}

/// Loads the bundled reference profile.
///
/// # Errors
///
/// Returns [`SizingError::DataUnavailable`] if the asset cannot be read.
pub fn load_default() -> Result<HourlyProfile, SizingError> {
    load_default_from(Path::new(DEFAULT_PROFILE_PATH))
}

/// Loads a reference profile from an asset location.
///
/// # Errors
///
/// Returns [`SizingError::DataUnavailable`] if the file cannot be read, or
/// [`SizingError::InvalidProfile`] if it holds no numeric values.
pub fn load_default_from(path: &Path) -> Result<HourlyProfile, SizingError> {
    let text = fs::read_to_string(path).map_err(|e| SizingError::DataUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse(&text)
}

/// Loads a user-supplied CSV profile.
///
/// # Errors
///
/// Returns [`SizingError::InvalidProfile`] if the file cannot be read or holds
/// no numeric values.
pub fn load_from_path(path: &Path) -> Result<HourlyProfile, SizingError> {
    let text = fs::read_to_string(path).map_err(|e| {
        SizingError::InvalidProfile(format!("cannot read \"{}\": {e}", path.display()))
    })?;
    parse(&text)
}
