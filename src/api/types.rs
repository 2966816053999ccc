//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;

/// Body of `POST /sizing`.
///
/// Every field is optional: a missing `config` means the baseline plant,
/// and at most one of `profile` / `profile_csv` may be given.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingRequest {
    /// Dispatch and sizing parameters.
    pub config: DispatchConfig,
    /// Hourly profile values.
    pub profile: Option<Vec<f64>>,
    /// Hourly profile as CSV text, parsed leniently.
    pub profile_csv: Option<String>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Offending configuration field, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
