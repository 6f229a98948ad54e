#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion outcome and summary types.

use serde::{Deserialize, Serialize};

/// The result of processing one location through the ingestion pipeline.
///
/// Every pipeline run produces exactly one of these, whether the location
/// succeeded, returned no data, or failed — failures are data here, never
/// errors that propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOutcome {
    /// Display name of the location this outcome describes.
    pub location: String,
    /// Whether the fetch-and-persist run completed without error. An
    /// empty forecast still counts as success.
    pub success: bool,
    /// Number of hourly records persisted by this run.
    pub record_count: u64,
    /// Failure message when `success` is `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocationOutcome {
    /// A successful outcome with `record_count` persisted records.
    #[must_use]
    pub const fn success(location: String, record_count: u64) -> Self {
        Self {
            location,
            success: true,
            record_count,
            error: None,
        }
    }

    /// A failed outcome carrying the failure message.
    #[must_use]
    pub const fn failure(location: String, error: String) -> Self {
        Self {
            location,
            success: false,
            record_count: 0,
            error: Some(error),
        }
    }
}

/// Aggregated result of one full ingestion run across every configured
/// location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    /// Sum of `record_count` across all outcomes (failed and empty
    /// locations contribute zero).
    pub total_records: u64,
    /// Per-location outcomes, in configuration order.
    pub results: Vec<LocationOutcome>,
}

impl IngestionSummary {
    /// Returns the outcomes that failed.
    #[must_use]
    pub fn errors(&self) -> Vec<&LocationOutcome> {
        self.results.iter().filter(|r| !r.success).collect()
    }
}
