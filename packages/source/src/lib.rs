#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Forecast provider trait and the OpenSnow client implementation.
//!
//! The provider boundary is a trait ([`ForecastSource`]) so the ingestion
//! pipeline can be exercised against test doubles without touching the
//! network.

pub mod opensnow;
pub mod registry;

use async_trait::async_trait;
use powdercast_forecast_models::LocationForecast;

/// Errors that can occur while fetching a forecast from the provider.
///
/// None of these are retried — a failed fetch is surfaced immediately to
/// the caller, which isolates it to the affected location.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The provider returned a non-success HTTP status.
    #[error("provider error: {status}")]
    Provider {
        /// HTTP status code returned by the provider.
        status: u16,
    },

    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing of the response body failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed but is missing data we cannot proceed without.
    #[error("Malformed provider response: {message}")]
    Payload {
        /// Description of what was missing.
        message: String,
    },
}

/// Trait implemented by every forecast data provider.
///
/// A provider knows how to fetch the hourly forecast for one location slug
/// and return it validated. Implementations must be stateless between
/// calls.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Returns a unique identifier for this provider (e.g., `"opensnow"`).
    fn id(&self) -> &str;

    /// Fetches and validates the hourly forecast for `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request, parse, or validation fails.
    async fn fetch_forecast(&self, slug: &str) -> Result<LocationForecast, SourceError>;
}
