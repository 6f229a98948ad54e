#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the powdercast server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract.

use chrono::{DateTime, Utc};
use powdercast_database_models::{HourlyForecastRow, LocationRow};
use powdercast_ingest_models::LocationOutcome;
use serde::{Deserialize, Serialize};

/// An hourly forecast record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiForecast {
    /// Provider's numeric location ID.
    pub location_id: i64,
    /// Forecast timestamp (ISO 8601).
    pub display_at: String,
    /// Provider-formatted local-time label (e.g. "Mon 10PM").
    pub display_at_local_label: String,
    /// Temperature in degrees Fahrenheit.
    pub temp: f64,
    /// Probability of precipitation (percent).
    pub pop: f64,
    /// Precipitation type code.
    pub precip_type: i32,
    /// Total precipitation accumulation (inches).
    pub precip_accum: f64,
    /// Snow accumulation (inches).
    pub precip_snow: f64,
    /// Mixed precipitation accumulation (inches).
    pub precip_mix: f64,
    /// Rain accumulation (inches).
    pub precip_rain: f64,
    /// Snow water equivalent (inches).
    pub precip_swe: f64,
    /// Snow level elevation (feet).
    pub snow_level: f64,
    /// Snow-to-liquid ratio.
    pub slr: f64,
    /// When this row was last written by ingestion.
    pub updated_at: DateTime<Utc>,
}

impl From<HourlyForecastRow> for ApiForecast {
    fn from(row: HourlyForecastRow) -> Self {
        Self {
            location_id: row.location_id,
            display_at: row.display_at,
            display_at_local_label: row.display_at_local_label,
            temp: row.temp,
            pop: row.pop,
            precip_type: row.precip_type,
            precip_accum: row.precip_accum,
            precip_snow: row.precip_snow,
            precip_mix: row.precip_mix,
            precip_rain: row.precip_rain,
            precip_swe: row.precip_swe,
            snow_level: row.snow_level,
            slr: row.slr,
            updated_at: row.updated_at,
        }
    }
}

/// Query parameters for the forecasts endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQueryParams {
    /// Location slug to query forecasts for.
    pub location: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

/// A registered location as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    /// Provider's numeric location ID.
    pub id: i64,
    /// URL slug identifying the location.
    pub slug: String,
    /// Display name.
    pub name: String,
}

impl From<LocationRow> for ApiLocation {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
        }
    }
}

/// Response from the manual ingestion trigger endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    /// Whether the ingestion run itself completed. Individual location
    /// failures are reported inside `results`, not here.
    pub success: bool,
    /// Human-readable summary of the run.
    pub message: String,
    /// Per-location outcomes, in configuration order.
    pub results: Vec<LocationOutcome>,
    /// When the run was triggered (ISO 8601).
    pub triggered_at: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
