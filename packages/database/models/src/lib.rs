#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types for persisted forecast data.
//!
//! These types represent the shapes of data as stored in and retrieved from
//! the database. They are distinct from the provider wire types in
//! `powdercast_forecast_models` and the API response types in
//! `powdercast_server_models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row in the `locations` table.
///
/// The primary key is the provider-assigned numeric ID, registered on the
/// first successful ingestion of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRow {
    /// Provider-assigned location ID (primary key).
    pub id: i64,
    /// Provider URL slug.
    pub slug: String,
    /// Human-readable location name.
    pub name: String,
}

/// A row in the `hourly_forecasts` table.
///
/// Uniquely keyed by `(location_id, display_at, display_at_local_label)`;
/// rows are overwritten in place on re-ingestion and never deleted by the
/// ingestion subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastRow {
    /// Owning location (foreign reference to `locations.id`).
    pub location_id: i64,
    /// The hour this forecast describes.
    pub display_at: String,
    /// Secondary local-time label.
    pub display_at_local_label: String,
    /// Temperature.
    pub temp: f64,
    /// Probability of precipitation (0-100).
    pub pop: f64,
    /// Precipitation type code.
    pub precip_type: i32,
    /// Accumulated precipitation.
    pub precip_accum: f64,
    /// Snow precipitation amount.
    pub precip_snow: f64,
    /// Mixed precipitation amount.
    pub precip_mix: f64,
    /// Rain precipitation amount.
    pub precip_rain: f64,
    /// Snow-water-equivalent precipitation amount.
    pub precip_swe: f64,
    /// Snow level elevation.
    pub snow_level: f64,
    /// Snow-to-liquid ratio.
    pub slr: f64,
    /// Server-assigned write timestamp, refreshed on every upsert.
    pub updated_at: DateTime<Utc>,
}
