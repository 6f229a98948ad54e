#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forecast location configuration and the canonical hourly forecast record.
//!
//! The provider's wire types ([`ApiForecastResponse`] and friends) model
//! every field as optional — the upstream API is not versioned and has been
//! observed to omit fields. Records are normalized into [`ForecastHourly`]
//! before they reach the database so missing measurements never propagate
//! into storage as NULLs.

use serde::{Deserialize, Serialize};

/// A configured forecast target, identified by the provider's URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Provider-specific URL slug (e.g., `"palisadestahoe"`).
    pub slug: String,
    /// Human-readable display name (e.g., "Palisades Tahoe").
    pub name: String,
}

/// Location metadata as returned inside a provider response.
///
/// The provider is the source of truth for its own numeric location ID,
/// so the ID used for persistence always comes from this type, never
/// from static configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiLocation {
    /// Provider's numeric location ID.
    pub id: Option<i64>,
    /// Provider's display name for the location.
    pub name: Option<String>,
    /// Provider's URL slug for the location.
    pub slug: Option<String>,
}

/// One raw hourly forecast sample as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiForecastHourly {
    /// The hour this forecast describes, in the provider's representation.
    pub display_at: Option<String>,
    /// Secondary local-time label (part of the natural key).
    pub display_at_local_label: Option<String>,
    /// Temperature (°F with imperial units).
    pub temp: Option<f64>,
    /// Probability of precipitation (0-100).
    pub pop: Option<f64>,
    /// Precipitation type code.
    pub precip_type: Option<i32>,
    /// Accumulated precipitation.
    pub precip_accum: Option<f64>,
    /// Snow precipitation amount.
    pub precip_snow: Option<f64>,
    /// Mixed precipitation amount.
    pub precip_mix: Option<f64>,
    /// Rain precipitation amount.
    pub precip_rain: Option<f64>,
    /// Snow-water-equivalent precipitation amount.
    pub precip_swe: Option<f64>,
    /// Snow level elevation.
    pub snow_level: Option<f64>,
    /// Snow-to-liquid ratio.
    pub slr: Option<f64>,
}

/// Raw provider response body for the snow-detail forecast endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiForecastResponse {
    /// Location metadata (provider-assigned).
    pub location: Option<ApiLocation>,
    /// Hourly forecast samples. Absent is equivalent to empty.
    pub forecast_hourly: Option<Vec<ApiForecastHourly>>,
}

/// A validated hourly forecast record, ready for persistence.
///
/// Together with the owning location ID, `(display_at,
/// display_at_local_label)` forms the natural key — re-ingesting the same
/// hour overwrites the stored row in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastHourly {
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
}

impl ApiForecastHourly {
    /// Validates this raw sample into a [`ForecastHourly`], defaulting any
    /// missing measurement field to zero.
    ///
    /// Returns `None` when either natural-key field is absent — a record
    /// that cannot be keyed cannot be upserted.
    #[must_use]
    pub fn normalize(&self) -> Option<ForecastHourly> {
        let display_at = self.display_at.clone()?;
        let display_at_local_label = self.display_at_local_label.clone()?;

        Some(ForecastHourly {
            display_at,
            display_at_local_label,
            temp: self.temp.unwrap_or_default(),
            pop: self.pop.unwrap_or_default(),
            precip_type: self.precip_type.unwrap_or_default(),
            precip_accum: self.precip_accum.unwrap_or_default(),
            precip_snow: self.precip_snow.unwrap_or_default(),
            precip_mix: self.precip_mix.unwrap_or_default(),
            precip_rain: self.precip_rain.unwrap_or_default(),
            precip_swe: self.precip_swe.unwrap_or_default(),
            snow_level: self.snow_level.unwrap_or_default(),
            slr: self.slr.unwrap_or_default(),
        })
    }
}

/// A fetched and validated forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationForecast {
    /// Provider-assigned numeric location ID.
    pub location_id: i64,
    /// Provider's display name for the location.
    pub location_name: String,
    /// Validated hourly records. May legitimately be empty.
    pub records: Vec<ForecastHourly>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_missing_measurements_to_zero() {
        let raw = ApiForecastHourly {
            display_at: Some("2025-12-01T06:00:00Z".to_string()),
            display_at_local_label: Some("Mon 10PM".to_string()),
            temp: Some(28.5),
            ..Default::default()
        };

        let record = raw.normalize().expect("keyed record should normalize");
        assert_eq!(record.temp, 28.5);
        assert_eq!(record.pop, 0.0);
        assert_eq!(record.precip_type, 0);
        assert_eq!(record.slr, 0.0);
    }

    #[test]
    fn normalize_drops_records_missing_key_fields() {
        let missing_display_at = ApiForecastHourly {
            display_at_local_label: Some("Mon 10PM".to_string()),
            temp: Some(30.0),
            ..Default::default()
        };
        assert!(missing_display_at.normalize().is_none());

        let missing_label = ApiForecastHourly {
            display_at: Some("2025-12-01T06:00:00Z".to_string()),
            ..Default::default()
        };
        assert!(missing_label.normalize().is_none());
    }

    #[test]
    fn api_response_parses_with_absent_fields() {
        let response: ApiForecastResponse =
            serde_json::from_str(r#"{"location": {"id": 42}}"#).expect("parse");
        assert_eq!(response.location.unwrap().id, Some(42));
        assert!(response.forecast_hourly.is_none());
    }
}
