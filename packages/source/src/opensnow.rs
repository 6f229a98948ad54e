//! OpenSnow snow-detail forecast client.
//!
//! Issues one GET per location against the snow-detail endpoint and
//! validates the response into a [`LocationForecast`]. OpenSnow has no
//! public API — requests must carry a browser-like header set and a
//! session cookie or they are rejected. Both are static configuration,
//! not derived per call.

use async_trait::async_trait;
use powdercast_forecast_models::{ApiForecastResponse, LocationForecast};
use reqwest::header::{HeaderMap, HeaderValue};

use crate::{ForecastSource, SourceError};

/// Default endpoint prefix for location forecasts.
const DEFAULT_BASE_URL: &str = "https://opensnow.com/mtn/location";

/// Default API credential sent as a query parameter.
const DEFAULT_API_KEY: &str = "60600760edf827a75df71f712b71e3f3";

/// Default session cookie. OpenSnow rejects cookie-less requests.
const DEFAULT_COOKIE: &str = "omr=OTEzNTk0LmEuMjk0MTMxMy4xdW82eHQ5LmdwczN4cA%3D%3D.cKmJrxtiHoWGApmc1M3k7vxdr8SneRxh6XaoJZAUZA4%3D; ab.storage.userId.6f3b6c64-f280-4e10-87f1-4d96dcedd37e=g%3A64ebcdc9-1848-4a2a-8b27-d5d637135fb4%7Ce%3Aundefined%7Cc%3A1738861089405%7Cl%3A1764792884144; ab.storage.deviceId.6f3b6c64-f280-4e10-87f1-4d96dcedd37e=g%3Afc9029fe-25ed-bcae-29d2-e180dd8f5f7d%7Ce%3Aundefined%7Cc%3A1738861089405%7Cl%3A1764792884144; ab.storage.sessionId.6f3b6c64-f280-4e10-87f1-4d96dcedd37e=g%3Ac2d5c856-272b-1aa5-8870-cb6809b8520c%7Ce%3A1764794758453%7Cc%3A1764792884143%7Cl%3A1764792958453; opensnow-cookienotice=true";

/// Browser user agent the provider expects.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:145.0) Gecko/20100101 Firefox/145.0";

/// Configuration for the OpenSnow client.
#[derive(Debug, Clone)]
pub struct OpenSnowConfig {
    /// Endpoint prefix, up to (but not including) the location slug.
    pub base_url: String,
    /// API credential appended to every request URL.
    pub api_key: String,
    /// Session cookie sent with every request.
    pub cookie: String,
    /// Forecast time horizon in days.
    pub days: u32,
}

impl Default for OpenSnowConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            cookie: DEFAULT_COOKIE.to_string(),
            days: 15,
        }
    }
}

impl OpenSnowConfig {
    /// Builds a config from `OPENSNOW_*` environment variables, falling
    /// back to the defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OPENSNOW_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("OPENSNOW_API_KEY").unwrap_or(defaults.api_key),
            cookie: std::env::var("OPENSNOW_COOKIE").unwrap_or(defaults.cookie),
            days: std::env::var("OPENSNOW_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(defaults.days),
        }
    }
}

/// HTTP client for the OpenSnow snow-detail forecast endpoint.
pub struct OpenSnowClient {
    client: reqwest::Client,
    config: OpenSnowConfig,
}

impl OpenSnowClient {
    /// Creates a new client with the provider's fixed header set applied
    /// to every request.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying HTTP client fails to
    /// build (e.g., the configured cookie is not a valid header value).
    pub fn new(config: OpenSnowConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert(
            "Accept-Language",
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert("Alt-Used", HeaderValue::from_static("opensnow.com"));
        headers.insert("Priority", HeaderValue::from_static("u=4"));
        headers.insert(
            "Referer",
            HeaderValue::from_static("https://opensnow.com/location/palisadestahoe/snow-summary"),
        );
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-origin"));
        headers.insert(
            "Cookie",
            HeaderValue::from_str(&config.cookie).map_err(|e| SourceError::Payload {
                message: format!("invalid cookie header: {e}"),
            })?,
        );

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Builds the snow-detail endpoint URL for a location slug.
    fn forecast_url(&self, slug: &str) -> String {
        format!(
            "{base}/{slug}/forecast/snow-detail?v=1&api_key={key}&days={days}&units=imperial&with_weather_stations=true",
            base = self.config.base_url,
            key = self.config.api_key,
            days = self.config.days,
        )
    }

    /// Validates a parsed provider response into a [`LocationForecast`].
    ///
    /// Records missing either natural-key field are dropped (with a
    /// warning); missing measurement fields default to zero. An absent
    /// `forecast_hourly` list is the valid zero-records case, but a
    /// missing location ID is an error since persistence keys on it.
    fn validate_response(
        slug: &str,
        response: ApiForecastResponse,
    ) -> Result<LocationForecast, SourceError> {
        let location = response.location.unwrap_or_default();

        let location_id = location.id.ok_or_else(|| SourceError::Payload {
            message: format!("response for {slug} is missing the location id"),
        })?;
        let location_name = location.name.unwrap_or_else(|| slug.to_string());

        let raw = response.forecast_hourly.unwrap_or_default();
        let mut records = Vec::with_capacity(raw.len());
        let mut dropped = 0usize;

        for sample in &raw {
            if let Some(record) = sample.normalize() {
                records.push(record);
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            log::warn!("[{slug}] Dropped {dropped} hourly records missing natural-key fields");
        }

        Ok(LocationForecast {
            location_id,
            location_name,
            records,
        })
    }
}

#[async_trait]
impl ForecastSource for OpenSnowClient {
    fn id(&self) -> &str {
        "opensnow"
    }

    async fn fetch_forecast(&self, slug: &str) -> Result<LocationForecast, SourceError> {
        let url = self.forecast_url(slug);

        log::info!("Fetching forecast for {slug}...");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            log::error!("OpenSnow API error for {slug}: {}", status.as_u16());
            return Err(SourceError::Provider {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ApiForecastResponse = serde_json::from_str(&body)?;

        Self::validate_response(slug, parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powdercast_forecast_models::{ApiForecastHourly, ApiLocation};

    fn client() -> OpenSnowClient {
        OpenSnowClient::new(OpenSnowConfig {
            base_url: "https://opensnow.example/mtn/location".to_string(),
            api_key: "test-key".to_string(),
            cookie: "session=abc".to_string(),
            days: 15,
        })
        .expect("client should build")
    }

    fn keyed_sample(display_at: &str) -> ApiForecastHourly {
        ApiForecastHourly {
            display_at: Some(display_at.to_string()),
            display_at_local_label: Some("Mon 10PM".to_string()),
            temp: Some(25.0),
            ..Default::default()
        }
    }

    #[test]
    fn builds_forecast_url_with_fixed_query_parameters() {
        let url = client().forecast_url("palisadestahoe");
        assert_eq!(
            url,
            "https://opensnow.example/mtn/location/palisadestahoe/forecast/snow-detail\
             ?v=1&api_key=test-key&days=15&units=imperial&with_weather_stations=true"
        );
    }

    #[test]
    fn validate_requires_location_id() {
        let response = ApiForecastResponse {
            location: Some(ApiLocation {
                id: None,
                name: Some("Palisades Tahoe".to_string()),
                slug: None,
            }),
            forecast_hourly: Some(vec![keyed_sample("2025-12-01T06:00:00Z")]),
        };

        let err = OpenSnowClient::validate_response("palisadestahoe", response).unwrap_err();
        assert!(matches!(err, SourceError::Payload { .. }));
    }

    #[test]
    fn validate_treats_absent_hourly_list_as_zero_records() {
        let response = ApiForecastResponse {
            location: Some(ApiLocation {
                id: Some(1_234),
                name: Some("Palisades Tahoe".to_string()),
                slug: Some("palisadestahoe".to_string()),
            }),
            forecast_hourly: None,
        };

        let forecast = OpenSnowClient::validate_response("palisadestahoe", response).unwrap();
        assert_eq!(forecast.location_id, 1_234);
        assert!(forecast.records.is_empty());
    }

    #[test]
    fn validate_drops_unkeyed_records_and_keeps_the_rest() {
        let response = ApiForecastResponse {
            location: Some(ApiLocation {
                id: Some(1_234),
                name: None,
                slug: None,
            }),
            forecast_hourly: Some(vec![
                keyed_sample("2025-12-01T06:00:00Z"),
                ApiForecastHourly::default(),
                keyed_sample("2025-12-01T07:00:00Z"),
            ]),
        };

        let forecast = OpenSnowClient::validate_response("palisadestahoe", response).unwrap();
        assert_eq!(forecast.records.len(), 2);
        // Name falls back to the slug when the provider omits it.
        assert_eq!(forecast.location_name, "palisadestahoe");
    }

    #[test]
    fn provider_error_renders_with_status_code() {
        let err = SourceError::Provider { status: 500 };
        assert_eq!(err.to_string(), "provider error: 500");
    }
}
