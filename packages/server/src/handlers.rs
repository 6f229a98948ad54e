//! HTTP handler functions for the powdercast API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use powdercast_database::queries;
use powdercast_server_models::{
    ApiForecast, ApiHealth, ApiLocation, ForecastQueryParams, TriggerResponse,
};

use crate::AppState;

/// Default row cap for the forecasts read path. A 15-day hourly horizon
/// is ~360 rows, so the chart page never hits this in practice.
const DEFAULT_FORECAST_LIMIT: u32 = 500;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/forecasts`
///
/// Returns stored hourly forecasts for a location slug, ordered by
/// forecast timestamp ascending.
pub async fn forecasts(
    state: web::Data<AppState>,
    params: web::Query<ForecastQueryParams>,
) -> HttpResponse {
    let Some(slug) = params.location.as_deref() else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing required query parameter: location"
        }));
    };

    let limit = params
        .limit
        .unwrap_or(DEFAULT_FORECAST_LIMIT)
        .min(DEFAULT_FORECAST_LIMIT);

    match queries::query_hourly_forecasts(state.db.as_ref(), slug, limit).await {
        Ok(rows) => {
            let api_forecasts: Vec<ApiForecast> = rows.into_iter().map(ApiForecast::from).collect();
            HttpResponse::Ok().json(api_forecasts)
        }
        Err(e) => {
            log::error!("Failed to query forecasts: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query forecasts"
            }))
        }
    }
}

/// `GET /api/locations`
///
/// Lists all registered locations.
pub async fn locations(state: web::Data<AppState>) -> HttpResponse {
    match queries::get_all_locations(state.db.as_ref()).await {
        Ok(rows) => {
            let api_locations: Vec<ApiLocation> = rows.into_iter().map(ApiLocation::from).collect();
            HttpResponse::Ok().json(api_locations)
        }
        Err(e) => {
            log::error!("Failed to query locations: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query locations"
            }))
        }
    }
}

/// `GET /trigger-cron`
///
/// Runs the full ingestion pipeline immediately and returns the
/// per-location outcomes. Individual location failures are data in the
/// response, not an error status — the run itself always completes.
pub async fn trigger_cron(state: web::Data<AppState>) -> HttpResponse {
    log::info!("Manual ingestion trigger received");

    let summary = powdercast_ingest::run_ingestion(
        state.db.as_ref(),
        state.source.as_ref(),
        &state.locations,
    )
    .await;

    HttpResponse::Ok().json(TriggerResponse {
        success: true,
        message: format!(
            "Forecast update completed: {} total records",
            summary.total_records
        ),
        results: summary.results,
        triggered_at: Utc::now(),
    })
}
