#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forecast ingestion pipeline: fetch, validate, and persist hourly
//! forecasts for every configured location.
//!
//! Locations are processed concurrently but fully isolated from one
//! another — a provider or database failure for one location becomes data
//! in that location's [`LocationOutcome`] and never aborts sibling work.

use futures::future::join_all;
use powdercast_database::queries;
use powdercast_forecast_models::Location;
use powdercast_ingest_models::{IngestionSummary, LocationOutcome};
use powdercast_source::ForecastSource;
use switchy_database::Database;

/// Returns the locations to ingest, filtered by the `--locations` CLI flag
/// or the `POWDERCAST_LOCATIONS` environment variable. If neither is set,
/// all configured locations are returned.
#[must_use]
pub fn enabled_locations(cli_filter: Option<String>) -> Vec<Location> {
    let filter = cli_filter.or_else(|| std::env::var("POWDERCAST_LOCATIONS").ok());

    let all = powdercast_source::registry::all_locations();

    let Some(filter_str) = filter else {
        return all;
    };

    let slugs: Vec<&str> = filter_str.split(',').map(str::trim).collect();

    let filtered: Vec<Location> = all
        .into_iter()
        .filter(|l| slugs.contains(&l.slug.as_str()))
        .collect();

    if filtered.is_empty() {
        log::warn!(
            "No matching locations found for filter {:?}. Available: {}",
            slugs,
            powdercast_source::registry::all_locations()
                .iter()
                .map(|l| l.slug.clone())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    filtered
}

/// Fetches and persists the hourly forecast for a single location.
///
/// Three terminal outcomes:
/// 1. Fetch failure — no write is attempted.
/// 2. Empty forecast — success with zero records; the provider may
///    legitimately have nothing new.
/// 3. Write attempted — success with the submitted record count, or
///    failure if the batch was rejected (nothing partially applied).
///
/// Every exit path returns a well-formed outcome. The location ID used
/// for persistence comes from the fetch response, since the provider is
/// the source of truth for its own identifiers.
pub async fn process_location(
    db: &dyn Database,
    source: &dyn ForecastSource,
    location: &Location,
) -> LocationOutcome {
    let forecast = match source.fetch_forecast(&location.slug).await {
        Ok(forecast) => forecast,
        Err(e) => {
            log::warn!("No data returned for {}: {e}", location.slug);
            return LocationOutcome::failure(location.name.clone(), e.to_string());
        }
    };

    if forecast.records.is_empty() {
        log::info!("No hourly forecast data for {}", location.slug);
        return LocationOutcome::success(location.name.clone(), 0);
    }

    log::info!(
        "Processing {} hourly records for {}",
        forecast.records.len(),
        forecast.location_name
    );

    if let Err(e) = queries::upsert_location(
        db,
        forecast.location_id,
        &location.slug,
        &forecast.location_name,
    )
    .await
    {
        log::error!("Database error for {}: {e}", forecast.location_name);
        return LocationOutcome::failure(location.name.clone(), e.to_string());
    }

    match queries::upsert_hourly_forecasts(db, forecast.location_id, &forecast.records).await {
        Ok(written) => {
            log::info!("Upserted {written} records for {}", forecast.location_name);
            LocationOutcome::success(location.name.clone(), written)
        }
        Err(e) => {
            log::error!("Database error for {}: {e}", forecast.location_name);
            LocationOutcome::failure(location.name.clone(), e.to_string())
        }
    }
}

/// Runs the ingestion pipeline concurrently across `locations`.
///
/// All pipelines are started without waiting on one another and every
/// one settles — a failed location is reported in its outcome, never as
/// an error from this function. Results are returned in configuration
/// order regardless of completion order, so repeated runs are diffable.
pub async fn run_ingestion(
    db: &dyn Database,
    source: &dyn ForecastSource,
    locations: &[Location],
) -> IngestionSummary {
    log::info!("Starting forecast ingestion for {} locations...", locations.len());

    // join_all pairs each future with its originating location up front,
    // which is what keeps the output ordered by input.
    let results: Vec<LocationOutcome> = join_all(
        locations
            .iter()
            .map(|location| process_location(db, source, location)),
    )
    .await;

    let total_records: u64 = results.iter().map(|r| r.record_count).sum();
    let summary = IngestionSummary {
        total_records,
        results,
    };

    log::info!("Completed forecast update: {total_records} total records");
    let errors = summary.errors();
    if !errors.is_empty() {
        log::error!(
            "Errors: {}",
            serde_json::to_string(&errors).unwrap_or_else(|_| format!("{errors:?}"))
        );
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use powdercast_forecast_models::{ForecastHourly, LocationForecast};
    use powdercast_source::SourceError;
    use std::collections::BTreeMap;
    use std::time::Duration;
    use switchy_database_connection::init_sqlite_rusqlite;

    /// Scripted per-slug behavior for the mock provider.
    enum Behavior {
        /// Return a forecast for the given provider location ID, after an
        /// optional delay (to force out-of-order completion).
        Forecast {
            location_id: i64,
            records: Vec<ForecastHourly>,
            delay: Duration,
        },
        /// Fail with a provider HTTP status.
        ProviderStatus(u16),
    }

    struct MockSource {
        behaviors: BTreeMap<String, Behavior>,
    }

    #[async_trait]
    impl ForecastSource for MockSource {
        fn id(&self) -> &str {
            "mock"
        }

        async fn fetch_forecast(&self, slug: &str) -> Result<LocationForecast, SourceError> {
            match self.behaviors.get(slug) {
                Some(Behavior::Forecast {
                    location_id,
                    records,
                    delay,
                }) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(*delay).await;
                    }
                    Ok(LocationForecast {
                        location_id: *location_id,
                        location_name: slug.to_string(),
                        records: records.clone(),
                    })
                }
                Some(Behavior::ProviderStatus(status)) => {
                    Err(SourceError::Provider { status: *status })
                }
                None => Err(SourceError::Payload {
                    message: format!("no scripted behavior for {slug}"),
                }),
            }
        }
    }

    async fn setup_db() -> Box<dyn Database> {
        let db = init_sqlite_rusqlite(None).expect("in-memory sqlite");
        powdercast_database::run_migrations(db.as_ref())
            .await
            .expect("run migrations");
        db
    }

    /// Makes the storage layer reject hourly writes for `location_id`,
    /// so one batch can fail while its siblings proceed.
    async fn reject_writes_for_location(db: &dyn Database, location_id: i64) {
        db.exec_raw(&format!(
            "CREATE TRIGGER reject_location BEFORE INSERT ON hourly_forecasts
             WHEN NEW.location_id = {location_id}
             BEGIN SELECT RAISE(ABORT, 'location rejected'); END"
        ))
        .await
        .expect("create trigger");
    }

    fn record(display_at: &str) -> ForecastHourly {
        ForecastHourly {
            display_at: display_at.to_string(),
            display_at_local_label: format!("label {display_at}"),
            temp: 28.0,
            pop: 40.0,
            precip_type: 1,
            precip_accum: 0.3,
            precip_snow: 0.3,
            precip_mix: 0.0,
            precip_rain: 0.0,
            precip_swe: 0.03,
            snow_level: 6500.0,
            slr: 10.0,
        }
    }

    fn records(count: usize) -> Vec<ForecastHourly> {
        (0..count)
            .map(|h| record(&format!("2025-12-01T{h:02}:00:00Z")))
            .collect()
    }

    fn location(slug: &str, name: &str) -> Location {
        Location {
            slug: slug.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn fetch_failure_produces_failed_outcome_without_writing() {
        let db = setup_db().await;
        let source = MockSource {
            behaviors: BTreeMap::from([("l1".to_string(), Behavior::ProviderStatus(500))]),
        };

        let outcome = process_location(db.as_ref(), &source, &location("l1", "L1")).await;

        assert!(!outcome.success);
        assert_eq!(outcome.record_count, 0);
        assert_eq!(outcome.error.as_deref(), Some("provider error: 500"));
        assert_eq!(
            queries::count_hourly_forecasts(db.as_ref(), 1).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn empty_forecast_is_success_with_zero_records() {
        let db = setup_db().await;
        let source = MockSource {
            behaviors: BTreeMap::from([(
                "l1".to_string(),
                Behavior::Forecast {
                    location_id: 1,
                    records: Vec::new(),
                    delay: Duration::ZERO,
                },
            )]),
        };

        let outcome = process_location(db.as_ref(), &source, &location("l1", "L1")).await;

        assert!(outcome.success);
        assert_eq!(outcome.record_count, 0);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn write_failure_for_one_location_does_not_affect_siblings() {
        let db = setup_db().await;
        reject_writes_for_location(db.as_ref(), 99).await;
        let source = MockSource {
            behaviors: BTreeMap::from([
                (
                    "l1".to_string(),
                    Behavior::Forecast {
                        location_id: 99,
                        records: records(2),
                        delay: Duration::ZERO,
                    },
                ),
                (
                    "l2".to_string(),
                    Behavior::Forecast {
                        location_id: 2,
                        records: records(4),
                        delay: Duration::ZERO,
                    },
                ),
            ]),
        };
        let locations = vec![location("l1", "L1"), location("l2", "L2")];

        let summary = run_ingestion(db.as_ref(), &source, &locations).await;

        assert!(!summary.results[0].success);
        assert!(summary.results[1].success);
        assert_eq!(summary.results[1].record_count, 4);
        assert_eq!(summary.total_records, 4);
        assert_eq!(
            queries::count_hourly_forecasts(db.as_ref(), 2).await.unwrap(),
            4
        );
        // The failed batch applied nothing.
        assert_eq!(
            queries::count_hourly_forecasts(db.as_ref(), 99).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn results_keep_configuration_order_regardless_of_completion_order() {
        let db = setup_db().await;
        // L1 resolves well after L2.
        let source = MockSource {
            behaviors: BTreeMap::from([
                (
                    "l1".to_string(),
                    Behavior::Forecast {
                        location_id: 1,
                        records: records(1),
                        delay: Duration::from_millis(50),
                    },
                ),
                (
                    "l2".to_string(),
                    Behavior::Forecast {
                        location_id: 2,
                        records: records(1),
                        delay: Duration::ZERO,
                    },
                ),
            ]),
        };
        let locations = vec![location("l1", "L1"), location("l2", "L2")];

        let summary = run_ingestion(db.as_ref(), &source, &locations).await;

        assert_eq!(summary.results[0].location, "L1");
        assert_eq!(summary.results[1].location, "L2");
    }

    #[tokio::test]
    async fn end_to_end_mixed_success_and_provider_failure() {
        let db = setup_db().await;
        let source = MockSource {
            behaviors: BTreeMap::from([
                (
                    "l1".to_string(),
                    Behavior::Forecast {
                        location_id: 1,
                        records: records(3),
                        delay: Duration::ZERO,
                    },
                ),
                ("l2".to_string(), Behavior::ProviderStatus(500)),
            ]),
        };
        let locations = vec![location("l1", "L1"), location("l2", "L2")];

        let summary = run_ingestion(db.as_ref(), &source, &locations).await;

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.results.len(), 2);

        assert_eq!(summary.results[0].location, "L1");
        assert!(summary.results[0].success);
        assert_eq!(summary.results[0].record_count, 3);

        assert_eq!(summary.results[1].location, "L2");
        assert!(!summary.results[1].success);
        assert_eq!(summary.results[1].record_count, 0);
        assert_eq!(
            summary.results[1].error.as_deref(),
            Some("provider error: 500")
        );

        assert_eq!(
            queries::count_hourly_forecasts(db.as_ref(), 1).await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn rerunning_ingestion_does_not_duplicate_rows() {
        let db = setup_db().await;
        let source = MockSource {
            behaviors: BTreeMap::from([(
                "l1".to_string(),
                Behavior::Forecast {
                    location_id: 1,
                    records: records(3),
                    delay: Duration::ZERO,
                },
            )]),
        };
        let locations = vec![location("l1", "L1")];

        let first = run_ingestion(db.as_ref(), &source, &locations).await;
        let second = run_ingestion(db.as_ref(), &source, &locations).await;

        assert_eq!(first.total_records, 3);
        assert_eq!(second.total_records, 3);
        assert_eq!(
            queries::count_hourly_forecasts(db.as_ref(), 1).await.unwrap(),
            3
        );
    }
}
