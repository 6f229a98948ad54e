//! Scheduled ingestion loop.

use powdercast_forecast_models::Location;
use powdercast_source::ForecastSource;
use std::sync::Arc;
use std::time::Duration;
use switchy_database::Database;

/// Default interval between scheduled ingestion runs, in seconds.
const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Spawns the background task that runs ingestion on a fixed interval.
///
/// The interval comes from `INGEST_INTERVAL_SECS` (default one hour);
/// setting it to `0` disables the loop entirely, leaving only the manual
/// trigger endpoint. The first run happens one full interval after
/// startup.
pub fn spawn(db: Arc<dyn Database>, source: Arc<dyn ForecastSource>, locations: Vec<Location>) {
    let interval_secs = std::env::var("INGEST_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    if interval_secs == 0 {
        log::info!("Scheduled ingestion disabled (INGEST_INTERVAL_SECS=0)");
        return;
    }

    log::info!("Scheduling ingestion every {interval_secs}s for {} location(s)", locations.len());

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately; consume it so the first
        // run waits a full interval.
        interval.tick().await;

        loop {
            interval.tick().await;

            let summary =
                powdercast_ingest::run_ingestion(db.as_ref(), source.as_ref(), &locations).await;

            log::info!(
                "Scheduled ingestion run complete: {} records, {} failure(s)",
                summary.total_records,
                summary.errors().len()
            );
        }
    });
}
