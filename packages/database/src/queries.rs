//! Database query functions for forecast data.
//!
//! All writes are parameterized raw SQL through `exec_raw_params()`. The
//! hourly upsert is a single multi-row statement per location so each
//! location's batch is one atomic unit — either every row for that run is
//! applied or none are.

use std::fmt::Write as _;

use moosicbox_json_utils::database::ToValue as _;
use powdercast_database_models::{HourlyForecastRow, LocationRow};
use powdercast_forecast_models::ForecastHourly;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Bound parameters per hourly forecast row (`updated_at` is assigned
/// server-side). A 15-day hourly horizon is ~360 rows, far below the
/// 65,535-parameter statement cap on `PostgreSQL`.
const PARAMS_PER_ROW: usize = 13;

/// Inserts or updates a location registration.
///
/// The ID is the provider's own numeric identifier, taken from the fetch
/// response rather than static configuration.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_location(
    db: &dyn Database,
    id: i64,
    slug: &str,
    name: &str,
) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO locations (id, slug, name)
         VALUES ($1, $2, $3)
         ON CONFLICT (id) DO UPDATE SET
             slug = EXCLUDED.slug,
             name = EXCLUDED.name",
        &[
            DatabaseValue::Int64(id),
            DatabaseValue::String(slug.to_string()),
            DatabaseValue::String(name.to_string()),
        ],
    )
    .await?;

    Ok(())
}

/// Upserts a batch of hourly forecast records for one location.
///
/// Builds a single multi-row `INSERT ... ON CONFLICT DO UPDATE` statement
/// keyed on `(location_id, display_at, display_at_local_label)`. Re-running
/// ingestion for the same hours overwrites every measurement column in
/// place and refreshes `updated_at`; no duplicate rows are ever created.
///
/// Returns the number of records submitted (insert vs. update is
/// indistinguishable to the caller). An empty slice returns `Ok(0)`
/// without touching storage.
///
/// # Errors
///
/// Returns [`DbError`] if the batch statement fails. On failure nothing
/// is applied — the statement is the transaction boundary.
pub async fn upsert_hourly_forecasts(
    db: &dyn Database,
    location_id: i64,
    records: &[ForecastHourly],
) -> Result<u64, DbError> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut sql = String::from(
        "INSERT INTO hourly_forecasts (
            location_id, display_at, display_at_local_label, temp, pop,
            precip_type, precip_accum, precip_snow, precip_mix, precip_rain,
            precip_swe, snow_level, slr, updated_at
        ) VALUES ",
    );
    let mut params: Vec<DatabaseValue> = Vec::with_capacity(records.len() * PARAMS_PER_ROW);
    let mut idx = 1usize;

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        write!(
            sql,
            "(${a}, ${b}, ${c}, ${d}, ${e}, ${f}, ${g}, ${h}, ${i}, ${j}, ${k}, ${l}, ${m}, CURRENT_TIMESTAMP)",
            a = idx,
            b = idx + 1,
            c = idx + 2,
            d = idx + 3,
            e = idx + 4,
            f = idx + 5,
            g = idx + 6,
            h = idx + 7,
            i = idx + 8,
            j = idx + 9,
            k = idx + 10,
            l = idx + 11,
            m = idx + 12,
        )
        .unwrap();

        params.push(DatabaseValue::Int64(location_id));
        params.push(DatabaseValue::String(record.display_at.clone()));
        params.push(DatabaseValue::String(record.display_at_local_label.clone()));
        params.push(DatabaseValue::Real64(record.temp));
        params.push(DatabaseValue::Real64(record.pop));
        params.push(DatabaseValue::Int32(record.precip_type));
        params.push(DatabaseValue::Real64(record.precip_accum));
        params.push(DatabaseValue::Real64(record.precip_snow));
        params.push(DatabaseValue::Real64(record.precip_mix));
        params.push(DatabaseValue::Real64(record.precip_rain));
        params.push(DatabaseValue::Real64(record.precip_swe));
        params.push(DatabaseValue::Real64(record.snow_level));
        params.push(DatabaseValue::Real64(record.slr));
        idx += PARAMS_PER_ROW;
    }

    sql.push_str(
        " ON CONFLICT (location_id, display_at, display_at_local_label) DO UPDATE SET
            temp = EXCLUDED.temp,
            pop = EXCLUDED.pop,
            precip_type = EXCLUDED.precip_type,
            precip_accum = EXCLUDED.precip_accum,
            precip_snow = EXCLUDED.precip_snow,
            precip_mix = EXCLUDED.precip_mix,
            precip_rain = EXCLUDED.precip_rain,
            precip_swe = EXCLUDED.precip_swe,
            snow_level = EXCLUDED.snow_level,
            slr = EXCLUDED.slr,
            updated_at = CURRENT_TIMESTAMP",
    );

    db.exec_raw_params(&sql, &params).await?;

    Ok(records.len() as u64)
}

/// Queries stored hourly forecasts for a location slug, ordered by
/// `display_at` ascending and capped at `limit` rows.
///
/// This is the read path the chart page uses; ingestion guarantees the
/// rows it sees are duplicate-free and current as of the last successful
/// run.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn query_hourly_forecasts(
    db: &dyn Database,
    slug: &str,
    limit: u32,
) -> Result<Vec<HourlyForecastRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT hf.location_id, hf.display_at, hf.display_at_local_label,
                    hf.temp, hf.pop, hf.precip_type, hf.precip_accum,
                    hf.precip_snow, hf.precip_mix, hf.precip_rain,
                    hf.precip_swe, hf.snow_level, hf.slr, hf.updated_at
             FROM hourly_forecasts hf
             JOIN locations l ON hf.location_id = l.id
             WHERE l.slug = $1
             ORDER BY hf.display_at ASC
             LIMIT $2",
            &[
                DatabaseValue::String(slug.to_string()),
                DatabaseValue::Int64(i64::from(limit)),
            ],
        )
        .await?;

    let mut forecasts = Vec::with_capacity(rows.len());

    for row in &rows {
        let updated_at_naive: chrono::NaiveDateTime = row.to_value("updated_at").unwrap_or_default();
        let updated_at = chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(
            updated_at_naive,
            chrono::Utc,
        );

        forecasts.push(HourlyForecastRow {
            location_id: row.to_value("location_id").unwrap_or(0),
            display_at: row.to_value("display_at").unwrap_or_default(),
            display_at_local_label: row.to_value("display_at_local_label").unwrap_or_default(),
            temp: row.to_value("temp").unwrap_or(0.0),
            pop: row.to_value("pop").unwrap_or(0.0),
            precip_type: row.to_value("precip_type").unwrap_or(0),
            precip_accum: row.to_value("precip_accum").unwrap_or(0.0),
            precip_snow: row.to_value("precip_snow").unwrap_or(0.0),
            precip_mix: row.to_value("precip_mix").unwrap_or(0.0),
            precip_rain: row.to_value("precip_rain").unwrap_or(0.0),
            precip_swe: row.to_value("precip_swe").unwrap_or(0.0),
            snow_level: row.to_value("snow_level").unwrap_or(0.0),
            slr: row.to_value("slr").unwrap_or(0.0),
            updated_at,
        });
    }

    Ok(forecasts)
}

/// Returns all registered locations, ordered by name.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_all_locations(db: &dyn Database) -> Result<Vec<LocationRow>, DbError> {
    let rows = db
        .query_raw_params("SELECT id, slug, name FROM locations ORDER BY name", &[])
        .await?;

    Ok(rows
        .iter()
        .map(|row| LocationRow {
            id: row.to_value("id").unwrap_or(0),
            slug: row.to_value("slug").unwrap_or_default(),
            name: row.to_value("name").unwrap_or_default(),
        })
        .collect())
}

/// Counts the stored hourly forecast rows for one location.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn count_hourly_forecasts(db: &dyn Database, location_id: i64) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) as cnt FROM hourly_forecasts WHERE location_id = $1",
            &[DatabaseValue::Int64(location_id)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(0);
    };

    Ok(row.to_value("cnt").unwrap_or(0))
}
