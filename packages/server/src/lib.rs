#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the powdercast application.
//!
//! Serves the forecast REST API and the static chart frontend, and hosts
//! the scheduled ingestion loop. A manual `/trigger-cron` endpoint runs
//! the same ingestion pipeline on demand for debugging.

mod handlers;
mod scheduler;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use powdercast_database::{db, run_migrations};
use powdercast_forecast_models::Location;
use powdercast_source::ForecastSource;
use powdercast_source::opensnow::{OpenSnowClient, OpenSnowConfig};
use std::sync::Arc;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<dyn Database>,
    /// Forecast provider client.
    pub source: Arc<dyn ForecastSource>,
    /// Locations to ingest, in configuration order.
    pub locations: Vec<Location>,
}

/// Starts the powdercast API server.
///
/// Connects to the database, runs migrations, spawns the scheduled
/// ingestion loop, and starts the Actix-Web HTTP server. This is a
/// regular async function — the caller is responsible for providing the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database connection fails, migrations fail, or the
/// provider client cannot be built.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env()
        .await
        .expect("Failed to connect to database");

    log::info!("Running migrations...");
    run_migrations(db_conn.as_ref())
        .await
        .expect("Failed to run migrations");

    let source = OpenSnowClient::new(OpenSnowConfig::from_env())
        .expect("Failed to build forecast provider client");

    let db: Arc<dyn Database> = Arc::from(db_conn);
    let source: Arc<dyn ForecastSource> = Arc::new(source);
    let locations = powdercast_ingest::enabled_locations(None);

    scheduler::spawn(db.clone(), source.clone(), locations.clone());

    let state = web::Data::new(AppState {
        db,
        source,
        locations,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/trigger-cron", web::get().to(handlers::trigger_cron))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/forecasts", web::get().to(handlers::forecasts))
                    .route("/locations", web::get().to(handlers::locations)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
