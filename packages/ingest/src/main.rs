#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the forecast ingestion tool.

use std::time::Instant;

use clap::{Parser, Subcommand};
use powdercast_database::{db, run_migrations};
use powdercast_ingest::{enabled_locations, run_ingestion};
use powdercast_source::opensnow::{OpenSnowClient, OpenSnowConfig};

#[derive(Parser)]
#[command(name = "powdercast_ingest", about = "Forecast ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and persist forecasts for all configured locations
    Run {
        /// Comma-separated list of location slugs (overrides `POWDERCAST_LOCATIONS` env var)
        #[arg(long)]
        locations: Option<String>,
    },
    /// List all configured locations
    Locations,
    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => {
            log::info!("Running database migrations...");
            let db = db::connect_from_env().await?;
            run_migrations(db.as_ref()).await?;
            log::info!("Migrations complete.");
        }
        Commands::Locations => {
            let locations = powdercast_source::registry::all_locations();
            println!("{:<25} NAME", "SLUG");
            println!("{}", "-".repeat(50));
            for location in &locations {
                println!("{:<25} {}", location.slug, location.name);
            }
        }
        Commands::Run { locations } => {
            let db = db::connect_from_env().await?;
            run_migrations(db.as_ref()).await?;

            let locations = enabled_locations(locations);
            log::info!(
                "Ingesting {} location(s): {}",
                locations.len(),
                locations
                    .iter()
                    .map(|l| l.slug.clone())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            let source = OpenSnowClient::new(OpenSnowConfig::from_env())?;

            let start = Instant::now();
            let summary = run_ingestion(db.as_ref(), &source, &locations).await;
            let elapsed = start.elapsed();

            log::info!(
                "Ingestion complete: {} records in {:.1}s",
                summary.total_records,
                elapsed.as_secs_f64()
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
