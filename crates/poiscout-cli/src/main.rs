mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use poiscout_service::{NearbyOptions, PoiService, PoiServiceConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "poiscout")]
#[command(about = "Nearby points of interest from OpenStreetMap")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List POIs around a coordinate, nearest first
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters
        #[arg(long, default_value = "1000")]
        radius: u32,
        /// Category id to include; repeat for several (default: all)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Maximum number of POIs to return
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Keep backend order and omit distances
        #[arg(long)]
        no_distance: bool,
    },
    /// Find POIs whose name matches the given text
    Search {
        text: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters (default: 2000)
        #[arg(long)]
        radius: Option<u32>,
    },
    /// Print the category catalog
    Categories,
    /// Repeat a nearby lookup to observe caching and rate limiting
    Watch {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, default_value = "1000")]
        radius: u32,
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Number of lookups to run
        #[arg(long, default_value = "3")]
        times: u32,
        /// Seconds to wait between lookups
        #[arg(long, default_value = "5")]
        every: u64,
    },
}

fn nearby_options(radius: u32, categories: Vec<String>, limit: usize, no_distance: bool) -> NearbyOptions {
    let defaults = NearbyOptions::default();
    NearbyOptions {
        radius,
        categories: if categories.is_empty() {
            defaults.categories
        } else {
            categories
        },
        limit,
        include_distance: !no_distance,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = poiscout_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("poiscout ready; run `poiscout --help` for commands");
        return Ok(());
    };

    tracing::debug!(env = %config.env, endpoint = %config.overpass_url, "configuration loaded");
    let service = Arc::new(PoiService::new(PoiServiceConfig::from_app_config(&config))?);

    match command {
        Commands::Nearby {
            lat,
            lng,
            radius,
            categories,
            limit,
            no_distance,
        } => {
            let options = nearby_options(radius, categories, limit, no_distance);
            commands::run_nearby(&service, lat, lng, &options).await?;
        }
        Commands::Search {
            text,
            lat,
            lng,
            radius,
        } => commands::run_search(&service, &text, lat, lng, radius).await?,
        Commands::Categories => commands::run_categories(&service)?,
        Commands::Watch {
            lat,
            lng,
            radius,
            categories,
            times,
            every,
        } => {
            let options = nearby_options(radius, categories, NearbyOptions::default().limit, false);
            let schedule = commands::WatchSchedule {
                times,
                every: std::time::Duration::from_secs(every),
                sweep: std::time::Duration::from_secs(config.cache_sweep_secs),
            };
            commands::run_watch(service, lat, lng, &options, schedule).await?;
        }
    }

    Ok(())
}
