//! Command handlers. Results go to stdout as JSON; logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use poiscout_service::{spawn_cache_sweeper, NearbyOptions, PoiService};
use serde::Serialize;

/// Timing for the `watch` command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WatchSchedule {
    pub times: u32,
    pub every: Duration,
    /// Period of the background cache sweeper.
    pub sweep: Duration,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if the lookup fails with no cached fallback.
pub(crate) async fn run_nearby(
    service: &PoiService,
    lat: f64,
    lng: f64,
    options: &NearbyOptions,
) -> anyhow::Result<()> {
    let result = service.get_nearby_pois(lat, lng, options).await?;
    tracing::info!(
        total = result.total,
        source = ?result.source,
        "nearby lookup complete"
    );
    print_json(&result)
}

/// # Errors
///
/// Returns an error if the search fails.
pub(crate) async fn run_search(
    service: &PoiService,
    text: &str,
    lat: f64,
    lng: f64,
    radius: Option<u32>,
) -> anyhow::Result<()> {
    let pois = service.search_pois(text, lat, lng, radius).await?;
    print_json(&pois)
}

pub(crate) fn run_categories(service: &PoiService) -> anyhow::Result<()> {
    print_json(service.get_categories())
}

/// Runs the same nearby lookup `schedule.times` times with the cache sweeper
/// active, then prints cache statistics.
///
/// Individual lookup failures are logged and the loop continues.
///
/// # Errors
///
/// Returns an error only if output cannot be serialized.
pub(crate) async fn run_watch(
    service: Arc<PoiService>,
    lat: f64,
    lng: f64,
    options: &NearbyOptions,
    schedule: WatchSchedule,
) -> anyhow::Result<()> {
    let sweeper = spawn_cache_sweeper(Arc::clone(&service), schedule.sweep);

    for round in 1..=schedule.times {
        match service.get_nearby_pois(lat, lng, options).await {
            Ok(result) => {
                tracing::info!(
                    round,
                    total = result.total,
                    source = ?result.source,
                    "watch round complete"
                );
                println!("{}", serde_json::to_string(&result)?);
            }
            Err(e) => {
                tracing::error!(round, code = e.code(), error = %e, "watch round failed");
            }
        }
        if round < schedule.times {
            tokio::time::sleep(schedule.every).await;
        }
    }

    sweeper.abort();
    print_json(&service.cache_stats())
}
