use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use itinerary_planner::cache::{CachedForecast, CachedRouter, MemoryCache};
use itinerary_planner::config::PlannerConfig;
use itinerary_planner::haversine::HaversineRouter;
use itinerary_planner::openmeteo::OpenMeteoClient;
use itinerary_planner::osrm::OsrmClient;
use itinerary_planner::traits::{ForecastProvider, RoutingProvider};
use itinerary_planner::{ItineraryPlanner, TripRequest};

/// Build a day-by-day itinerary from a JSON trip request.
#[derive(Debug, Parser)]
#[command(name = "plan-trip", version)]
struct Args {
    /// Trip request (JSON)
    request: PathBuf,

    /// Planner configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Estimate travel from straight-line distance instead of calling OSRM
    #[arg(long)]
    offline: bool,

    /// Fill an empty forecast from Open-Meteo
    #[arg(long)]
    fetch_forecast: bool,

    /// Pretty-print the itinerary
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = PlannerConfig::load(args.config.as_deref()).context("loading planner config")?;

    let raw = fs::read_to_string(&args.request)
        .with_context(|| format!("reading trip request {}", args.request.display()))?;
    let mut request = parse_request(&raw, &config).context("parsing trip request")?;

    let cache = Arc::new(MemoryCache::new(config.cache_capacity));
    let ttl = Duration::from_secs(config.cache_ttl_secs);

    if args.fetch_forecast && request.forecast.is_empty() {
        let client = OpenMeteoClient::new(config.weather.clone()).context("building forecast client")?;
        let forecast = CachedForecast::new(client, Arc::clone(&cache), ttl);
        fill_forecast(&forecast, &mut request);
    }

    let json = if args.offline {
        let router = CachedRouter::new(HaversineRouter::default(), Arc::clone(&cache), ttl);
        run(router, &config, &request, args.pretty)?
    } else {
        let client = OsrmClient::new(config.osrm.clone()).context("building routing client")?;
        let router = CachedRouter::new(client, Arc::clone(&cache), ttl);
        run(router, &config, &request, args.pretty)?
    };

    println!("{json}");
    Ok(())
}

/// Mode and constraints missing from the request come from the config.
fn parse_request(raw: &str, config: &PlannerConfig) -> Result<TripRequest> {
    let mut value: serde_json::Value = serde_json::from_str(raw)?;
    if let Some(object) = value.as_object_mut() {
        if !object.contains_key("mode") {
            object.insert("mode".to_string(), serde_json::to_value(config.transport_mode)?);
        }
        if !object.contains_key("constraints") {
            object.insert("constraints".to_string(), serde_json::to_value(&config.constraints)?);
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// A failed forecast fetch degrades to moderate days; it never stops planning.
fn fill_forecast(provider: &impl ForecastProvider, request: &mut TripRequest) {
    let dates = request.trip_dates();
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return;
    };
    match provider.daily_forecast(request.accommodation.coordinates, *first, *last) {
        Ok(days) => {
            tracing::info!(days = days.len(), "fetched forecast");
            request.forecast = days;
        }
        Err(err) => tracing::warn!(error = %err, "forecast unavailable, continuing without weather"),
    }
}

fn run<R>(router: R, config: &PlannerConfig, request: &TripRequest, pretty: bool) -> Result<String>
where
    R: RoutingProvider + Sync,
{
    let planner = ItineraryPlanner::new(router).with_max_workers(config.max_workers);
    let itinerary = planner.plan(request).context("building itinerary")?;

    let json = if pretty {
        serde_json::to_string_pretty(&itinerary)?
    } else {
        serde_json::to_string(&itinerary)?
    };
    Ok(json)
}
