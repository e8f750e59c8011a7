//! Reveal a route between two points after a countdown.
//!
//! The route is prefetched as soon as the command starts, so by the time
//! the countdown ends it is usually already available.
//!
//! Usage:
//!   cargo run -p reveal-cli --bin show_route -- --start 52.52,13.405 --end 52.5163,13.3777 --delay-minutes 1

use anyhow::{bail, Context, Result};
use clap::Parser;
use reveal_cli::terminal::describe;
use reveal_cli::{build_fetcher, CliConfig, ProviderKind, Terminal};
use reveal_core::{
    delay_seconds_from_minutes, format_countdown, GeoPoint, PointRole, RevealOutcome,
    RouteRevealCoordinator, TravelMode,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Show a route after a delay, prefetching it in the background
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Start point as "lat,lon"
    #[arg(long)]
    start: String,

    /// End point as "lat,lon"
    #[arg(long)]
    end: String,

    /// Minutes to count down before the route is shown
    #[arg(long, default_value_t = 0)]
    delay_minutes: i64,

    /// Routing provider: osrm, google or simulated (overrides REVEAL_PROVIDER)
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// driving, walking, bicycling or transit (overrides REVEAL_TRAVEL_MODE)
    #[arg(long)]
    travel_mode: Option<TravelMode>,

    /// Provider base URL (overrides OSRM_URL / GOOGLE_MAPS_URL)
    #[arg(long)]
    url: Option<String>,

    /// Google Maps API key (overrides GOOGLE_MAPS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Per-request timeout in seconds (overrides REVEAL_FETCH_TIMEOUT_SECS)
    #[arg(long)]
    fetch_timeout: Option<u64>,

    /// Timeout in seconds of the fetch issued when the countdown ends
    /// (overrides REVEAL_FALLBACK_TIMEOUT_SECS)
    #[arg(long)]
    fallback_timeout: Option<u64>,
}

impl Args {
    fn apply(&self, config: &mut CliConfig) {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(mode) = self.travel_mode {
            config.travel_mode = mode;
        }
        if let Some(url) = &self.url {
            match config.provider {
                ProviderKind::Google => config.google_maps_url = url.clone(),
                _ => config.osrm_url = url.clone(),
            }
        }
        if let Some(key) = &self.api_key {
            config.google_api_key = Some(key.clone());
        }
        if let Some(secs) = self.fetch_timeout {
            config.fetch_timeout_secs = secs;
        }
        if let Some(secs) = self.fallback_timeout {
            config.fallback_timeout_secs = Some(secs);
        }
    }
}

fn parse_point(input: &str, name: &str) -> Result<GeoPoint> {
    GeoPoint::parse_pair(input)
        .with_context(|| format!("invalid {} point '{}', expected \"lat,lon\"", name, input))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("reveal_core=info".parse()?)
            .add_directive("reveal_providers=info".parse()?))
        .init();

    let args = Args::parse();
    let mut config = CliConfig::from_env();
    args.apply(&mut config);

    let start = parse_point(&args.start, "start")?;
    let end = parse_point(&args.end, "end")?;
    let delay_seconds = delay_seconds_from_minutes(args.delay_minutes);

    let fetcher = build_fetcher(&config)?;
    println!(
        "Routing {} -> {} via {} ({})",
        start, end, config.provider, config.travel_mode
    );

    let terminal = Arc::new(Terminal::stdout());
    let mut coordinator = RouteRevealCoordinator::new(
        config.reveal_config(),
        fetcher,
        terminal.clone(),
        terminal,
    );
    // Typed coordinates stand in for a searched place.
    coordinator.points_mut().set_place(PointRole::Start, start);
    coordinator.points_mut().set_place(PointRole::End, end);
    for line in coordinator.points().display_lines() {
        println!("{}", line);
    }

    let handle = coordinator.show_route(delay_seconds)?;
    let outcome = tokio::select! {
        outcome = handle.outcome() => outcome,
        _ = tokio::signal::ctrl_c() => {
            let state = coordinator.countdown_state();
            coordinator.stop();
            if state.running {
                println!("Stopped with {} left.", format_countdown(state.remaining_seconds));
            }
            RevealOutcome::Cancelled
        }
    };

    match outcome {
        RevealOutcome::Shown { route, source } => {
            println!("{} [{:?}]", describe(&route), source);
            Ok(())
        }
        RevealOutcome::Failed(err) => bail!("route reveal failed: {}", err),
        RevealOutcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
    }
}
