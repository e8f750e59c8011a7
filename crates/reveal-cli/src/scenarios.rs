//! Pre-defined reveal scenarios run against the simulated provider.

use reveal_core::{
    GeoPoint, PointRole, RevealConfig, RevealOutcome, Renderer, RouteError,
    RouteRevealCoordinator, SimulatedRouteFetcher, StatusDisplay,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// A named reveal: two points, a countdown, and how the provider behaves.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub delay_seconds: u64,
    /// Latency of each successive fetch; the last entry repeats
    pub latencies: Vec<Duration>,
    pub failure: Option<RouteError>,
}

/// What happened when a scenario ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: RevealOutcome,
    pub fetches: usize,
    /// Countdown timers the session created
    pub timers: u64,
    pub elapsed: Duration,
}

/// No countdown: the only request is the prefetch itself.
pub fn create_zero_delay_scenario() -> Scenario {
    Scenario {
        name: "zero-delay".to_string(),
        origin: GeoPoint::new(0.0, 0.0),
        destination: GeoPoint::new(1.0, 1.0),
        delay_seconds: 0,
        latencies: vec![Duration::from_millis(300)],
        failure: None,
    }
}

/// One minute countdown, prefetch done after ten seconds.
pub fn create_prefetched_scenario() -> Scenario {
    Scenario {
        name: "prefetched".to_string(),
        origin: GeoPoint::new(33.6846, -117.8265),
        destination: GeoPoint::new(33.6405, -117.8443),
        delay_seconds: 60,
        latencies: vec![Duration::from_secs(10)],
        failure: None,
    }
}

/// Prefetch hangs past the bounded wait; a fast fresh fetch wins.
pub fn create_slow_provider_scenario() -> Scenario {
    Scenario {
        name: "slow-provider".to_string(),
        origin: GeoPoint::new(52.5200, 13.4050),
        destination: GeoPoint::new(52.5163, 13.3777),
        delay_seconds: 5,
        latencies: vec![Duration::from_secs(20), Duration::from_secs(1)],
        failure: None,
    }
}

/// Every request fails; the final failure is what the user sees.
pub fn create_failing_scenario() -> Scenario {
    Scenario {
        name: "provider-down".to_string(),
        origin: GeoPoint::new(48.8566, 2.3522),
        destination: GeoPoint::new(48.8606, 2.3376),
        delay_seconds: 5,
        latencies: vec![Duration::from_millis(500)],
        failure: Some(RouteError::provider("UNKNOWN_ERROR")),
    }
}

pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        create_zero_delay_scenario(),
        create_prefetched_scenario(),
        create_slow_provider_scenario(),
        create_failing_scenario(),
    ]
}

/// Timing policy with every duration multiplied by `time_scale`.
pub fn scaled_config(time_scale: f64) -> RevealConfig {
    let defaults = RevealConfig::default();
    RevealConfig {
        fetch_timeout: defaults.fetch_timeout.mul_f64(time_scale),
        bounded_wait: defaults.bounded_wait.mul_f64(time_scale),
        tick_period: defaults.tick_period.mul_f64(time_scale),
        ..defaults
    }
}

/// Run one scenario to completion on a fresh session.
///
/// # Arguments
/// * `time_scale` - Multiplier for every latency and timer (1.0 = real seconds)
/// * `screen` - Receives map and status updates
pub async fn run_scenario<S>(scenario: &Scenario, time_scale: f64, screen: Arc<S>) -> ScenarioReport
where
    S: Renderer + StatusDisplay + 'static,
{
    let latencies = scenario
        .latencies
        .iter()
        .map(|latency| latency.mul_f64(time_scale))
        .collect();
    let mut fetcher = SimulatedRouteFetcher::with_latencies(latencies);
    if let Some(err) = &scenario.failure {
        fetcher = fetcher.failing(err.clone());
    }
    let fetcher = Arc::new(fetcher);

    let mut coordinator = RouteRevealCoordinator::new(
        scaled_config(time_scale),
        fetcher.clone(),
        screen.clone(),
        screen,
    );
    coordinator.pick(PointRole::Start);
    coordinator.click(scenario.origin);
    coordinator.pick(PointRole::End);
    coordinator.click(scenario.destination);

    tracing::info!(scenario = %scenario.name, delay = scenario.delay_seconds, "running scenario");
    let started = Instant::now();
    let outcome = match coordinator.show_route(scenario.delay_seconds) {
        Ok(handle) => handle.outcome().await,
        Err(err) => RevealOutcome::Failed(err),
    };

    ScenarioReport {
        name: scenario.name.clone(),
        outcome,
        fetches: fetcher.calls(),
        timers: coordinator.countdown().timers_started(),
        elapsed: started.elapsed(),
    }
}
