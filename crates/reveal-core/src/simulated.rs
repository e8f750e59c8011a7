//! In-process routing provider with scripted latency and failures.
//!
//! Produces a straight-line route between the two points. Useful for demos
//! and for exercising the reveal sequence without network access.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::RouteError;
use crate::fetcher::RouteFetcher;
use crate::models::{RouteRequest, RouteResult, TravelMode};
use crate::spatial::{haversine_distance, interpolate};

const POLYLINE_SEGMENTS: usize = 16;

/// Assumed average speed per travel mode (m/s).
fn speed_mps(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Driving => 13.9,
        TravelMode::Walking => 1.4,
        TravelMode::Bicycling => 4.2,
        TravelMode::Transit => 8.3,
    }
}

pub struct SimulatedRouteFetcher {
    latencies: Vec<Duration>,
    failure: Option<RouteError>,
    failing_calls: usize,
    calls: AtomicUsize,
}

impl SimulatedRouteFetcher {
    /// Every call answers after `latency`.
    pub fn new(latency: Duration) -> Self {
        Self::with_latencies(vec![latency])
    }

    /// Call `i` answers after `latencies[i]`; calls past the end reuse the last entry.
    pub fn with_latencies(latencies: Vec<Duration>) -> Self {
        Self {
            latencies,
            failure: None,
            failing_calls: 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with `error` after its latency.
    pub fn failing(mut self, error: RouteError) -> Self {
        self.failure = Some(error);
        self.failing_calls = usize::MAX;
        self
    }

    /// The first `count` calls fail with `error`, later calls succeed.
    pub fn failing_first(mut self, count: usize, error: RouteError) -> Self {
        self.failure = Some(error);
        self.failing_calls = count;
        self
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn latency_for(&self, call: usize) -> Duration {
        self.latencies
            .get(call)
            .or_else(|| self.latencies.last())
            .copied()
            .unwrap_or_default()
    }

    /// The route this provider answers with for `request`.
    pub fn route_for(request: &RouteRequest) -> RouteResult {
        let (a, b) = (request.origin, request.destination);
        let distance_m = haversine_distance(a.lat, a.lon, b.lat, b.lon);
        RouteResult {
            polyline: interpolate(a, b, POLYLINE_SEGMENTS),
            distance_m,
            duration_s: distance_m / speed_mps(request.travel_mode),
        }
    }
}

impl RouteFetcher for SimulatedRouteFetcher {
    fn name(&self) -> &str {
        "simulated"
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RouteRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<RouteResult, RouteError>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_for(call);
        let failure = if call < self.failing_calls {
            self.failure.clone()
        } else {
            None
        };
        tracing::debug!(call, ?latency, "simulated route fetch");

        async move {
            if latency > timeout {
                tokio::time::sleep(timeout).await;
                return Err(RouteError::Timeout(timeout));
            }
            tokio::time::sleep(latency).await;
            match failure {
                Some(err) => Err(err),
                None => Ok(Self::route_for(request)),
            }
        }
        .boxed()
    }
}
