//! Prefetch / countdown / fallback reveal sequence.
//!
//! `show_route` starts fetching the route immediately and counts down in
//! parallel. At zero the route is taken from, in order:
//!
//! 1. the prefetch slot, if the background fetch already finished;
//! 2. the still-running prefetch, waited on for at most `bounded_wait`;
//! 3. a fresh fetch bounded by the fallback timeout.
//!
//! Prefetch failures are never shown to the user. Only a failure of the
//! final attempt reaches the status display.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};

use crate::config::RevealConfig;
use crate::countdown::{format_countdown, CountdownController, CountdownEvent, CountdownEvents, CountdownState};
use crate::display::{
    route_summary, Renderer, StatusDisplay, STATUS_FETCHING, STATUS_FINISHING,
    STATUS_MISSING_POINTS, STATUS_POINT_SET, STATUS_PREFETCHING, STATUS_RESET,
};
use crate::error::RouteError;
use crate::fetcher::{fetch_with_deadline, RouteFetcher};
use crate::models::{GeoPoint, RouteRequest, RouteResult};
use crate::points::{PointRole, PointSelector};
use crate::prefetch::PrefetchCache;
use crate::timeout::await_with_timeout;

/// Provider code reported when a routing call panics.
const INTERNAL_FAILURE: &str = "internal";

/// Where the revealed route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    /// Prefetch had already finished at expiry
    Prefetched,
    /// Prefetch finished during the bounded wait
    Awaited,
    /// Fetched after expiry
    Fresh,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealOutcome {
    Shown { route: RouteResult, source: RouteSource },
    Failed(RouteError),
    /// Superseded by a newer `show_route`, or stopped/reset
    Cancelled,
}

/// Handle on one running reveal sequence.
pub struct RevealHandle {
    task: JoinHandle<RevealOutcome>,
}

impl RevealHandle {
    pub async fn outcome(self) -> RevealOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => RevealOutcome::Cancelled,
            Err(err) => {
                tracing::error!(error = %err, "route reveal task panicked");
                RevealOutcome::Failed(RouteError::provider(INTERNAL_FAILURE))
            }
        }
    }
}

/// One map session: points, prefetch slot, countdown, and the running sequence.
pub struct RouteRevealCoordinator {
    config: RevealConfig,
    fetcher: Arc<dyn RouteFetcher>,
    renderer: Arc<dyn Renderer>,
    display: Arc<dyn StatusDisplay>,
    points: PointSelector,
    prefetch: PrefetchCache,
    countdown: CountdownController,
    sequence: Option<AbortHandle>,
}

impl RouteRevealCoordinator {
    pub fn new(
        config: RevealConfig,
        fetcher: Arc<dyn RouteFetcher>,
        renderer: Arc<dyn Renderer>,
        display: Arc<dyn StatusDisplay>,
    ) -> Self {
        let prefetch = PrefetchCache::new(fetcher.clone(), config.fetch_timeout);
        let countdown = CountdownController::new(config.tick_period);
        Self {
            config,
            fetcher,
            renderer,
            display,
            points: PointSelector::new(),
            prefetch,
            countdown,
            sequence: None,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn points(&self) -> &PointSelector {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointSelector {
        &mut self.points
    }

    pub fn prefetch(&self) -> &PrefetchCache {
        &self.prefetch
    }

    pub fn countdown(&self) -> &CountdownController {
        &self.countdown
    }

    pub fn countdown_state(&self) -> CountdownState {
        self.countdown.state()
    }

    /// Arm the next map click for `role`.
    pub fn pick(&mut self, role: PointRole) {
        let prompt = self.points.pick(role);
        self.display.set_status(&prompt);
    }

    /// Forward a map click to the point selector.
    pub fn click(&mut self, point: GeoPoint) -> Option<PointRole> {
        let role = self.points.click(point)?;
        self.display.set_status(STATUS_POINT_SET);
        Some(role)
    }

    /// Reveal the route between the selected points after `delay_seconds`.
    pub fn show_route(&mut self, delay_seconds: u64) -> Result<RevealHandle, RouteError> {
        self.show_route_between(self.points.origin(), self.points.destination(), delay_seconds)
    }

    pub fn show_route_between(
        &mut self,
        origin: Option<GeoPoint>,
        destination: Option<GeoPoint>,
        delay_seconds: u64,
    ) -> Result<RevealHandle, RouteError> {
        self.stop();

        let (origin, destination) = match (origin, destination) {
            (Some(origin), Some(destination)) => (origin, destination),
            _ => {
                self.display.set_status(STATUS_MISSING_POINTS);
                return Err(RouteError::Validation(STATUS_MISSING_POINTS.to_string()));
            }
        };

        let request = RouteRequest::new(origin, destination, self.config.travel_mode);
        tracing::info!(
            origin = %origin,
            destination = %destination,
            delay_seconds,
            provider = self.fetcher.name(),
            "starting route reveal"
        );

        self.display.set_status(STATUS_PREFETCHING);
        self.prefetch.begin(request);
        if delay_seconds > 0 {
            self.display.set_countdown_text(&format_countdown(delay_seconds));
        }
        let events = self.countdown.start(delay_seconds);

        let sequence = Sequence {
            request,
            zero_delay: delay_seconds == 0,
            config: self.config.clone(),
            fetcher: self.fetcher.clone(),
            renderer: self.renderer.clone(),
            display: self.display.clone(),
            prefetch: self.prefetch.clone(),
        };
        let task = tokio::spawn(sequence.run(events));
        self.sequence = Some(task.abort_handle());
        Ok(RevealHandle { task })
    }

    /// Stop the countdown and abandon the running sequence.
    pub fn stop(&mut self) {
        self.countdown.stop();
        if let Some(sequence) = self.sequence.take() {
            sequence.abort();
        }
        self.display.set_countdown_text("");
    }

    /// Back to a clean session: no points, no route, no cached prefetch.
    pub fn reset(&mut self) {
        self.stop();
        self.prefetch.discard();
        self.points.clear();
        self.renderer.clear();
        self.display.set_status(STATUS_RESET);
    }
}

impl Drop for RouteRevealCoordinator {
    fn drop(&mut self) {
        if let Some(sequence) = self.sequence.take() {
            sequence.abort();
        }
    }
}

/// Everything one reveal needs once it is detached from the coordinator.
struct Sequence {
    request: RouteRequest,
    zero_delay: bool,
    config: RevealConfig,
    fetcher: Arc<dyn RouteFetcher>,
    renderer: Arc<dyn Renderer>,
    display: Arc<dyn StatusDisplay>,
    prefetch: PrefetchCache,
}

impl Sequence {
    async fn run(self, mut events: CountdownEvents) -> RevealOutcome {
        while let Some(event) = events.recv().await {
            match event {
                CountdownEvent::Tick(remaining) => {
                    self.display.set_countdown_text(&format_countdown(remaining));
                }
                CountdownEvent::Expired => {
                    self.display.set_countdown_text("");
                    return self.reveal().await;
                }
            }
        }
        RevealOutcome::Cancelled
    }

    async fn reveal(&self) -> RevealOutcome {
        let resolved = AssertUnwindSafe(self.resolve())
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                tracing::error!(provider = self.fetcher.name(), "route fetch panicked");
                Err(RouteError::provider(INTERNAL_FAILURE))
            });
        match resolved {
            Ok((route, source)) => {
                self.renderer.draw(&route);
                self.display.set_status(&route_summary(&route));
                tracing::info!(
                    ?source,
                    distance_m = route.distance_m,
                    duration_s = route.duration_s,
                    "route shown"
                );
                RevealOutcome::Shown { route, source }
            }
            Err(err) => {
                tracing::warn!(error = %err, "route reveal failed");
                self.display.set_status(&err.to_string());
                RevealOutcome::Failed(err)
            }
        }
    }

    async fn resolve(&self) -> Result<(RouteResult, RouteSource), RouteError> {
        // A slot left over from another request is never shown.
        let (in_flight, resolved) = if self.prefetch.request() == Some(self.request) {
            (self.prefetch.in_flight(), self.prefetch.resolved())
        } else {
            (None, None)
        };

        if let Some(route) = resolved {
            return Ok((route, RouteSource::Prefetched));
        }

        if let Some(pending) = in_flight {
            self.display.set_status(STATUS_FINISHING);
            // With no countdown the prefetch is the only request; give it the full timeout.
            let wait = if self.zero_delay {
                self.config.fetch_timeout
            } else {
                self.config.bounded_wait
            };
            match await_with_timeout(pending, wait).await {
                Ok(Some(route)) => return Ok((route, RouteSource::Awaited)),
                Ok(None) => tracing::debug!("prefetch failed; fetching again"),
                Err(elapsed) => tracing::debug!(%elapsed, "prefetch too slow; fetching again"),
            }
        }

        self.renderer.clear();
        self.display.set_status(STATUS_FETCHING);
        let route = fetch_with_deadline(
            self.fetcher.as_ref(),
            &self.request,
            self.config.fallback_timeout(),
        )
        .await?;
        Ok((route, RouteSource::Fresh))
    }
}
