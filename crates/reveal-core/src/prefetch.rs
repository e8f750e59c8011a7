//! Single-slot prefetch cache.
//!
//! Holds at most one route fetch, pending or resolved, for the request it
//! was started for. Starting a new prefetch throws away whatever the slot
//! held; a superseded fetch keeps running but its result is never stored.

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::fetcher::{fetch_with_deadline, RouteFetcher};
use crate::models::{RouteRequest, RouteResult};

/// Awaitable view of an in-flight prefetch. `None` means the fetch failed.
pub type PrefetchHandle = Shared<BoxFuture<'static, Option<RouteResult>>>;

enum SlotState {
    Pending(PrefetchHandle),
    Resolved(RouteResult),
    Failed,
}

struct Slot {
    generation: u64,
    request: RouteRequest,
    state: SlotState,
}

#[derive(Default)]
struct Inner {
    generation: u64,
    slot: Option<Slot>,
}

#[derive(Clone)]
pub struct PrefetchCache {
    fetcher: Arc<dyn RouteFetcher>,
    timeout: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl PrefetchCache {
    pub fn new(fetcher: Arc<dyn RouteFetcher>, timeout: Duration) -> Self {
        Self {
            fetcher,
            timeout,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Discard the slot and start fetching `request` in the background.
    ///
    /// Failures are logged and leave the slot empty; they are never returned.
    pub fn begin(&self, request: RouteRequest) -> PrefetchHandle {
        // Hold the lock until the slot is in place so a fast fetch cannot
        // settle before its own slot exists.
        let mut inner = self.lock();
        inner.generation += 1;
        inner.slot = None;
        let generation = inner.generation;

        let fetcher = self.fetcher.clone();
        let shared = self.inner.clone();
        let timeout = self.timeout;
        let task = tokio::spawn(async move {
            let outcome = fetch_with_deadline(fetcher.as_ref(), &request, timeout).await;

            let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = guard
                .slot
                .as_mut()
                .filter(|slot| slot.generation == generation);
            if slot.is_none() {
                tracing::debug!(generation, "discarding superseded prefetch");
            }

            match outcome {
                Ok(route) => {
                    if let Some(slot) = slot {
                        slot.state = SlotState::Resolved(route.clone());
                    }
                    Some(route)
                }
                Err(err) => {
                    tracing::warn!(provider = fetcher.name(), error = %err, "route prefetch failed");
                    if let Some(slot) = slot {
                        slot.state = SlotState::Failed;
                    }
                    None
                }
            }
        });

        let handle: PrefetchHandle = async move {
            match task.await {
                Ok(route) => route,
                Err(err) => {
                    if err.is_panic() {
                        tracing::error!(generation, error = %err, "route prefetch panicked");
                    }
                    None
                }
            }
        }
        .boxed()
        .shared();
        inner.slot = Some(Slot {
            generation,
            request,
            state: SlotState::Pending(handle.clone()),
        });
        tracing::debug!(generation, provider = self.fetcher.name(), "prefetch started");
        handle
    }

    /// Completed route, if the current prefetch has finished successfully.
    pub fn resolved(&self) -> Option<RouteResult> {
        match self.lock().slot.as_ref()?.state {
            SlotState::Resolved(ref route) => Some(route.clone()),
            _ => None,
        }
    }

    /// The still-running prefetch, if any.
    pub fn in_flight(&self) -> Option<PrefetchHandle> {
        match self.lock().slot.as_ref()?.state {
            SlotState::Pending(ref handle) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Request the current slot belongs to.
    pub fn request(&self) -> Option<RouteRequest> {
        self.lock().slot.as_ref().map(|slot| slot.request)
    }

    pub fn discard(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.slot = None;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use crate::models::{GeoPoint, TravelMode};
    use crate::simulated::SimulatedRouteFetcher;

    fn request(lat: f64) -> RouteRequest {
        RouteRequest::new(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(lat, 1.0),
            TravelMode::Driving,
        )
    }

    fn cache(fetcher: SimulatedRouteFetcher) -> (PrefetchCache, Arc<SimulatedRouteFetcher>) {
        let fetcher = Arc::new(fetcher);
        (
            PrefetchCache::new(fetcher.clone(), Duration::from_secs(15)),
            fetcher,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_in_background() {
        let (cache, fetcher) = cache(SimulatedRouteFetcher::new(Duration::from_secs(2)));
        let handle = cache.begin(request(1.0));

        assert!(cache.resolved().is_none());
        assert!(cache.in_flight().is_some());
        assert_eq!(cache.request(), Some(request(1.0)));

        let route = handle.await.expect("route");
        assert_eq!(cache.resolved(), Some(route));
        assert!(cache.in_flight().is_none());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_without_being_polled() {
        let (cache, _) = cache(SimulatedRouteFetcher::new(Duration::from_secs(1)));
        drop(cache.begin(request(1.0)));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(cache.resolved().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_leaves_slot_empty() {
        let (cache, _) = cache(
            SimulatedRouteFetcher::new(Duration::from_secs(1)).failing(RouteError::NoRouteFound),
        );
        let handle = cache.begin(request(1.0));

        assert_eq!(handle.await, None);
        assert!(cache.resolved().is_none());
        assert!(cache.in_flight().is_none());
        assert_eq!(cache.request(), Some(request(1.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn new_begin_discards_previous_slot() {
        let (cache, fetcher) = cache(SimulatedRouteFetcher::with_latencies(vec![
            Duration::from_secs(5),
            Duration::from_secs(1),
        ]));
        let first = cache.begin(request(1.0));
        let second = cache.begin(request(2.0));

        let newer = second.await.expect("second route");
        assert_eq!(newer.polyline.last(), Some(&GeoPoint::new(2.0, 1.0)));

        // the slower, superseded fetch settles later and must not overwrite
        let older = first.await.expect("first route");
        assert_ne!(older, newer);
        assert_eq!(cache.resolved(), Some(newer));
        assert_eq!(cache.request(), Some(request(2.0)));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn discard_drops_late_result() {
        let (cache, _) = cache(SimulatedRouteFetcher::new(Duration::from_secs(1)));
        let handle = cache.begin(request(1.0));
        cache.discard();

        assert!(handle.await.is_some());
        assert!(cache.resolved().is_none());
        assert!(cache.request().is_none());
    }
}
