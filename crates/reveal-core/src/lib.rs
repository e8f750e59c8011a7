//! Delayed route reveal: prefetch a route while a countdown runs, then
//! show it the moment the countdown reaches zero.

pub mod config;
pub mod coordinator;
pub mod countdown;
pub mod display;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod points;
pub mod prefetch;
pub mod simulated;
pub mod spatial;
pub mod timeout;

pub use config::{delay_seconds_from_minutes, RevealConfig};
pub use coordinator::{RevealHandle, RevealOutcome, RouteRevealCoordinator, RouteSource};
pub use countdown::{
    format_countdown, CountdownController, CountdownEvent, CountdownPhase, CountdownState,
};
pub use display::{route_summary, Renderer, StatusDisplay};
pub use error::RouteError;
pub use fetcher::{fetch_with_deadline, RouteFetcher};
pub use models::{Bounds, GeoPoint, RouteRequest, RouteResult, TravelMode};
pub use points::{PointRole, PointSelector};
pub use prefetch::{PrefetchCache, PrefetchHandle};
pub use simulated::SimulatedRouteFetcher;
pub use spatial::haversine_distance;
pub use timeout::{await_with_timeout, TimedOut};
