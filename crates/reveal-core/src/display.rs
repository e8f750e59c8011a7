//! Presentation collaborators and the text they are given.

use crate::models::RouteResult;

pub const STATUS_POINT_SET: &str = "Point set.";
pub const STATUS_MISSING_POINTS: &str = "Please set both start and end points.";
pub const STATUS_PREFETCHING: &str = "Prefetching route in background...";
pub const STATUS_FINISHING: &str = "Finishing route fetch...";
pub const STATUS_FETCHING: &str = "Fetching route...";
pub const STATUS_RESET: &str = "Reset. Pick start and end points.";

/// Draws a route on whatever surface the session shows.
///
/// Both calls may be repeated; drawing replaces any previous route.
pub trait Renderer: Send + Sync {
    fn draw(&self, route: &RouteResult);
    fn clear(&self);
}

/// Fire-and-forget status and countdown text.
pub trait StatusDisplay: Send + Sync {
    fn set_status(&self, text: &str);
    fn set_countdown_text(&self, text: &str);
}

/// Status line shown once a route is on screen.
pub fn route_summary(route: &RouteResult) -> String {
    format!(
        "Route shown. Distance: {:.2} km, ETA: {} min",
        route.distance_km(),
        route.duration_min()
    )
}
