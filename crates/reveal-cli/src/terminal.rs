//! Text-mode renderer and status line.

use reveal_core::{route_summary, Renderer, RouteResult, StatusDisplay};
use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

/// Writes map and status updates as lines of text.
///
/// Implements both collaborator traits so one value can be handed to the
/// coordinator as renderer and status display.
pub struct Terminal<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl Terminal<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write + Send> Renderer for Terminal<W> {
    fn draw(&self, route: &RouteResult) {
        let (Some(first), Some(last)) = (route.polyline.first(), route.polyline.last()) else {
            self.line("[map] empty route");
            return;
        };
        self.line(&format!(
            "[map] route with {} points from ({}) to ({})",
            route.polyline.len(),
            first,
            last
        ));
        if let Some(bounds) = route.bounds() {
            self.line(&format!(
                "[map] fit bounds ({:.5}, {:.5}) .. ({:.5}, {:.5}), centre ({})",
                bounds.min_lat,
                bounds.min_lon,
                bounds.max_lat,
                bounds.max_lon,
                bounds.center()
            ));
        }
    }

    fn clear(&self) {
        self.line("[map] cleared");
    }
}

impl<W: Write + Send> StatusDisplay for Terminal<W> {
    fn set_status(&self, text: &str) {
        self.line(&format!("[status] {}", text));
    }

    fn set_countdown_text(&self, text: &str) {
        if !text.is_empty() {
            self.line(&format!("[countdown] {}", text));
        }
    }
}

/// One-line description of a route for the final report.
pub fn describe(route: &RouteResult) -> String {
    format!("{} ({} points)", route_summary(route), route.polyline.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::GeoPoint;

    fn output(terminal: Terminal<Vec<u8>>) -> String {
        String::from_utf8(terminal.into_inner()).unwrap()
    }

    #[test]
    fn draws_endpoints_and_bounds() {
        let terminal = Terminal::new(Vec::new());
        terminal.draw(&RouteResult {
            polyline: vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(0.5, 3.0)],
            distance_m: 1000.0,
            duration_s: 60.0,
        });

        assert_eq!(
            output(terminal),
            "[map] route with 2 points from (1.00000, 2.00000) to (0.50000, 3.00000)\n\
             [map] fit bounds (0.50000, 2.00000) .. (1.00000, 3.00000), centre (0.75000, 2.50000)\n"
        );
    }

    #[test]
    fn empty_countdown_text_is_not_printed() {
        let terminal = Terminal::new(Vec::new());
        terminal.set_countdown_text("0m 3s");
        terminal.set_countdown_text("");
        terminal.set_status("Fetching route...");

        assert_eq!(
            output(terminal),
            "[countdown] 0m 3s\n[status] Fetching route...\n"
        );
    }

    #[test]
    fn describe_includes_summary() {
        let route = RouteResult {
            polyline: vec![GeoPoint::new(0.0, 0.0); 3],
            distance_m: 1520.0,
            duration_s: 150.0,
        };
        assert_eq!(
            describe(&route),
            "Route shown. Distance: 1.52 km, ETA: 3 min (3 points)"
        );
    }
}
