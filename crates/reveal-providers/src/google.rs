//! Google Directions API client.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use reveal_core::{RouteError, RouteFetcher, RouteRequest, RouteResult};
use serde::Deserialize;
use std::time::Duration;

use crate::http::{build_client, get_json};
use crate::polyline;

pub const DEFAULT_GOOGLE_MAPS_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

/// HTTP client for the Google Directions web service.
pub struct GoogleDirectionsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, RouteError> {
        Self::with_base_url(DEFAULT_GOOGLE_MAPS_URL, api_key)
    }

    /// Point the client at another host (a proxy or a test server).
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, RouteError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RouteError::Validation(
                "Google Maps API key is empty".to_string(),
            ));
        }
        Ok(Self {
            client: build_client(concat!("reveal-providers/", env!("CARGO_PKG_VERSION")))?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn directions(
        &self,
        request: &RouteRequest,
        timeout: Duration,
    ) -> Result<RouteResult, RouteError> {
        let url = format!("{}/maps/api/directions/json", self.base_url);
        let origin = format!("{},{}", request.origin.lat, request.origin.lon);
        let destination = format!("{},{}", request.destination.lat, request.destination.lon);
        tracing::debug!(%origin, %destination, mode = %request.travel_mode, "requesting Google directions");

        let builder = self.client.get(&url).query(&[
            ("origin", origin.as_str()),
            ("destination", destination.as_str()),
            ("mode", request.travel_mode.as_str()),
            ("alternatives", "false"),
            ("key", self.api_key.as_str()),
        ]);
        let response: DirectionsResponse = get_json(builder, timeout, |_| false).await?;

        into_route(response)
    }
}

impl RouteFetcher for GoogleDirectionsClient {
    fn name(&self) -> &str {
        "google"
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RouteRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<RouteResult, RouteError>> {
        self.directions(request, timeout).boxed()
    }
}

fn into_route(response: DirectionsResponse) -> Result<RouteResult, RouteError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(RouteError::NoRouteFound),
        other => {
            if let Some(message) = &response.error_message {
                tracing::debug!(status = other, %message, "directions request rejected");
            }
            return Err(RouteError::provider(other));
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RouteError::NoRouteFound)?;

    let distance_m: f64 = route.legs.iter().map(|leg| leg.distance.value).sum();
    let duration_s: f64 = route.legs.iter().map(|leg| leg.duration.value).sum();

    Ok(RouteResult {
        polyline: polyline::decode(&route.overview_polyline.points)?,
        distance_m,
        duration_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::GeoPoint;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<RouteResult, RouteError> {
        into_route(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn sums_legs_and_decodes_overview() {
        let route = parse(json!({
            "status": "OK",
            "routes": [{
                "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" },
                "legs": [
                    { "distance": { "text": "1.0 km", "value": 1000 }, "duration": { "text": "2 mins", "value": 120 } },
                    { "distance": { "text": "0.5 km", "value": 500 }, "duration": { "text": "1 min", "value": 60 } }
                ]
            }]
        }))
        .unwrap();

        assert_eq!(route.distance_m, 1500.0);
        assert_eq!(route.duration_s, 180.0);
        assert_eq!(
            route.polyline,
            vec![GeoPoint::new(38.5, -120.2), GeoPoint::new(40.7, -120.95)]
        );
    }

    #[test]
    fn zero_results_is_no_route() {
        let err = parse(json!({ "status": "ZERO_RESULTS", "routes": [] })).unwrap_err();
        assert_eq!(err, RouteError::NoRouteFound);
    }

    #[test]
    fn denied_request_keeps_status_code() {
        let err = parse(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }))
        .unwrap_err();
        assert_eq!(err, RouteError::provider("REQUEST_DENIED"));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            GoogleDirectionsClient::new("  "),
            Err(RouteError::Validation(_))
        ));
    }
}
