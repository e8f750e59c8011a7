//! OSRM route service client.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, StatusCode};
use reveal_core::{GeoPoint, RouteError, RouteFetcher, RouteRequest, RouteResult, TravelMode};
use serde::Deserialize;
use std::time::Duration;

use crate::http::{build_client, get_json};

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: `[lon, lat]`
    coordinates: Vec<[f64; 2]>,
}

/// HTTP client for an OSRM `route` service.
pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    /// Create a new OSRM client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the OSRM server (e.g., "https://router.project-osrm.org")
    pub fn new(base_url: impl Into<String>) -> Result<Self, RouteError> {
        Ok(Self {
            client: build_client(concat!("reveal-providers/", env!("CARGO_PKG_VERSION")))?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn route_url(&self, request: &RouteRequest) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            profile(request.travel_mode),
            request.origin.lon,
            request.origin.lat,
            request.destination.lon,
            request.destination.lat,
        )
    }

    async fn route(
        &self,
        request: &RouteRequest,
        timeout: Duration,
    ) -> Result<RouteResult, RouteError> {
        let url = self.route_url(request);
        tracing::debug!(%url, "requesting OSRM route");

        let builder = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")]);
        // OSRM reports NoRoute and friends as 400 with a JSON body
        let response: OsrmResponse =
            get_json(builder, timeout, |status| status == StatusCode::BAD_REQUEST).await?;

        into_route(response)
    }
}

impl RouteFetcher for OsrmClient {
    fn name(&self) -> &str {
        "osrm"
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RouteRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<RouteResult, RouteError>> {
        self.route(request, timeout).boxed()
    }
}

/// OSRM profile for a travel mode. OSRM has no transit profile.
fn profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving | TravelMode::Transit => "driving",
        TravelMode::Walking => "foot",
        TravelMode::Bicycling => "bike",
    }
}

fn into_route(response: OsrmResponse) -> Result<RouteResult, RouteError> {
    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" => return Err(RouteError::NoRouteFound),
        other => {
            if let Some(message) = &response.message {
                tracing::debug!(code = other, %message, "OSRM rejected request");
            }
            return Err(RouteError::provider(other));
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RouteError::NoRouteFound)?;

    Ok(RouteResult {
        polyline: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| GeoPoint { lat, lon })
            .collect(),
        distance_m: route.distance,
        duration_s: route.duration,
    })
}
