//! Shared HTTP plumbing for routing providers.

use reqwest::{Client, Response, StatusCode};
use reveal_core::RouteError;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Connect timeout applied to every provider client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn build_client(user_agent: &str) -> Result<Client, RouteError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(user_agent)
        .build()
        .map_err(|e| RouteError::Transport(format!("failed to create HTTP client: {}", e)))
}

pub(crate) fn map_transport_error(err: reqwest::Error, timeout: Duration) -> RouteError {
    if err.is_timeout() {
        RouteError::Timeout(timeout)
    } else if err.is_decode() {
        RouteError::Decode(err.to_string())
    } else {
        RouteError::Transport(err.to_string())
    }
}

/// Send a GET with a per-request timeout and decode the JSON body.
///
/// Non-success statuses become `RouteError::Provider` carrying the status code,
/// unless `accept` says the provider still returns a usable body for them.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    timeout: Duration,
    accept: impl Fn(StatusCode) -> bool,
) -> Result<T, RouteError> {
    let response: Response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| map_transport_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() && !accept(status) {
        return Err(RouteError::provider(status.as_u16().to_string()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| map_transport_error(e, timeout))
}
