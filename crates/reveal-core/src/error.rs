//! Error types for routing and route reveal.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Missing or invalid input; no fetch was attempted.
    #[error("{0}")]
    Validation(String),

    #[error("No route found")]
    NoRouteFound,

    /// The provider answered with a failure code (HTTP status or API status).
    #[error("Routing failed: {code}")]
    Provider { code: String },

    #[error("Routing timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Routing request failed: {0}")]
    Transport(String),

    #[error("Unexpected routing response: {0}")]
    Decode(String),
}

impl RouteError {
    pub fn provider(code: impl Into<String>) -> Self {
        RouteError::Provider { code: code.into() }
    }

    /// Any failure that came from the routing call rather than from user input.
    pub fn is_provider_failure(&self) -> bool {
        !matches!(self, RouteError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_reports_seconds() {
        let err = RouteError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Routing timed out after 1.5s");
    }

    #[test]
    fn validation_is_not_a_provider_failure() {
        assert!(!RouteError::Validation("x".into()).is_provider_failure());
        assert!(RouteError::provider("500").is_provider_failure());
        assert!(RouteError::NoRouteFound.is_provider_failure());
    }
}
