//! Timing policy for the reveal sequence.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::TravelMode;

/// Configuration for a route reveal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Timeout every provider call enforces on itself
    pub fetch_timeout: Duration,
    /// How long to wait at expiry for a prefetch that is still running
    pub bounded_wait: Duration,
    /// Timeout for the fresh fetch issued at expiry (defaults to `fetch_timeout`)
    #[serde(default)]
    pub fallback_timeout: Option<Duration>,
    /// Countdown tick period
    pub tick_period: Duration,
    #[serde(default)]
    pub travel_mode: TravelMode,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            bounded_wait: Duration::from_secs(3),
            fallback_timeout: None,
            tick_period: Duration::from_secs(1),
            travel_mode: TravelMode::Driving,
        }
    }
}

impl RevealConfig {
    pub fn fallback_timeout(&self) -> Duration {
        self.fallback_timeout.unwrap_or(self.fetch_timeout)
    }
}

/// Convert a user-entered delay in minutes to countdown seconds.
pub fn delay_seconds_from_minutes(minutes: i64) -> u64 {
    (minutes.max(0) as u64).saturating_mul(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_timeout_defaults_to_fetch_timeout() {
        let mut config = RevealConfig::default();
        assert_eq!(config.fallback_timeout(), Duration::from_secs(15));

        config.fallback_timeout = Some(Duration::from_secs(5));
        assert_eq!(config.fallback_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn loads_from_json_without_optional_fields() {
        let config: RevealConfig = serde_json::from_value(serde_json::json!({
            "fetch_timeout": { "secs": 10, "nanos": 0 },
            "bounded_wait": { "secs": 2, "nanos": 0 },
            "tick_period": { "secs": 1, "nanos": 0 }
        }))
        .unwrap();
        assert_eq!(config.fallback_timeout(), Duration::from_secs(10));
        assert_eq!(config.travel_mode, TravelMode::Driving);
    }

    #[test]
    fn negative_delay_clamps_to_zero() {
        assert_eq!(delay_seconds_from_minutes(-3), 0);
        assert_eq!(delay_seconds_from_minutes(2), 120);
    }
}
