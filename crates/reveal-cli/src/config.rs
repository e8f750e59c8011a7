//! CLI configuration from environment.

use reveal_core::{RevealConfig, TravelMode};
use reveal_providers::{DEFAULT_GOOGLE_MAPS_URL, DEFAULT_OSRM_URL};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which routing backend answers route requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Osrm,
    Google,
    Simulated,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osrm" => Ok(ProviderKind::Osrm),
            "google" => Ok(ProviderKind::Google),
            "simulated" | "sim" => Ok(ProviderKind::Simulated),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Osrm => write!(f, "osrm"),
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::Simulated => write!(f, "simulated"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub provider: ProviderKind,
    pub osrm_url: String,
    pub google_maps_url: String,
    pub google_api_key: Option<String>,
    pub fetch_timeout_secs: u64,
    pub bounded_wait_secs: u64,
    /// Timeout of the fetch issued at expiry; `None` reuses `fetch_timeout_secs`
    pub fallback_timeout_secs: Option<u64>,
    pub travel_mode: TravelMode,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RevealConfig::default();
        Self {
            provider: lookup("REVEAL_PROVIDER")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            osrm_url: lookup("OSRM_URL").unwrap_or_else(|| DEFAULT_OSRM_URL.to_string()),
            google_maps_url: lookup("GOOGLE_MAPS_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_MAPS_URL.to_string()),
            google_api_key: lookup("GOOGLE_MAPS_API_KEY").filter(|key| !key.trim().is_empty()),
            fetch_timeout_secs: lookup("REVEAL_FETCH_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.fetch_timeout.as_secs()),
            bounded_wait_secs: lookup("REVEAL_BOUNDED_WAIT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.bounded_wait.as_secs()),
            fallback_timeout_secs: lookup("REVEAL_FALLBACK_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok()),
            travel_mode: lookup("REVEAL_TRAVEL_MODE")
                .map(|s| TravelMode::parse_lenient(&s))
                .unwrap_or_default(),
        }
    }

    /// Timing policy handed to the coordinator.
    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            bounded_wait: Duration::from_secs(self.bounded_wait_secs),
            fallback_timeout: self.fallback_timeout_secs.map(Duration::from_secs),
            travel_mode: self.travel_mode,
            ..RevealConfig::default()
        }
    }
}
