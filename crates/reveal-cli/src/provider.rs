//! Routing provider selection.

use anyhow::{Context, Result};
use reveal_core::{RouteFetcher, SimulatedRouteFetcher};
use reveal_providers::{GoogleDirectionsClient, OsrmClient};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{CliConfig, ProviderKind};

/// Latency of the simulated provider when picked from the command line.
const SIMULATED_LATENCY: Duration = Duration::from_millis(800);

/// Build the route fetcher named by the configuration.
pub fn build_fetcher(config: &CliConfig) -> Result<Arc<dyn RouteFetcher>> {
    let fetcher: Arc<dyn RouteFetcher> = match config.provider {
        ProviderKind::Osrm => Arc::new(
            OsrmClient::new(&config.osrm_url).context("failed to create OSRM client")?,
        ),
        ProviderKind::Google => {
            let key = config
                .google_api_key
                .as_deref()
                .context("GOOGLE_MAPS_API_KEY is required for the google provider")?;
            Arc::new(
                GoogleDirectionsClient::with_base_url(&config.google_maps_url, key)
                    .context("failed to create Google Directions client")?,
            )
        }
        ProviderKind::Simulated => Arc::new(SimulatedRouteFetcher::new(SIMULATED_LATENCY)),
    };
    tracing::debug!(provider = fetcher.name(), "route provider ready");
    Ok(fetcher)
}
