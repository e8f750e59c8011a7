//! Routing providers for the reveal sequence.
//!
//! Both clients implement [`reveal_core::RouteFetcher`], so the coordinator
//! does not care which service answers.

mod http;
pub mod google;
pub mod osrm;
pub mod polyline;

pub use google::{GoogleDirectionsClient, DEFAULT_GOOGLE_MAPS_URL};
pub use osrm::{OsrmClient, DEFAULT_OSRM_URL};
