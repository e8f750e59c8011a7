//! Reveal CLI - Command line tools for the delayed route reveal.
//!
//! This crate provides the binaries:
//! - show_route: reveal a real route from OSRM or Google after a countdown
//! - demo_scenario: run the reveal sequence against the simulated provider

pub mod config;
pub mod provider;
pub mod scenarios;
pub mod terminal;

pub use config::{CliConfig, ProviderKind};
pub use provider::build_fetcher;
pub use terminal::Terminal;
