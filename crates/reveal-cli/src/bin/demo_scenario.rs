//! Demo Scenarios - the reveal sequence against a simulated provider.
//!
//! Runs each pre-defined scenario in turn:
//!
//! 1. zero-delay: no countdown, a single fetch
//! 2. prefetched: the route is ready long before the countdown ends
//! 3. slow-provider: the prefetch hangs and a fresh fetch takes over
//! 4. provider-down: every fetch fails and the final error is shown
//!
//! Usage:
//!   cargo run -p reveal-cli --bin demo_scenario -- --time-scale 0.1

use anyhow::{bail, Result};
use clap::Parser;
use reveal_cli::scenarios::{all_scenarios, run_scenario};
use reveal_cli::terminal::describe;
use reveal_cli::Terminal;
use reveal_core::RevealOutcome;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run the reveal scenarios against the simulated provider
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Multiplier for every timer and latency (1.0 = real seconds)
    #[arg(long, default_value_t = 0.1)]
    time_scale: f64,

    /// Run only the scenario with this name
    #[arg(long)]
    only: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("reveal_cli=info".parse()?))
        .init();

    let args = Args::parse();
    if !(args.time_scale > 0.0 && args.time_scale.is_finite()) {
        bail!("--time-scale must be a positive number");
    }

    let scenarios: Vec<_> = all_scenarios()
        .into_iter()
        .filter(|s| args.only.as_deref().map_or(true, |name| s.name == name))
        .collect();
    if scenarios.is_empty() {
        bail!("no scenario named '{}'", args.only.unwrap_or_default());
    }

    for scenario in &scenarios {
        println!();
        println!("=== {} ({}s countdown) ===", scenario.name, scenario.delay_seconds);

        let report = run_scenario(scenario, args.time_scale, Arc::new(Terminal::stdout())).await;
        let result = match &report.outcome {
            RevealOutcome::Shown { route, source } => format!("{:?}: {}", source, describe(route)),
            RevealOutcome::Failed(err) => format!("failed: {}", err),
            RevealOutcome::Cancelled => "cancelled".to_string(),
        };
        println!(
            "--> {} after {:.1}s, {} fetch(es), {} timer(s)",
            result,
            report.elapsed.as_secs_f64(),
            report.fetches,
            report.timers
        );
    }

    Ok(())
}
