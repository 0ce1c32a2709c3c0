#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Bastion skirmish.

mod scenario;
mod skirmish;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::{
    scenario::Scenario,
    skirmish::{log_report, Skirmish},
};

const DEFAULT_SEED: u64 = 0x5eed_b457_1011;

/// Command-line arguments for the skirmish runner.
#[derive(Debug, Parser)]
#[command(name = "bastion", about = "Runs a headless tower-defense skirmish")]
struct CliArgs {
    /// Scenario file with combat tuning, modifiers, creeps and towers.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Seed for crit rolls and creep spawns.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Overrides the number of creeps the scenario spawns.
    #[arg(long)]
    creeps: Option<u32>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Entry point for the Bastion command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let mut scenario = match &args.config {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(count) = args.creeps {
        scenario.creeps.count = count;
    }

    info!(ticks = args.ticks, seed = args.seed, "starting skirmish");
    let skirmish = Skirmish::new(&scenario, args.seed);
    for (tower, breakdown) in skirmish.dps_breakdowns() {
        info!(
            tower,
            modified_damage = breakdown.modified_damage,
            dps = breakdown.dps,
            crit_chance = breakdown.crit_chance,
            crit_adjusted_dps = breakdown.crit_adjusted_dps,
            "tower damage estimate"
        );
    }

    let report = skirmish.run(args.ticks);
    log_report(&report);
    Ok(())
}
