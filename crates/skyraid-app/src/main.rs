use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skyraid_app::game_loop::{LoopOptions, Pacing};
use skyraid_app::state::AppState;
use skyraid_campaign::{Campaign, LevelRegistry};
use skyraid_core::config::LevelId;
use skyraid_sim::clock::{Clock, ManualClock, MonotonicClock};
use skyraid_sim::SimConfig;

/// Headless SKYRAID runner.
#[derive(Debug, Parser)]
#[command(name = "skyraid", version, about)]
struct Args {
    /// RNG seed; the same seed replays the same run.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Level to start at (defaults to the first level of the table).
    #[arg(long)]
    level: Option<String>,

    /// JSON level table to load instead of the standard campaign.
    #[arg(long)]
    campaign: Option<PathBuf>,

    /// Stop after this many ticks (12000 is ten minutes of game time).
    #[arg(long, default_value_t = 12_000)]
    ticks: u64,

    /// Pace ticks at 50 ms of wall-clock time.
    #[arg(long)]
    realtime: bool,

    /// Let the autopilot fly the user plane.
    #[arg(long)]
    autopilot: bool,

    /// Print the final snapshot as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let registry = match &args.campaign {
        Some(path) => LevelRegistry::load(path)
            .with_context(|| format!("loading level table {}", path.display()))?,
        None => LevelRegistry::standard(),
    };

    let (clock, pacing): (Arc<dyn Clock>, Pacing) = if args.realtime {
        (Arc::new(MonotonicClock::new()), Pacing::Realtime)
    } else {
        let manual = ManualClock::new();
        (Arc::new(manual.clone()), Pacing::Simulated(manual))
    };

    let sim = SimConfig { seed: args.seed };
    let campaign = match args.level {
        Some(id) => Campaign::new(registry, LevelId::new(id), sim, clock)?,
        None => Campaign::from_first(registry, sim, clock)?,
    };
    tracing::info!(level = %campaign.current(), seed = args.seed, "starting run");

    let state = AppState::new();
    let handle = state.start(
        campaign,
        LoopOptions {
            pacing,
            max_ticks: Some(args.ticks),
            autopilot: args.autopilot,
        },
    )?;

    let summary = handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))??;

    println!(
        "{:?} after {} ticks on {} ({} level(s) cleared)",
        summary.outcome, summary.ticks, summary.level, summary.levels_cleared
    );

    if args.json {
        if let Some(snapshot) = state.snapshot()? {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
