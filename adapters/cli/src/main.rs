#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plans a wrapping run for a mine description.

mod config;
mod description;

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use mine_wrap_system_simulation::{Simulation, TurnRecord};
use mine_wrap_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::RunConfig, description::parse_description};

/// Plans a wrapping run for a mine and prints the action string.
#[derive(Debug, Parser)]
#[command(name = "mine-wrap", version, about, long_about = None)]
struct Args {
    /// Path to the `.desc` mine description.
    description: PathBuf,

    /// TOML file with run settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of turns, overriding the config file.
    #[arg(long)]
    max_turns: Option<u64>,

    /// Direction (W, S, A or D) tried first before any move was made.
    #[arg(long)]
    initial_direction: Option<char>,

    /// Keep idling until the turn limit instead of stopping once done.
    #[arg(long)]
    no_early_stop: bool,

    /// Write the solution to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write one JSON object per turn to this file.
    #[arg(long)]
    trace: Option<PathBuf>,
}

/// Entry point for the mine wrapping command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_tracing(&config.log_filter)?;

    let text = fs::read_to_string(&args.description).with_context(|| {
        format!(
            "failed to read mine description {}",
            args.description.display()
        )
    })?;
    let description = parse_description(&text).with_context(|| {
        format!(
            "failed to parse mine description {}",
            args.description.display()
        )
    })?;

    let world = World::new(
        description.mine,
        description.obstacles,
        description.start,
        config.direction()?,
    );
    info!(
        situable_cells = mine_wrap_world::query::situable_cell_count(&world),
        start = %description.start,
        "mine loaded"
    );

    let mut records = Vec::new();
    let mut simulation = Simulation::new(world);
    let outcome = simulation
        .run(config.limits(), |record, _| {
            if args.trace.is_some() {
                records.push(record.clone());
            }
        })
        .context("simulation aborted")?;

    if let Some(path) = &args.trace {
        write_trace(path, &records)?;
    }

    let solution = outcome.solution();
    match &args.output {
        Some(path) => fs::write(path, format!("{solution}\n"))
            .with_context(|| format!("failed to write solution to {}", path.display()))?,
        None => println!("{solution}"),
    }

    info!(
        turns = outcome.turns(),
        wrapped = outcome.wrapped_cells,
        situable = outcome.situable_cells,
        stop_reason = ?outcome.stop_reason,
        "solution ready"
    );
    Ok(())
}

/// Loads the config file, if any, and applies command-line overrides.
fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if let Some(code) = args.initial_direction {
        config.initial_direction = code;
    }
    if args.no_early_stop {
        config.stop_early = false;
    }

    let _ = config.direction()?;
    Ok(config)
}

fn init_tracing(fallback: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback)
            .with_context(|| format!("invalid log filter `{fallback}`"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn write_trace(path: &Path, records: &[TurnRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create trace file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record).context("failed to encode turn record")?;
        writeln!(writer).context("failed to write trace file")?;
    }
    writer.flush().context("failed to flush trace file")
}
