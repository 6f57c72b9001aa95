//! Headless host for the Intercept simulation core.
//!
//! Loads a game configuration and the player's preferences, plays a game with
//! a scripted autopilot at a fixed frame rate, and reports every notification
//! as a structured log line. A JSON summary is printed on exit.

mod autopilot;
mod sink;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use intercept_core::{GameConfig, Preferences, Simulation};
use serde::Serialize;
use tracing::{info, Level};

use crate::autopilot::Autopilot;
use crate::sink::LogSink;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "intercept-headless", about = "Run an Intercept game without a window")]
struct Args {
    /// Game configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player preferences (JSON).
    #[arg(long, default_value = "preferences.json")]
    preferences: PathBuf,

    /// Overrides the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Longest game to play, in simulated-frame seconds.
    #[arg(long, default_value_t = 600.0)]
    seconds: f32,

    /// Frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Frames between autopilot decisions.
    #[arg(long, default_value_t = 12)]
    reaction_frames: u64,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

/// Printed on exit.
#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    wave: u32,
    score: u64,
    game_over: bool,
    structures_left: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("failed to load game configuration from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let preferences = Preferences::load_or_default(&args.preferences);
    info!(use_vibration = preferences.use_vibration, "preferences loaded");

    let seed = config.seed;
    let mut sim = Simulation::new(config).context("invalid game configuration")?;
    let mut autopilot = Autopilot::new(args.reaction_frames);
    let mut sink = LogSink::new(preferences);

    let dt = 1.0 / args.fps.max(1) as f32;
    let max_ticks = (args.seconds.max(0.0) * args.fps as f32) as u64;

    for _ in 0..max_ticks {
        autopilot.act(&mut sim);
        sim.advance(dt);
        sim.drain_into(&mut sink);

        if sim.is_game_over() && sim.clock().scale() <= 0.0 {
            break;
        }
    }

    let summary = Summary {
        seed,
        ticks: sim.tick(),
        wave: sim.wave(),
        score: sim.score(),
        game_over: sim.is_game_over(),
        structures_left: sim.structures().remaining(sim.arena()),
    };
    info!(
        vibration_pulses = sink.vibration_pulses(),
        "session finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
    );
    Ok(())
}
