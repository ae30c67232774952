//! Headless Colony Runner
//!
//! Runs the simulation without a display and prints population and event
//! totals, for balancing spawner and infection settings.

use clap::Parser;
use petri_colony::command::{InputEvent, InputFrame, ScreenProjection};
use petri_colony::core::config::SimulationConfig;
use petri_colony::core::error::Result;
use petri_colony::core::types::Vec2;
use petri_colony::render::camera::{Camera, CameraFraming};
use petri_colony::simulation::{PopulationCounts, Simulation, SimulationEvent};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Headless Colony Runner - batch runs for tuning
#[derive(Parser, Debug)]
#[command(name = "headless_sim")]
#[command(about = "Run the colony simulation headless and report population totals")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Select every player cell on the first tick
    #[arg(long)]
    select_all: bool,

    /// Send the selection to this world point on the first tick
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    move_to: Option<Vec<f32>>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print population counts every 60 ticks
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    elapsed_seconds: f32,
    final_counts: PopulationCounts,
    peak_player: usize,
    events: BTreeMap<&'static str, u64>,
}

fn event_name(event: &SimulationEvent) -> &'static str {
    match event {
        SimulationEvent::NutrientEaten { .. } => "nutrient_eaten",
        SimulationEvent::CellEaten { .. } => "cell_eaten",
        SimulationEvent::CellDivided { .. } => "cell_divided",
        SimulationEvent::CellInfected { .. } => "cell_infected",
        SimulationEvent::CellConverted { .. } => "cell_converted",
        SimulationEvent::Reproduced { .. } => "reproduced",
        SimulationEvent::PlayerCellLost { .. } => "player_cell_lost",
        SimulationEvent::Spawned { .. } => "spawned",
        SimulationEvent::PlayerWiped { .. } => "player_wiped",
        SimulationEvent::PlayerRespawned { .. } => "player_respawned",
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("petri_colony=info")
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;
    let framing = CameraFraming::new(config.camera.clone());
    let mut sim = Simulation::new(config)?;
    let mut camera = Camera::new(800.0, 600.0);

    let mut opening = InputFrame::new();
    if args.select_all {
        opening.push(InputEvent::SelectAll);
    }
    if let Some([x, y]) = args.move_to.as_deref() {
        opening.push(InputEvent::CommandDown {
            at: camera.world_to_screen(Vec2::new(*x, *y)),
        });
        opening.push(InputEvent::CommandUp);
    }

    let mut events: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut peak_player = 0;
    let idle = InputFrame::new();

    for tick in 0..args.ticks {
        let frame = if tick == 0 { &opening } else { &idle };
        for event in sim.step(frame, &camera) {
            *events.entry(event_name(&event)).or_default() += 1;
        }
        framing.follow(&mut camera, sim.group_signals().as_ref());

        let counts = sim.counts();
        peak_player = peak_player.max(counts.player);
        if args.verbose && tick % 60 == 0 {
            eprintln!(
                "Tick {:>5}: player={} rival={} viral={} nutrients={}",
                counts.tick, counts.player, counts.rival, counts.viral, counts.nutrients
            );
        }
    }

    let summary = RunSummary {
        seed,
        ticks: args.ticks,
        elapsed_seconds: sim.world.elapsed,
        final_counts: sim.counts(),
        peak_player,
        events,
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "text" => {
            println!("Colony Run");
            println!("==========");
            println!("Ticks: {} ({:.1}s)", summary.ticks, summary.elapsed_seconds);
            println!(
                "Final: player={} rival={} viral={} nutrients={}",
                summary.final_counts.player,
                summary.final_counts.rival,
                summary.final_counts.viral,
                summary.final_counts.nutrients
            );
            println!("Peak player cells: {}", summary.peak_player);
            println!();
            for (name, count) in &summary.events {
                println!("  {:<18} {}", name, count);
            }
            println!();
            println!("Seed: {}", summary.seed);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
