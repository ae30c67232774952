//! Petri Colony - Entry Point
//!
//! Interactive console for the colony simulation. Typed commands are turned
//! into the same pointer and key input a graphical front end would send,
//! queued, and applied on the next tick.

use petri_colony::command::{InputEvent, InputFrame, ScreenProjection};
use petri_colony::core::config::SimulationConfig;
use petri_colony::core::error::Result;
use petri_colony::core::types::{Faction, Vec2};
use petri_colony::render::camera::{Camera, CameraFraming};
use petri_colony::simulation::{Simulation, SimulationEvent};

use std::io::{self, Write};
use std::path::Path;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("petri_colony=debug")
        .init();

    tracing::info!("Petri Colony starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load_from_toml(Path::new(&path))?,
        None => SimulationConfig::default(),
    };
    let framing = CameraFraming::new(config.camera.clone());
    let mut sim = Simulation::new(config)?;
    let mut camera = Camera::new(800.0, 600.0);
    let mut pending = InputFrame::new();

    println!("\n=== PETRI COLONY ===");
    println!("Grow, divide and survive in the dish");
    println!();
    println!("Commands (coordinates are world units):");
    println!("  tick / t              - Advance simulation by one tick");
    println!("  run <n>               - Run n simulation ticks");
    println!("  status / s            - Show detailed status");
    println!("  click <x> <y> [add]   - Click a cell (add = keep current selection)");
    println!("  box <x1> <y1> <x2> <y2> - Drag-select a rectangle");
    println!("  move <x> <y>          - Send the selection to a point");
    println!("  all                   - Select every player cell");
    println!("  axis <x> <y>          - Hold directional input (axis 0 0 to release)");
    println!("  divide                - Split player-controlled cells at max size");
    println!("  quit / q              - Exit");
    println!();

    loop {
        display_status(&sim);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        let words: Vec<&str> = input.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit" | "q"] => break,
            ["tick" | "t"] => {
                let events = advance(&mut sim, &mut camera, &framing, &mut pending);
                print_events(&events);
                println!("Tick {} complete.", sim.world.current_tick);
            }
            ["run", n] => match n.parse::<u32>() {
                Ok(n) => {
                    println!("Running {} ticks...", n);
                    let mut total = 0;
                    for _ in 0..n {
                        total += advance(&mut sim, &mut camera, &framing, &mut pending).len();
                    }
                    println!(
                        "Completed {} ticks ({} events). Now at tick {}.",
                        n, total, sim.world.current_tick
                    );
                }
                Err(_) => println!("Usage: run <number>"),
            },
            ["status" | "s"] => display_detailed_status(&sim),
            ["click", x, y, rest @ ..] => match parse_point(x, y) {
                Some(p) => {
                    let additive = rest.first() == Some(&"add");
                    pending.push(InputEvent::PointerDown {
                        at: camera.world_to_screen(p),
                        additive,
                    });
                    pending.push(InputEvent::PointerUp {
                        at: camera.world_to_screen(p),
                    });
                    println!("Click queued.");
                }
                None => println!("Usage: click <x> <y> [add]"),
            },
            ["box", x1, y1, x2, y2] => match (parse_point(x1, y1), parse_point(x2, y2)) {
                (Some(a), Some(b)) => {
                    // Start outside any cell so the press begins a drag
                    pending.push(InputEvent::PointerDown {
                        at: camera.world_to_screen(a),
                        additive: false,
                    });
                    pending.push(InputEvent::PointerDrag {
                        at: camera.world_to_screen(b),
                    });
                    pending.push(InputEvent::PointerUp {
                        at: camera.world_to_screen(b),
                    });
                    println!("Box selection queued.");
                }
                _ => println!("Usage: box <x1> <y1> <x2> <y2>"),
            },
            ["move", x, y] => match parse_point(x, y) {
                Some(p) => {
                    pending.push(InputEvent::CommandDown {
                        at: camera.world_to_screen(p),
                    });
                    pending.push(InputEvent::CommandUp);
                    println!("Move queued.");
                }
                None => println!("Usage: move <x> <y>"),
            },
            ["all"] => {
                pending.push(InputEvent::SelectAll);
                println!("Select all queued.");
            }
            ["axis", x, y] => match parse_point(x, y) {
                Some(p) => {
                    pending.push(InputEvent::Axis {
                        x: p.x.clamp(-1.0, 1.0),
                        y: p.y.clamp(-1.0, 1.0),
                    });
                    println!("Axis set.");
                }
                None => println!("Usage: axis <x> <y>"),
            },
            ["divide"] => {
                pending.push(InputEvent::Divide);
                println!("Divide queued.");
            }
            _ => println!(
                "Unknown command. Available: tick, run <n>, status, click, box, move, all, axis, divide, quit"
            ),
        }
    }

    println!(
        "\nGoodbye! Final state: {} entities, {} ticks elapsed.",
        sim.world.entity_count(),
        sim.world.current_tick
    );
    Ok(())
}

/// Run one tick with the queued input, then let the camera follow
fn advance(
    sim: &mut Simulation,
    camera: &mut Camera,
    framing: &CameraFraming,
    pending: &mut InputFrame,
) -> Vec<SimulationEvent> {
    let frame = std::mem::take(pending);
    let events = sim.step(&frame, &*camera);
    framing.follow(camera, sim.group_signals().as_ref());
    events
}

fn parse_point(x: &str, y: &str) -> Option<Vec2> {
    Some(Vec2::new(x.parse().ok()?, y.parse().ok()?))
}

fn print_events(events: &[SimulationEvent]) {
    for event in events {
        match event {
            SimulationEvent::NutrientEaten { .. } | SimulationEvent::Spawned { .. } => {}
            other => println!("  {:?}", other),
        }
    }
}

/// Display a brief status summary
fn display_status(sim: &Simulation) {
    let counts = sim.counts();
    println!();
    println!(
        "--- Tick {} | Player: {} | Rival: {} | Viral: {} | Nutrients: {} ---",
        counts.tick, counts.player, counts.rival, counts.viral, counts.nutrients
    );
    if let Some(group) = sim.group_signals() {
        println!(
            "  Selected: {} at ({:.1}, {:.1}), spread {:.1}, avg size {:.1}",
            group.count, group.centroid.x, group.centroid.y, group.spread, group.average_size
        );
    }
    println!();
}

/// Display detailed status of all cells
fn display_detailed_status(sim: &Simulation) {
    println!();
    println!("=== Detailed Status (Tick {}) ===", sim.world.current_tick);
    println!();

    for faction in [Faction::Player, Faction::Rival, Faction::Viral] {
        let cells: Vec<_> = sim.world.cells().filter(|(_, c)| c.faction == faction).collect();
        println!("{:?} ({})", faction, cells.len());
        for (id, cell) in cells {
            println!(
                "  {:?} at ({:.1}, {:.1}) size {:.2} speed {:.2} {:?}{}{}",
                id,
                cell.position.x,
                cell.position.y,
                cell.size,
                cell.current_speed,
                cell.control_mode,
                if cell.selected { " [selected]" } else { "" },
                match cell.move_target {
                    Some(t) => format!(" -> ({:.1}, {:.1})", t.x, t.y),
                    None => String::new(),
                }
            );
        }
        println!();
    }
}
