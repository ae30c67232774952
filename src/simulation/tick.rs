//! Tick system - orchestrates simulation updates
//!
//! One tick runs these phases in order:
//! input -> decisions -> motion -> contact detection -> resolution
//! -> division/reproduction -> spawners -> derived signals
//!
//! Detection never mutates the registry; destruction requested during
//! resolution is applied once resolution is over.

use crate::command::{InputFrame, ScreenProjection};
use crate::core::types::{EntityId, Faction, Tick, Vec2};
use crate::simulation::population::SpawnerKind;
use crate::simulation::session::Simulation;
use crate::simulation::{behavior, eating, infection, movement, reproduction};
use serde::Serialize;

/// Events generated during a simulation tick
///
/// Returned by `run_simulation_tick` for logging and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    NutrientEaten {
        predator: EntityId,
        nutrition: f32,
        new_size: f32,
    },
    CellEaten {
        predator: EntityId,
        prey: EntityId,
        prey_faction: Faction,
        /// Size the predator gained before clamping
        gained: f32,
    },
    CellDivided {
        parent: EntityId,
        child: EntityId,
        overflow: f32,
        overflow_recipient: Option<EntityId>,
    },
    CellInfected {
        agent: EntityId,
        victim: EntityId,
        remaining_size: f32,
    },
    CellConverted {
        victim: EntityId,
        former_faction: Faction,
    },
    Reproduced {
        parent: EntityId,
        child: EntityId,
        faction: Faction,
    },
    /// A player-faction cell left the registry
    PlayerCellLost { cell: EntityId },
    Spawned { kind: SpawnerKind, position: Vec2 },
    /// No player cells remain; a respawn is due at `respawn_at`
    PlayerWiped { respawn_at: f32 },
    PlayerRespawned { cell: EntityId },
}

/// Run a single simulation tick
///
/// 1. Apply queued input (selection, move intents, axis, divide)
/// 2. Autonomous decisions (re-indexes positions first)
/// 3. Motion integration
/// 4. Contact detection on fresh positions: meals and infections
/// 5. Resolve meals, then infections, revalidating every handle
/// 6. Apply queued destruction
/// 7. Overflow division, viral and rival reproduction
/// 8. Spawner ticks
/// 9. Selection purge and the player-wipe monitor
/// 10. Advance the clock
///
/// Returns the events that occurred during this tick.
pub fn run_simulation_tick(
    sim: &mut Simulation,
    frame: &InputFrame,
    projection: &dyn ScreenProjection,
) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let Simulation {
        config,
        world,
        dispatcher,
        population,
        respawn,
        contacts: contact_memory,
        rng,
    } = sim;
    let now = world.elapsed;
    let dt = config.tick_seconds;

    dispatcher.apply_frame(world, projection, frame, rng);
    let divide_command = dispatcher.take_divide();

    world.rebuild_spatial_index();
    behavior::run_decisions(world, config, rng);

    let motion = dispatcher.prepare_motion(world);
    movement::integrate(world, &motion, config, dt);

    world.rebuild_spatial_index();
    let meals = eating::detect_meals(world, &config.eating, config.parallel_threshold);
    let contacts = infection::detect_infections(world, &config.infection, now, contact_memory);

    eating::resolve_meals(world, &meals, &config.eating, &mut events);
    let converted = infection::resolve_infections(world, &contacts, &config.infection, now, &mut events);

    let applied = world.apply_pending();
    for (id, cell) in &applied.destroyed_cells {
        if cell.faction == Faction::Player {
            events.push(SimulationEvent::PlayerCellLost { cell: *id });
        }
    }

    eating::resolve_divisions(world, divide_command, &config.eating, &mut events);
    infection::viral_reproduction(world, &config.infection, now, &mut events);
    reproduction::rival_reproduction(world, &config.rival, now, &mut events);

    for request in population.tick(now, world, &config.templates, rng) {
        events.push(SimulationEvent::Spawned {
            kind: request.kind,
            position: request.position,
        });
    }

    let purged = dispatcher.purge(world);
    if purged > 0 || !converted.is_empty() {
        tracing::debug!(purged, converted = converted.len(), "Selection purged");
    }
    respawn.update(now, world, &config.respawn, &config.templates, rng, &mut events);

    world.tick(dt);
    events
}

/// Summary counts for status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulationCounts {
    pub tick: Tick,
    pub player: usize,
    pub rival: usize,
    pub viral: usize,
    pub nutrients: usize,
}

impl PopulationCounts {
    pub fn of(sim: &Simulation) -> Self {
        Self {
            tick: sim.world.current_tick,
            player: sim.world.count_faction(Faction::Player),
            rival: sim.world.count_faction(Faction::Rival),
            viral: sim.world.count_faction(Faction::Viral),
            nutrients: sim.world.nutrient_count(),
        }
    }
}
