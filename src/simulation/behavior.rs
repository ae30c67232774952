//! Autonomous decisions
//!
//! Cells not under player control pick a destination each time they have
//! none or have reached the last one. Decisions only write `move_target`;
//! the motion step turns targets into velocity.

use crate::core::config::SimulationConfig;
use crate::core::types::{ControlMode, EntityId, Faction, Vec2};
use crate::ecs::world::World;
use crate::entity::cell::Cell;
use crate::simulation::eating;
use crate::spatial::sample_in_disk;
use rand::Rng;

/// What an autonomous cell decided this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Keep the current target
    Continue,
    Seek(Vec2),
    Flee(Vec2),
    Wander(Vec2),
}

fn needs_new_target(cell: &Cell, arrival_distance: f32) -> bool {
    match cell.move_target {
        None => true,
        Some(target) => cell.position.distance(&target) < arrival_distance,
    }
}

/// Run decisions for every autonomous cell, in registry order
///
/// The spatial index must be current.
pub fn run_decisions<R: Rng + ?Sized>(world: &mut World, config: &SimulationConfig, rng: &mut R) {
    let ids: Vec<EntityId> = world
        .cells()
        .filter(|(_, c)| c.control_mode == ControlMode::Autonomous)
        .map(|(id, _)| id)
        .collect();

    for id in ids {
        let decision = decide(world, id, config, rng);
        let target = match decision {
            Decision::Continue => continue,
            Decision::Seek(t) | Decision::Flee(t) | Decision::Wander(t) => t,
        };
        if let Some(cell) = world.cell_mut(id) {
            cell.move_target = Some(target);
        }
    }
}

/// Decide for a single autonomous cell
pub fn decide<R: Rng + ?Sized>(
    world: &World,
    id: EntityId,
    config: &SimulationConfig,
    rng: &mut R,
) -> Decision {
    let Some(cell) = world.cell(id) else {
        return Decision::Continue;
    };

    match cell.faction {
        Faction::Viral => decide_viral(world, cell, config, rng),
        Faction::Rival => {
            if let Some(away) = flee_point(world, id, cell, config) {
                return Decision::Flee(away);
            }
            decide_forager(world, cell, config.rival.aggression_radius, config, rng)
        }
        Faction::Player => {
            decide_forager(world, cell, config.behavior.nutrient_seek_radius, config, rng)
        }
    }
}

fn decide_forager<R: Rng + ?Sized>(
    world: &World,
    cell: &Cell,
    seek_radius: f32,
    config: &SimulationConfig,
    rng: &mut R,
) -> Decision {
    if !needs_new_target(cell, config.behavior.arrival_distance) {
        return Decision::Continue;
    }
    match world.nearest_nutrient(cell.position, seek_radius) {
        Some((_, pos)) => Decision::Seek(pos),
        None => Decision::Wander(cell.position + sample_in_disk(rng, config.behavior.wander_radius)),
    }
}

fn decide_viral<R: Rng + ?Sized>(
    world: &World,
    cell: &Cell,
    config: &SimulationConfig,
    rng: &mut R,
) -> Decision {
    if !needs_new_target(cell, config.behavior.arrival_distance) {
        return Decision::Continue;
    }
    let victim = world.nearest_cell(cell.position, config.infection.seek_radius, |_, c| !c.is_viral());
    match victim.and_then(|v| world.cell(v)) {
        Some(v) => Decision::Seek(v.position),
        None => Decision::Wander(cell.position + sample_in_disk(rng, config.infection.wander_radius)),
    }
}

/// A point directly away from the closest cell able to eat this rival
fn flee_point(world: &World, id: EntityId, cell: &Cell, config: &SimulationConfig) -> Option<Vec2> {
    let threat = world.nearest_cell(cell.position, config.rival.flee_radius, |other_id, other| {
        other_id != id
            && eating::faction_allows_eating(other.faction, cell.faction)
            && eating::size_allows_eating(other.size, cell.size, config.eating.size_ratio)
    })?;
    let threat_pos = world.cell(threat)?.position;

    let away = (cell.position - threat_pos).normalize();
    let away = if away == Vec2::ZERO { Vec2::new(1.0, 0.0) } else { away };
    Some(cell.position + away * config.rival.flee_radius)
}
