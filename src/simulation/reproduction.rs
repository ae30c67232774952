//! Rival reproduction
//!
//! Rivals split in two once large enough, on their own timer. Unlike
//! overflow division there is no max-size trigger and no overflow hand-off.

use crate::core::config::RivalConfig;
use crate::core::types::{EntityId, Faction, Vec2};
use crate::ecs::world::World;
use crate::simulation::infection::reproduction_ready;
use crate::simulation::tick::SimulationEvent;

pub fn rival_reproduction(
    world: &mut World,
    rules: &RivalConfig,
    now: f32,
    events: &mut Vec<SimulationEvent>,
) {
    let ready: Vec<EntityId> = world
        .cells()
        .filter(|(_, c)| {
            c.faction == Faction::Rival
                && c.size >= rules.reproduction_size
                && reproduction_ready(c.last_reproduction_time, now, rules.reproduction_cooldown)
        })
        .map(|(id, _)| id)
        .collect();

    for parent_id in ready {
        let Some(parent) = world.cell_mut(parent_id) else {
            continue;
        };
        let half = parent.size / 2.0;
        parent.set_size(half);
        parent.last_reproduction_time = Some(now);

        let mut child = parent.clone();
        child.position = parent.position + Vec2::new(rules.clone_offset, 0.0);
        child.velocity = Vec2::ZERO;
        child.move_target = None;
        let child_id = world.spawn_cell(child);

        tracing::debug!(parent = ?parent_id, child = ?child_id, size = half, "Rival reproduced");
        events.push(SimulationEvent::Reproduced {
            parent: parent_id,
            child: child_id,
            faction: Faction::Rival,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::cell::CellTemplate;

    #[test]
    fn test_rival_halves_and_clone_timer_starts_now() {
        let mut world = World::default();
        let rival = world.spawn_from_template(&CellTemplate::rival(), Vec2::ZERO);
        world.cell_mut(rival).unwrap().set_size(3.0);
        let mut events = Vec::new();

        rival_reproduction(&mut world, &RivalConfig::default(), 20.0, &mut events);

        let SimulationEvent::Reproduced { child, .. } = events[0] else {
            panic!("expected reproduction");
        };
        assert_eq!(world.cell(rival).unwrap().size, 1.5);
        let clone = world.cell(child).unwrap();
        assert_eq!(clone.size, 1.5);
        assert_eq!(clone.position, Vec2::new(1.5, 0.0));
        assert_eq!(clone.last_reproduction_time, Some(20.0));
    }

    #[test]
    fn test_small_rival_does_not_reproduce() {
        let mut world = World::default();
        let rival = world.spawn_from_template(&CellTemplate::rival(), Vec2::ZERO);
        world.cell_mut(rival).unwrap().set_size(2.4);
        let mut events = Vec::new();

        rival_reproduction(&mut world, &RivalConfig::default(), 20.0, &mut events);
        assert!(events.is_empty());
        assert_eq!(world.cell_count(), 1);
    }

    #[test]
    fn test_player_cells_never_reproduce_this_way() {
        let mut world = World::default();
        let cell = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        world.cell_mut(cell).unwrap().set_size(10.0);
        let mut events = Vec::new();

        rival_reproduction(&mut world, &RivalConfig::default(), 20.0, &mut events);
        assert!(events.is_empty());
    }
}
