//! Render-facing snapshots of simulation state
//!
//! This module is READ-ONLY - it never modifies simulation state.

pub mod camera;
pub mod colors;

use crate::core::types::{ControlMode, EntityId, Faction, Vec2};
use crate::ecs::world::World;
use crate::simulation::growth;
use colors::Color;
use serde::Serialize;

/// Lightweight snapshot of a cell for rendering
#[derive(Debug, Clone, Serialize)]
pub struct RenderEntity {
    pub id: EntityId,
    pub position: Vec2,
    /// Sprite scale; equal to the cell's size
    pub scale: f32,
    /// Trigger collider radius in sprite-local units; covers the eat
    /// radius once `scale` is applied
    pub collider_radius: f32,
    pub faction: Faction,
    pub control_mode: ControlMode,
    pub selected: bool,
    #[serde(skip)]
    pub color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderNutrient {
    pub position: Vec2,
}

/// Collects all renderable cells from the world into a reusable buffer.
/// Call this once per frame, passing the same buffer to avoid allocations.
pub fn collect_render_entities(
    world: &World,
    eat_radius_multiplier: f32,
    buffer: &mut Vec<RenderEntity>,
) {
    buffer.clear();
    buffer.extend(world.cells().map(|(id, cell)| RenderEntity {
        id,
        position: cell.position,
        scale: cell.size,
        collider_radius: growth::collider_local_radius(
            cell.eat_radius(eat_radius_multiplier),
            cell.size,
        ),
        faction: cell.faction,
        control_mode: cell.control_mode,
        selected: cell.selected,
        color: colors::control_tint(
            colors::faction_color(cell.faction),
            cell.is_player_controlled(),
        ),
    }));
}

pub fn collect_render_nutrients(world: &World, buffer: &mut Vec<RenderNutrient>) {
    buffer.clear();
    buffer.extend(world.nutrients().map(|(_, n)| RenderNutrient {
        position: n.position,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::cell::CellTemplate;

    #[test]
    fn test_snapshot_reflects_cells() {
        let mut world = World::default();
        let id = world.spawn_from_template(&CellTemplate::rival(), Vec2::new(1.0, 2.0));
        world.cell_mut(id).unwrap().set_size(3.0);

        let mut buffer = vec![];
        collect_render_entities(&world, 1.1, &mut buffer);
        collect_render_entities(&world, 1.1, &mut buffer);

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer[0].scale, 3.0);
        assert_eq!(buffer[0].faction, Faction::Rival);
        assert!(!buffer[0].selected);
        // Rivals are autonomous, so drawn dimmed
        assert_eq!(buffer[0].color, colors::faction_color(Faction::Rival).darken(0.8));
    }

    #[test]
    fn test_collider_covers_eat_radius_after_scaling() {
        let mut world = World::default();
        let small = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        let large = world.spawn_from_template(&CellTemplate::player(), Vec2::new(5.0, 0.0));
        world.cell_mut(large).unwrap().set_size(4.0);

        let mut buffer = vec![];
        collect_render_entities(&world, 1.1, &mut buffer);

        for entity in &buffer {
            let reach = world.cell(entity.id).unwrap().eat_radius(1.1);
            assert!((entity.collider_radius * entity.scale - reach).abs() < 1e-5);
        }
        // Local radius stays constant while the sprite grows
        let local = |id: EntityId| buffer.iter().find(|e| e.id == id).unwrap().collider_radius;
        assert!((local(small) - local(large)).abs() < 1e-5);
    }
}
