//! Selection set and derived group signals

use crate::core::config::SelectionConfig;
use crate::core::types::{ControlMode, EntityId, Vec2};
use crate::ecs::world::World;
use crate::entity::cell::Cell;
use serde::Serialize;

/// Aggregate state of the live selected cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSignals {
    /// Mean position
    pub centroid: Vec2,
    /// Largest distance from the centroid to a member
    pub spread: f32,
    pub average_size: f32,
    pub count: usize,
}

impl GroupSignals {
    /// Signals over the given cells, None when there are none
    pub fn from_cells<'a>(cells: impl Iterator<Item = &'a Cell> + Clone) -> Option<Self> {
        let (sum, size_sum, count) = cells
            .clone()
            .fold((Vec2::ZERO, 0.0, 0usize), |(sum, size, n), c| {
                (sum + c.position, size + c.size, n + 1)
            });
        if count == 0 {
            return None;
        }

        let centroid = sum / count as f32;
        let spread = cells
            .map(|c| c.position.distance(&centroid))
            .fold(0.0_f32, f32::max);

        Some(Self {
            centroid,
            spread,
            average_size: size_sum / count as f32,
            count,
        })
    }
}

/// Duplicate-free, ordered set of selected player cells
///
/// Handles may go stale between ticks; every read skips them and `purge`
/// drops them at the tick boundary.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    members: Vec<EntityId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored handles, including any not yet purged
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a player cell; it becomes player-controlled
    ///
    /// Refuses non-player cells, stale handles, and cells already held by
    /// any selection set.
    pub fn select(&mut self, world: &mut World, id: EntityId) -> bool {
        let Some(cell) = world.cell_mut(id) else {
            return false;
        };
        if !cell.is_selectable() || cell.selected || self.members.contains(&id) {
            return false;
        }
        cell.selected = true;
        cell.control_mode = ControlMode::PlayerControlled;
        self.members.push(id);
        true
    }

    pub fn deselect(&mut self, world: &mut World, id: EntityId, rules: &SelectionConfig) -> bool {
        let Some(pos) = self.members.iter().position(|&m| m == id) else {
            return false;
        };
        self.members.remove(pos);
        if let Some(cell) = world.cell_mut(id) {
            release(cell, rules);
        }
        true
    }

    pub fn clear(&mut self, world: &mut World, rules: &SelectionConfig) {
        for id in self.members.drain(..) {
            if let Some(cell) = world.cell_mut(id) {
                release(cell, rules);
            }
        }
    }

    /// Drop destroyed and converted members; returns how many were dropped
    pub fn purge(&mut self, world: &World) -> usize {
        let before = self.members.len();
        self.members
            .retain(|&id| world.cell(id).is_some_and(|c| c.is_selectable() && c.selected));
        before - self.members.len()
    }

    /// Live members in selection order
    pub fn live<'a>(&'a self, world: &'a World) -> impl Iterator<Item = (EntityId, &'a Cell)> + Clone + 'a {
        self.members
            .iter()
            .filter_map(move |&id| world.cell(id).map(|c| (id, c)))
            .filter(|(_, c)| c.is_selectable())
    }

    pub fn live_count(&self, world: &World) -> usize {
        self.live(world).count()
    }

    pub fn group_signals(&self, world: &World) -> Option<GroupSignals> {
        GroupSignals::from_cells(self.live(world).map(|(_, c)| c))
    }

    /// Mean position of live members, None when nothing is selected
    pub fn group_centroid(&self, world: &World) -> Option<Vec2> {
        self.group_signals(world).map(|g| g.centroid)
    }

    /// Largest distance centroid to live member, 0 when nothing is selected
    pub fn group_spread(&self, world: &World) -> f32 {
        self.group_signals(world).map_or(0.0, |g| g.spread)
    }
}

fn release(cell: &mut Cell, rules: &SelectionConfig) {
    cell.selected = false;
    if rules.idle_player_cells_forage {
        cell.control_mode = ControlMode::Autonomous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::cell::CellTemplate;

    fn rules() -> SelectionConfig {
        SelectionConfig::default()
    }

    #[test]
    fn test_select_rejects_duplicates_and_non_player() {
        let mut world = World::default();
        let player = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        let rival = world.spawn_from_template(&CellTemplate::rival(), Vec2::ZERO);
        let mut set = SelectionSet::new();

        assert!(set.select(&mut world, player));
        assert!(!set.select(&mut world, player));
        assert!(!set.select(&mut world, rival));
        assert_eq!(set.members(), &[player]);
    }

    #[test]
    fn test_cell_held_by_one_set_only() {
        let mut world = World::default();
        let id = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        let mut first = SelectionSet::new();
        let mut second = SelectionSet::new();

        assert!(first.select(&mut world, id));
        assert!(!second.select(&mut world, id));
    }

    #[test]
    fn test_selection_toggles_control_mode() {
        let mut world = World::default();
        let id = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        let mut set = SelectionSet::new();

        set.select(&mut world, id);
        set.clear(&mut world, &rules());
        assert_eq!(world.cell(id).unwrap().control_mode, ControlMode::Autonomous);

        set.select(&mut world, id);
        assert_eq!(world.cell(id).unwrap().control_mode, ControlMode::PlayerControlled);

        let keep = SelectionConfig {
            idle_player_cells_forage: false,
            ..rules()
        };
        set.deselect(&mut world, id, &keep);
        assert_eq!(world.cell(id).unwrap().control_mode, ControlMode::PlayerControlled);
        assert!(!world.cell(id).unwrap().selected);
    }

    #[test]
    fn test_centroid_skips_destroyed_member() {
        let mut world = World::default();
        let a = world.spawn_from_template(&CellTemplate::player(), Vec2::new(0.0, 0.0));
        let b = world.spawn_from_template(&CellTemplate::player(), Vec2::new(4.0, 0.0));
        let c = world.spawn_from_template(&CellTemplate::player(), Vec2::new(100.0, 0.0));
        let mut set = SelectionSet::new();
        for id in [a, b, c] {
            set.select(&mut world, id);
        }

        world.despawn_cell(c);
        assert_eq!(set.group_centroid(&world), Some(Vec2::new(2.0, 0.0)));
        assert_eq!(set.group_spread(&world), 2.0);
        assert_eq!(set.live_count(&world), 2);

        assert_eq!(set.purge(&world), 1);
        assert_eq!(set.members(), &[a, b]);
    }

    #[test]
    fn test_empty_selection_signals() {
        let world = World::default();
        let set = SelectionSet::new();
        assert!(set.group_signals(&world).is_none());
        assert_eq!(set.group_spread(&world), 0.0);
    }

    #[test]
    fn test_average_size() {
        let mut world = World::default();
        let a = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        let b = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        world.cell_mut(b).unwrap().set_size(3.0);
        let mut set = SelectionSet::new();
        set.select(&mut world, a);
        set.select(&mut world, b);

        let signals = set.group_signals(&world).unwrap();
        assert_eq!(signals.average_size, 2.0);
        assert_eq!(signals.count, 2);
    }
}
