//! ECS World - the registry that owns every cell and nutrient
//!
//! Entities live in generational slot maps, so a handle captured before a
//! structural change simply fails lookup afterwards. Detection passes must
//! not create or destroy entities directly; they queue requests that
//! `apply_pending` carries out once the pass is over.

use crate::core::error::{ColonyError, Result};
use crate::core::types::{EntityId, Faction, NutrientId, Tick, Vec2};
use crate::entity::cell::{Cell, CellTemplate};
use crate::entity::nutrient::Nutrient;
use crate::spatial::sparse_hash::SparseHashGrid;
use ahash::AHashSet;
use ordered_float::OrderedFloat;
use slotmap::SlotMap;

/// Structural changes requested during a detection pass
#[derive(Debug, Default)]
struct PendingChanges {
    despawn_cells: Vec<EntityId>,
    doomed_cells: AHashSet<EntityId>,
    despawn_nutrients: Vec<NutrientId>,
    doomed_nutrients: AHashSet<NutrientId>,
}

/// What `apply_pending` actually did
#[derive(Debug, Default)]
pub struct AppliedChanges {
    /// Destroyed cells with their final state
    pub destroyed_cells: Vec<(EntityId, Cell)>,
    pub destroyed_nutrients: usize,
}

/// The game world containing all entities
pub struct World {
    pub current_tick: Tick,
    /// Simulated seconds since the world was created
    pub elapsed: f32,
    cells: SlotMap<EntityId, Cell>,
    nutrients: SlotMap<NutrientId, Nutrient>,
    cell_grid: SparseHashGrid<EntityId>,
    nutrient_grid: SparseHashGrid<NutrientId>,
    pending: PendingChanges,
}

impl World {
    pub fn new(grid_cell_size: f32) -> Self {
        Self {
            current_tick: 0,
            elapsed: 0.0,
            cells: SlotMap::with_key(),
            nutrients: SlotMap::with_key(),
            cell_grid: SparseHashGrid::new(grid_cell_size),
            nutrient_grid: SparseHashGrid::new(grid_cell_size),
            pending: PendingChanges::default(),
        }
    }

    // === CREATION & DESTRUCTION ===

    /// Insert a cell immediately. Not for use inside a detection pass.
    pub fn spawn_cell(&mut self, cell: Cell) -> EntityId {
        self.cells.insert(cell)
    }

    /// Spawn-from-template factory
    pub fn spawn_from_template(&mut self, template: &CellTemplate, position: Vec2) -> EntityId {
        self.spawn_cell(template.instantiate(position))
    }

    pub fn spawn_nutrient(&mut self, nutrient: Nutrient) -> NutrientId {
        self.nutrients.insert(nutrient)
    }

    /// Remove a cell immediately. Not for use inside a detection pass.
    pub fn despawn_cell(&mut self, id: EntityId) -> Option<Cell> {
        self.cells.remove(id)
    }

    pub fn despawn_nutrient(&mut self, id: NutrientId) -> Option<Nutrient> {
        self.nutrients.remove(id)
    }

    /// Request destruction at the end of the current pass
    ///
    /// Returns false if the cell is already doomed or gone, so callers can
    /// tell a fresh kill from a double-processed one.
    pub fn queue_despawn_cell(&mut self, id: EntityId) -> bool {
        if !self.cells.contains_key(id) || !self.pending.doomed_cells.insert(id) {
            return false;
        }
        self.pending.despawn_cells.push(id);
        true
    }

    pub fn queue_despawn_nutrient(&mut self, id: NutrientId) -> bool {
        if !self.nutrients.contains_key(id) || !self.pending.doomed_nutrients.insert(id) {
            return false;
        }
        self.pending.despawn_nutrients.push(id);
        true
    }

    /// Whether a cell is live and not queued for destruction
    pub fn is_active_cell(&self, id: EntityId) -> bool {
        self.cells.contains_key(id) && !self.pending.doomed_cells.contains(&id)
    }

    pub fn is_active_nutrient(&self, id: NutrientId) -> bool {
        self.nutrients.contains_key(id) && !self.pending.doomed_nutrients.contains(&id)
    }

    /// Carry out queued destroys
    pub fn apply_pending(&mut self) -> AppliedChanges {
        let mut applied = AppliedChanges::default();
        let pending = std::mem::take(&mut self.pending);

        for id in pending.despawn_cells {
            if let Some(cell) = self.cells.remove(id) {
                applied.destroyed_cells.push((id, cell));
            }
        }
        for id in pending.despawn_nutrients {
            if self.nutrients.remove(id).is_some() {
                applied.destroyed_nutrients += 1;
            }
        }

        applied
    }

    // === LOOKUP ===

    pub fn cell(&self, id: EntityId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn cell_mut(&mut self, id: EntityId) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    /// Lookup that reports a stale handle as an error
    pub fn try_cell(&self, id: EntityId) -> Result<&Cell> {
        self.cells.get(id).ok_or(ColonyError::EntityNotFound(id))
    }

    pub fn contains_cell(&self, id: EntityId) -> bool {
        self.cells.contains_key(id)
    }

    pub fn nutrient(&self, id: NutrientId) -> Option<&Nutrient> {
        self.nutrients.get(id)
    }

    /// Iterate live cells in registry order
    pub fn cells(&self) -> impl Iterator<Item = (EntityId, &Cell)> + '_ {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Cell)> + '_ {
        self.cells.iter_mut()
    }

    /// Snapshot of live cell handles, safe to hold across mutation
    pub fn cell_ids(&self) -> Vec<EntityId> {
        self.cells.keys().collect()
    }

    pub fn nutrients(&self) -> impl Iterator<Item = (NutrientId, &Nutrient)> + '_ {
        self.nutrients.iter()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn nutrient_count(&self) -> usize {
        self.nutrients.len()
    }

    pub fn entity_count(&self) -> usize {
        self.cells.len() + self.nutrients.len()
    }

    /// Live cells of one faction, counted from the registry
    pub fn count_faction(&self, faction: Faction) -> usize {
        self.cells.values().filter(|c| c.faction == faction).count()
    }

    // === SPATIAL QUERIES ===

    /// Re-index current positions; call after positions change
    pub fn rebuild_spatial_index(&mut self) {
        self.cell_grid
            .rebuild(self.cells.iter().map(|(id, c)| (id, c.position)));
        self.nutrient_grid
            .rebuild(self.nutrients.iter().map(|(id, n)| (id, n.position)));
    }

    /// Distance between two cell centres; `None` if either handle is stale
    pub fn distance(&self, a: EntityId, b: EntityId) -> Option<f32> {
        let a = self.cells.get(a)?;
        let b = self.cells.get(b)?;
        Some(a.position.distance(&b.position))
    }

    /// Whether a circle of `reach` around `a` overlaps the visual circle of `b`
    pub fn overlaps(&self, a: EntityId, reach: f32, b: EntityId) -> Option<bool> {
        let ca = self.cells.get(a)?;
        let cb = self.cells.get(b)?;
        let limit = reach + cb.visual_radius();
        Some(ca.position.distance_squared(&cb.position) <= limit * limit)
    }

    /// Active cells within `radius` of `center` (inclusive), as last indexed
    pub fn cells_within(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.cell_grid
            .query_radius(center, radius)
            .into_iter()
            .map(|(id, _)| id)
            .filter(|&id| self.is_active_cell(id))
            .collect()
    }

    /// Active nutrients within `radius` of `center` (inclusive)
    pub fn nutrients_within(&self, center: Vec2, radius: f32) -> Vec<NutrientId> {
        self.nutrient_grid
            .query_radius(center, radius)
            .into_iter()
            .map(|(id, _)| id)
            .filter(|&id| self.is_active_nutrient(id))
            .collect()
    }

    /// Nearest active cell strictly closer than `radius` passing `filter`
    pub fn nearest_cell(
        &self,
        center: Vec2,
        radius: f32,
        filter: impl Fn(EntityId, &Cell) -> bool,
    ) -> Option<EntityId> {
        self.cells_within(center, radius)
            .into_iter()
            .filter_map(|id| self.cells.get(id).map(|c| (id, c)))
            .filter(|(id, c)| filter(*id, c))
            .map(|(id, c)| (id, center.distance(&c.position)))
            .filter(|(_, d)| *d < radius)
            .min_by_key(|(_, d)| OrderedFloat(*d))
            .map(|(id, _)| id)
    }

    /// Nearest active nutrient strictly closer than `radius`
    pub fn nearest_nutrient(&self, center: Vec2, radius: f32) -> Option<(NutrientId, Vec2)> {
        self.nutrients_within(center, radius)
            .into_iter()
            .filter_map(|id| self.nutrients.get(id).map(|n| (id, n.position)))
            .map(|(id, pos)| (id, pos, center.distance(&pos)))
            .filter(|(_, _, d)| *d < radius)
            .min_by_key(|(_, _, d)| OrderedFloat(*d))
            .map(|(id, pos, _)| (id, pos))
    }

    /// Hit-test a world point against cell click radii
    ///
    /// When several cells contain the point, the one whose centre is
    /// closest wins.
    pub fn cell_at_point(&self, point: Vec2) -> Option<EntityId> {
        self.cells
            .iter()
            .map(|(id, c)| (id, c.position.distance(&point), c.visual_radius()))
            .filter(|(_, d, r)| d <= r)
            .min_by_key(|(_, d, _)| OrderedFloat(*d))
            .map(|(id, _, _)| id)
    }

    /// Advance the clock by one tick of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.current_tick += 1;
        self.elapsed += dt;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::nutrient::NutrientTemplate;

    fn world_with_cells(positions: &[Vec2]) -> (World, Vec<EntityId>) {
        let mut world = World::default();
        let ids = positions
            .iter()
            .map(|&p| world.spawn_from_template(&CellTemplate::player(), p))
            .collect();
        world.rebuild_spatial_index();
        (world, ids)
    }

    #[test]
    fn test_stale_handle_fails_lookup() {
        let (mut world, ids) = world_with_cells(&[Vec2::ZERO]);
        world.despawn_cell(ids[0]);
        assert!(world.cell(ids[0]).is_none());
        assert!(matches!(
            world.try_cell(ids[0]),
            Err(ColonyError::EntityNotFound(_))
        ));

        // Reused slot gets a new generation
        let fresh = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        assert_ne!(fresh, ids[0]);
        assert!(world.cell(ids[0]).is_none());
    }

    #[test]
    fn test_queued_despawn_is_deferred_and_deduplicated() {
        let (mut world, ids) = world_with_cells(&[Vec2::ZERO, Vec2::new(5.0, 0.0)]);

        assert!(world.queue_despawn_cell(ids[0]));
        assert!(!world.queue_despawn_cell(ids[0]));
        assert!(world.contains_cell(ids[0]));
        assert!(!world.is_active_cell(ids[0]));

        let applied = world.apply_pending();
        assert_eq!(applied.destroyed_cells.len(), 1);
        assert!(!world.contains_cell(ids[0]));
        assert_eq!(world.cell_count(), 1);
    }

    #[test]
    fn test_nearest_cell_respects_radius_and_filter() {
        let (world, ids) = world_with_cells(&[
            Vec2::new(2.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(20.0, 0.0),
        ]);

        let nearest = world.nearest_cell(Vec2::ZERO, 5.0, |_, _| true);
        assert_eq!(nearest, Some(ids[0]));

        let skip_first = world.nearest_cell(Vec2::ZERO, 5.0, |id, _| id != ids[0]);
        assert_eq!(skip_first, Some(ids[1]));

        assert!(world.nearest_cell(Vec2::ZERO, 2.0, |_, _| true).is_none());
    }

    #[test]
    fn test_nearest_nutrient() {
        let mut world = World::default();
        let template = NutrientTemplate::default();
        world.spawn_nutrient(template.instantiate(Vec2::new(3.0, 0.0)));
        let close = world.spawn_nutrient(template.instantiate(Vec2::new(1.0, 0.0)));
        world.rebuild_spatial_index();

        let found = world.nearest_nutrient(Vec2::ZERO, 5.0).map(|(id, _)| id);
        assert_eq!(found, Some(close));
    }

    #[test]
    fn test_cell_at_point_uses_visual_radius() {
        let (mut world, ids) = world_with_cells(&[Vec2::ZERO]);
        world.cell_mut(ids[0]).unwrap().set_size(4.0);

        assert_eq!(world.cell_at_point(Vec2::new(1.9, 0.0)), Some(ids[0]));
        assert_eq!(world.cell_at_point(Vec2::new(2.1, 0.0)), None);
    }

    #[test]
    fn test_distance_and_overlap() {
        let (mut world, ids) = world_with_cells(&[
            Vec2::ZERO,
            Vec2::new(1.5, 0.0),
            Vec2::new(3.0, 4.0),
        ]);
        assert_eq!(world.distance(ids[0], ids[2]), Some(5.0));
        // Size 1 cells have visual radius 0.5
        assert_eq!(world.overlaps(ids[0], 1.0, ids[1]), Some(true));
        assert_eq!(world.overlaps(ids[0], 0.9, ids[1]), Some(false));

        world.despawn_cell(ids[2]);
        assert_eq!(world.distance(ids[0], ids[2]), None);
        assert_eq!(world.overlaps(ids[0], 10.0, ids[2]), None);
    }
}
