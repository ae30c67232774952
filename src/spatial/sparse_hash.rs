//! Sparse hash grid for efficient spatial queries

use crate::core::types::Vec2;
use ahash::AHashMap;

/// Sparse hash grid for O(1) neighbor queries
///
/// Stores `(key, position)` pairs so radius queries can filter exactly
/// without a second lookup.
pub struct SparseHashGrid<K: Copy + PartialEq> {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<(K, Vec2)>>,
}

impl<K: Copy + PartialEq> SparseHashGrid<K> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, key: K, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push((key, pos));
    }

    pub fn remove(&mut self, key: K, pos: Vec2) {
        let coord = self.cell_coord(pos);
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.retain(|&(k, _)| k != key);
        }
    }

    /// Query all entries in neighboring cells (3x3 neighborhood)
    pub fn query_neighbors(&self, pos: Vec2) -> impl Iterator<Item = (K, Vec2)> + '_ {
        let (cx, cy) = self.cell_coord(pos);

        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                self.cells
                    .get(&(cx + dx, cy + dy))
                    .into_iter()
                    .flatten()
                    .copied()
            })
        })
    }

    /// Query entries within radius (inclusive)
    ///
    /// Widens the scanned ring when the radius exceeds one grid cell.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<(K, Vec2)> {
        let radius_sq = radius * radius;
        let (cx, cy) = self.cell_coord(center);
        let ring = ((radius / self.cell_size).ceil() as i32).max(1);

        let mut found = Vec::new();
        for dx in -ring..=ring {
            for dy in -ring..=ring {
                if let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) {
                    found.extend(
                        cell.iter()
                            .filter(|(_, pos)| center.distance_squared(pos) <= radius_sq)
                            .copied(),
                    );
                }
            }
        }
        found
    }

    /// Rebuild grid from positions
    pub fn rebuild(&mut self, entries: impl Iterator<Item = (K, Vec2)>) {
        self.clear();
        for (key, pos) in entries {
            self.insert(key, pos);
        }
    }
}
