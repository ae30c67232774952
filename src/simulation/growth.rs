//! Growth and mass ledger
//!
//! Pure functions mapping a size and an amount eaten to a new size, the
//! overflow past max size, derived radii and movement speed.

use crate::entity::cell::Cell;

/// Speed substituted when a configured base speed is unusable
pub const FALLBACK_SPEED: f32 = 5.0;

/// Visual radius is half the size (a unit sprite has radius 0.5)
#[inline]
pub fn visual_radius(size: f32) -> f32 {
    size * 0.5
}

/// Eating reach, a multiple of the visual radius
#[inline]
pub fn eat_radius(size: f32, multiplier: f32) -> f32 {
    visual_radius(size) * multiplier
}

/// Radius a collider must be given in local units so that, once the
/// entity's visual scale is applied, it covers exactly `world_radius`
#[inline]
pub fn collider_local_radius(world_radius: f32, visual_scale: f32) -> f32 {
    if visual_scale > 0.0 {
        world_radius / visual_scale
    } else {
        world_radius
    }
}

/// Result of adding mass to a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthOutcome {
    /// Size after clamping into [min, max]
    pub new_size: f32,
    /// Amount past max size, 0 when the cell fits
    pub overflow: f32,
}

impl GrowthOutcome {
    pub fn overflowed(&self) -> bool {
        self.overflow > 0.0
    }
}

/// Add `gain` to `size` and split the result into a clamped size and overflow
pub fn apply_growth(size: f32, gain: f32, min_size: f32, max_size: f32) -> GrowthOutcome {
    let raw = size + gain;
    GrowthOutcome {
        new_size: raw.clamp(min_size, max_size),
        overflow: (raw - max_size).max(0.0),
    }
}

/// Growth from eating a nutrient: scaled by the cell's growth rate
pub fn apply_nutrition(cell: &Cell, amount: f32) -> GrowthOutcome {
    apply_growth(
        cell.size,
        cell.growth_rate * amount,
        cell.min_size,
        cell.max_size,
    )
}

/// Growth from eating another cell: a flat fraction of the prey's size
pub fn apply_cell_meal(cell: &Cell, prey_size: f32, transfer: f32) -> GrowthOutcome {
    apply_growth(cell.size, prey_size * transfer, cell.min_size, cell.max_size)
}

/// Movement speed for a given size
///
/// Speed falls linearly from `base_speed` at size 1 to `min_speed` at
/// `max_size`. Returns `(base_speed, current_speed)`; both fall back to
/// [`FALLBACK_SPEED`] when the base speed is zero or the result is not finite.
pub fn speed_for_size(size: f32, base_speed: f32, min_speed: f32, max_size: f32) -> (f32, f32) {
    let base = if base_speed > 0.0 && base_speed.is_finite() {
        base_speed
    } else {
        tracing::warn!(
            base_speed,
            "Unusable base speed, falling back to {}",
            FALLBACK_SPEED
        );
        FALLBACK_SPEED
    };

    let span = max_size - 1.0;
    let t = if span > 0.0 {
        ((size - 1.0) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let multiplier = 1.0 + (min_speed / base - 1.0) * t;
    let current = base * multiplier;

    if current.is_finite() {
        (base, current)
    } else {
        tracing::warn!(size, base, min_speed, "Non-finite speed, using fallback");
        (FALLBACK_SPEED, FALLBACK_SPEED)
    }
}
