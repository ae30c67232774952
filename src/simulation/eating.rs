//! Eating and division
//!
//! Lifecycle per cell: Growing -> Overflowing -> (divide) -> Growing.
//!
//! Detection is a read-only pass over the registry producing meal
//! candidates in registry order. Resolution walks the candidates,
//! revalidating both parties, and queues destruction of what was eaten.
//! Division runs after the queued changes are applied.

use crate::core::config::EatingConfig;
use crate::core::types::{EntityId, Faction, NutrientId, Vec2};
use crate::ecs::world::World;
use crate::entity::cell::{Cell, Lifecycle};
use crate::simulation::growth::{self, GrowthOutcome};
use crate::simulation::tick::SimulationEvent;
use rayon::prelude::*;

/// Something a predator found within reach
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Meal {
    Nutrient(NutrientId),
    Cell(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealCandidate {
    pub predator: EntityId,
    pub meal: Meal,
}

/// Size rule: the predator must be strictly larger than `prey * ratio`
#[inline]
pub fn size_allows_eating(predator_size: f32, prey_size: f32, ratio: f32) -> bool {
    predator_size > prey_size * ratio
}

/// Viral agents infect instead of eating; factions never eat their own
#[inline]
pub fn faction_allows_eating(predator: Faction, prey: Faction) -> bool {
    predator != Faction::Viral && predator != prey
}

/// Reach is measured from the predator only
#[inline]
pub fn within_eat_range(predator: &Cell, target: Vec2, rules: &EatingConfig) -> bool {
    let reach = predator.eat_radius(rules.eat_radius_multiplier);
    predator.position.distance_squared(&target) <= reach * reach
}

/// Full eligibility check for a cell meal
pub fn can_eat(predator: &Cell, prey: &Cell, rules: &EatingConfig) -> bool {
    faction_allows_eating(predator.faction, prey.faction)
        && size_allows_eating(predator.size, prey.size, rules.size_ratio)
        && within_eat_range(predator, prey.position, rules)
}

/// Nutrients are eaten by any non-viral cell in reach
pub fn can_eat_nutrient(predator: &Cell, nutrient_pos: Vec2, rules: &EatingConfig) -> bool {
    predator.faction != Faction::Viral && within_eat_range(predator, nutrient_pos, rules)
}

/// Collect every meal candidate, predators in registry order
///
/// The spatial index must be current. Runs on rayon above
/// `parallel_threshold` cells; output order is identical either way.
pub fn detect_meals(
    world: &World,
    rules: &EatingConfig,
    parallel_threshold: usize,
) -> Vec<MealCandidate> {
    let predators: Vec<EntityId> = world
        .cells()
        .filter(|(_, c)| c.faction != Faction::Viral)
        .map(|(id, _)| id)
        .collect();

    if predators.len() >= parallel_threshold {
        predators
            .par_iter()
            .map(|&id| meals_for(world, id, rules))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    } else {
        predators
            .iter()
            .flat_map(|&id| meals_for(world, id, rules))
            .collect()
    }
}

fn meals_for(world: &World, predator_id: EntityId, rules: &EatingConfig) -> Vec<MealCandidate> {
    let Some(predator) = world.cell(predator_id) else {
        return Vec::new();
    };
    let reach = predator.eat_radius(rules.eat_radius_multiplier);
    let mut meals = Vec::new();

    for nutrient_id in world.nutrients_within(predator.position, reach) {
        if let Some(nutrient) = world.nutrient(nutrient_id) {
            if can_eat_nutrient(predator, nutrient.position, rules) {
                meals.push(MealCandidate {
                    predator: predator_id,
                    meal: Meal::Nutrient(nutrient_id),
                });
            }
        }
    }

    for prey_id in world.cells_within(predator.position, reach) {
        if prey_id == predator_id {
            continue;
        }
        if let Some(prey) = world.cell(prey_id) {
            if can_eat(predator, prey, rules) {
                meals.push(MealCandidate {
                    predator: predator_id,
                    meal: Meal::Cell(prey_id),
                });
            }
        }
    }

    meals
}

/// Record growth on a cell, entering Overflowing when it spilled past max
fn absorb(cell: &mut Cell, outcome: GrowthOutcome) {
    cell.set_size(outcome.new_size);
    if outcome.overflowed() {
        let carried = match cell.lifecycle {
            Lifecycle::Overflowing { overflow } => overflow,
            Lifecycle::Growing => 0.0,
        };
        cell.lifecycle = Lifecycle::Overflowing {
            overflow: carried + outcome.overflow,
        };
    }
}

/// Apply meal candidates in order, queueing destruction of what was eaten
///
/// Each candidate is revalidated: a predator eaten earlier in the pass
/// does nothing, prey already eaten is skipped, and size/range are checked
/// again against sizes updated by earlier meals.
pub fn resolve_meals(
    world: &mut World,
    candidates: &[MealCandidate],
    rules: &EatingConfig,
    events: &mut Vec<SimulationEvent>,
) {
    for candidate in candidates {
        if !world.is_active_cell(candidate.predator) {
            continue;
        }

        match candidate.meal {
            Meal::Nutrient(nutrient_id) => {
                if !world.is_active_nutrient(nutrient_id) {
                    continue;
                }
                let Some(value) = world.nutrient(nutrient_id).map(|n| n.nutrition_value) else {
                    continue;
                };
                world.queue_despawn_nutrient(nutrient_id);

                let Some(predator) = world.cell_mut(candidate.predator) else {
                    continue;
                };
                let outcome = growth::apply_nutrition(predator, value);
                absorb(predator, outcome);

                tracing::trace!(
                    predator = ?candidate.predator,
                    value,
                    size = outcome.new_size,
                    "Nutrient eaten"
                );
                events.push(SimulationEvent::NutrientEaten {
                    predator: candidate.predator,
                    nutrition: value,
                    new_size: outcome.new_size,
                });
            }
            Meal::Cell(prey_id) => {
                if !world.is_active_cell(prey_id) {
                    continue;
                }
                let (Some(predator), Some(prey)) =
                    (world.cell(candidate.predator), world.cell(prey_id))
                else {
                    continue;
                };
                if !can_eat(predator, prey, rules) {
                    continue;
                }
                let prey_size = prey.size;
                let prey_faction = prey.faction;
                let outcome = growth::apply_cell_meal(predator, prey_size, rules.cell_transfer);

                world.queue_despawn_cell(prey_id);
                if let Some(predator) = world.cell_mut(candidate.predator) {
                    absorb(predator, outcome);
                }

                tracing::debug!(
                    predator = ?candidate.predator,
                    prey = ?prey_id,
                    prey_size,
                    new_size = outcome.new_size,
                    "Cell eaten"
                );
                events.push(SimulationEvent::CellEaten {
                    predator: candidate.predator,
                    prey: prey_id,
                    prey_faction,
                    gained: prey_size * rules.cell_transfer,
                });
            }
        }
    }
}

/// Split every overflowing cell, plus player-controlled cells at max size
/// when the divide command was issued this tick
///
/// Must run after queued changes from meal resolution have been applied.
pub fn resolve_divisions(
    world: &mut World,
    divide_command: bool,
    rules: &EatingConfig,
    events: &mut Vec<SimulationEvent>,
) {
    let dividing: Vec<(EntityId, f32)> = world
        .cells()
        .filter_map(|(id, c)| match c.lifecycle {
            Lifecycle::Overflowing { overflow } => Some((id, overflow)),
            Lifecycle::Growing
                if divide_command && c.is_player_controlled() && c.size >= c.max_size =>
            {
                Some((id, 0.0))
            }
            Lifecycle::Growing => None,
        })
        .collect();

    for (parent_id, overflow) in dividing {
        if let Some(event) = divide(world, parent_id, overflow, rules) {
            events.push(event);
        }
    }
}

/// Divide one cell: clamp to max, halve, clone at an offset, then hand the
/// overflow to the first same-faction cell nearby other than the parent
///
/// The fresh clone is a candidate too, so with no earlier-registered
/// neighbour in range it receives the overflow. Overflow beyond what the
/// recipient receives is discarded.
pub fn divide(
    world: &mut World,
    parent_id: EntityId,
    overflow: f32,
    rules: &EatingConfig,
) -> Option<SimulationEvent> {
    let parent = world.cell_mut(parent_id)?;
    parent.lifecycle = Lifecycle::Growing;
    let half = parent.size.min(parent.max_size) / 2.0;
    parent.set_size(half);

    let mut child = parent.clone();
    child.position = parent.position + Vec2::new(rules.division_offset, 0.0);
    child.velocity = Vec2::ZERO;
    child.move_target = None;
    child.selected = false;
    child.last_infection_time = None;
    child.last_reproduction_time = None;

    let faction = parent.faction;
    let parent_pos = parent.position;
    let child_id = world.spawn_cell(child);

    let mut recipient = None;
    if overflow > 0.0 {
        let radius_sq = rules.overflow_recipient_radius * rules.overflow_recipient_radius;
        recipient = world
            .cells()
            .find(|(id, c)| {
                *id != parent_id
                    && c.faction == faction
                    && c.position.distance_squared(&parent_pos) < radius_sq
            })
            .map(|(id, _)| id);

        if let Some(cell) = recipient.and_then(|id| world.cell_mut(id)) {
            let granted = (1.0 + overflow).min(cell.max_size);
            cell.set_size(granted);
        }
    }

    tracing::debug!(
        parent = ?parent_id,
        child = ?child_id,
        overflow,
        recipient = ?recipient,
        "Cell divided"
    );

    Some(SimulationEvent::CellDivided {
        parent: parent_id,
        child: child_id,
        overflow,
        overflow_recipient: recipient,
    })
}
