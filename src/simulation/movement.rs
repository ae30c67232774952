//! Motion integration
//!
//! Turns move targets, directional input and group cohesion into velocity,
//! then integrates positions.

use crate::command::selection::GroupSignals;
use crate::core::config::SimulationConfig;
use crate::core::types::Vec2;
use crate::ecs::world::World;
use crate::entity::cell::Cell;

/// Per-tick inputs for the motion step
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionInputs {
    /// Directional input past the dead zone
    pub axis: Option<Vec2>,
    /// Live selected cell count
    pub selected_count: usize,
    /// Signals of the selected group, if any
    pub group: Option<GroupSignals>,
}

impl MotionInputs {
    fn group_mode(&self) -> bool {
        self.selected_count > 1
    }
}

/// Velocity toward a target at `speed`, or None once arrived
pub fn seek_velocity(position: Vec2, target: Vec2, speed: f32, arrival_distance: f32) -> Option<Vec2> {
    if position.distance(&target) < arrival_distance {
        None
    } else {
        Some((target - position).normalize() * speed)
    }
}

/// Cohesion nudge for one selected cell, zero inside the threshold
pub fn cohesion_nudge(position: Vec2, centroid: Vec2, strength: f32, threshold: f32) -> Vec2 {
    let to_center = centroid - position;
    if to_center.length() > threshold {
        to_center.normalize() * strength
    } else {
        Vec2::ZERO
    }
}

fn travel_speed(cell: &Cell, config: &SimulationConfig) -> f32 {
    if cell.is_viral() {
        config.infection.move_speed
    } else {
        cell.current_speed
    }
}

/// Velocity for a player-controlled cell without a move target
fn steered_velocity(cell: &Cell, inputs: &MotionInputs, config: &SimulationConfig) -> Vec2 {
    let mut velocity = Vec2::ZERO;

    if let Some(axis) = inputs.axis {
        if inputs.group_mode() {
            if cell.selected {
                velocity = axis.normalize() * config.selection.group_move_speed;
            }
        } else {
            velocity = axis * cell.current_speed;
        }
    }

    if inputs.group_mode() && cell.selected {
        if let Some(group) = inputs.group {
            velocity += cohesion_nudge(
                cell.position,
                group.centroid,
                config.selection.cohesion_strength,
                config.selection.cohesion_threshold,
            );
        }
    }

    velocity
}

/// Set every cell's velocity for this tick and move it
pub fn integrate(world: &mut World, inputs: &MotionInputs, config: &SimulationConfig, dt: f32) {
    let arrival = config.behavior.arrival_distance;

    for (_, cell) in world.cells_mut() {
        cell.velocity = match cell.move_target {
            Some(target) => match seek_velocity(cell.position, target, travel_speed(cell, config), arrival) {
                Some(v) => v,
                None => {
                    // Autonomous cells pick a new target next decision phase
                    cell.move_target = None;
                    Vec2::ZERO
                }
            },
            None if cell.is_player_controlled() => steered_velocity(cell, inputs, config),
            None => Vec2::ZERO,
        };

        let step = cell.velocity * dt;
        if step.is_finite() {
            cell.position += step;
        } else {
            tracing::warn!(velocity = ?cell.velocity, "Non-finite velocity, cell held in place");
            cell.velocity = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ControlMode;
    use crate::entity::cell::CellTemplate;

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn test_seek_velocity_uses_speed() {
        let v = seek_velocity(Vec2::ZERO, Vec2::new(10.0, 0.0), 5.0, 0.5).unwrap();
        assert_eq!(v, Vec2::new(5.0, 0.0));
        assert!(seek_velocity(Vec2::ZERO, Vec2::new(0.4, 0.0), 5.0, 0.5).is_none());
    }

    #[test]
    fn test_arrival_clears_target() {
        let mut world = World::default();
        let id = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        world.cell_mut(id).unwrap().move_target = Some(Vec2::new(0.2, 0.0));

        integrate(&mut world, &MotionInputs::default(), &config(), 0.1);
        let cell = world.cell(id).unwrap();
        assert!(cell.move_target.is_none());
        assert_eq!(cell.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_moves_toward_target() {
        let mut world = World::default();
        let id = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        world.cell_mut(id).unwrap().move_target = Some(Vec2::new(10.0, 0.0));

        integrate(&mut world, &MotionInputs::default(), &config(), 0.1);
        let cell = world.cell(id).unwrap();
        assert!((cell.position.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_solo_axis_scales_with_current_speed() {
        let mut world = World::default();
        let id = world.spawn_from_template(&CellTemplate::player(), Vec2::ZERO);
        let inputs = MotionInputs {
            axis: Some(Vec2::new(0.5, 0.0)),
            selected_count: 1,
            group: None,
        };

        integrate(&mut world, &inputs, &config(), 1.0);
        assert_eq!(world.cell(id).unwrap().velocity, Vec2::new(2.5, 0.0));
    }

    #[test]
    fn test_group_axis_uses_group_speed_and_cohesion() {
        let mut world = World::default();
        let a = world.spawn_from_template(&CellTemplate::player(), Vec2::new(0.0, 2.0));
        let b = world.spawn_from_template(&CellTemplate::player(), Vec2::new(0.0, -2.0));
        for id in [a, b] {
            world.cell_mut(id).unwrap().selected = true;
        }
        let inputs = MotionInputs {
            axis: Some(Vec2::new(1.0, 0.0)),
            selected_count: 2,
            group: Some(GroupSignals {
                centroid: Vec2::ZERO,
                spread: 2.0,
                average_size: 1.0,
                count: 2,
            }),
        };

        integrate(&mut world, &inputs, &config(), 1.0);
        assert_eq!(world.cell(a).unwrap().velocity, Vec2::new(4.0, -1.0));
        assert_eq!(world.cell(b).unwrap().velocity, Vec2::new(4.0, 1.0));
    }

    #[test]
    fn test_cohesion_skips_cells_with_targets_and_close_cells() {
        let mut world = World::default();
        let moving = world.spawn_from_template(&CellTemplate::player(), Vec2::new(3.0, 0.0));
        let close = world.spawn_from_template(&CellTemplate::player(), Vec2::new(0.3, 0.0));
        for id in [moving, close] {
            world.cell_mut(id).unwrap().selected = true;
        }
        world.cell_mut(moving).unwrap().move_target = Some(Vec2::new(3.0, 10.0));
        let inputs = MotionInputs {
            axis: None,
            selected_count: 2,
            group: Some(GroupSignals {
                centroid: Vec2::ZERO,
                spread: 3.0,
                average_size: 1.0,
                count: 2,
            }),
        };

        integrate(&mut world, &inputs, &config(), 1.0);
        assert_eq!(world.cell(moving).unwrap().velocity, Vec2::new(0.0, 5.0));
        assert_eq!(world.cell(close).unwrap().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_autonomous_cell_without_target_stays() {
        let mut world = World::default();
        let mut template = CellTemplate::rival();
        template.control_mode = ControlMode::Autonomous;
        let id = world.spawn_from_template(&template, Vec2::ZERO);
        let inputs = MotionInputs {
            axis: Some(Vec2::new(1.0, 0.0)),
            ..Default::default()
        };

        integrate(&mut world, &inputs, &config(), 1.0);
        assert_eq!(world.cell(id).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_viral_moves_at_fixed_speed() {
        let mut world = World::default();
        let id = world.spawn_from_template(&CellTemplate::viral(), Vec2::ZERO);
        world.cell_mut(id).unwrap().set_size(10.0);
        world.cell_mut(id).unwrap().move_target = Some(Vec2::new(0.0, 10.0));

        integrate(&mut world, &MotionInputs::default(), &config(), 1.0);
        assert_eq!(world.cell(id).unwrap().velocity, Vec2::new(0.0, 3.0));
    }
}
