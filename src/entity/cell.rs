//! Cell state and the spawn-from-template factory

use crate::core::types::{ControlMode, Faction, Vec2};
use crate::simulation::growth;
use serde::{Deserialize, Serialize};

/// Growth lifecycle of a cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Normal state, size within bounds
    Growing,
    /// Growth pushed past max_size this tick; resolved by division
    Overflowing { overflow: f32 },
}

/// Viral infection progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InfectionState {
    Healthy,
    /// Cumulative size lost to infections so far
    Infected { damage_taken: f32 },
    /// Terminal: the cell now belongs to the viral faction
    Converted,
}

/// A living cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub faction: Faction,
    pub control_mode: ControlMode,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Pending command or AI destination
    pub move_target: Option<Vec2>,

    pub size: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub growth_rate: f32,

    pub base_speed: f32,
    /// Derived from size, see `growth::speed_for_size`
    pub current_speed: f32,
    pub min_speed: f32,

    pub lifecycle: Lifecycle,
    pub infection: InfectionState,
    /// Member of a selection set
    pub selected: bool,

    /// Time of this cell's last infection (viral agents only)
    pub last_infection_time: Option<f32>,
    /// Time of this cell's last reproduction (viral and rival agents)
    pub last_reproduction_time: Option<f32>,
}

impl Cell {
    /// Radius the cell is drawn and clicked with
    pub fn visual_radius(&self) -> f32 {
        growth::visual_radius(self.size)
    }

    /// Reach of this cell when eating
    pub fn eat_radius(&self, multiplier: f32) -> f32 {
        growth::eat_radius(self.size, multiplier)
    }

    pub fn is_viral(&self) -> bool {
        self.faction == Faction::Viral
    }

    /// Only player cells may join a selection set
    pub fn is_selectable(&self) -> bool {
        self.faction == Faction::Player
    }

    pub fn is_player_controlled(&self) -> bool {
        self.control_mode == ControlMode::PlayerControlled
    }

    /// Recompute the derived speed after a size change
    pub fn refresh_speed(&mut self) {
        let (base, current) =
            growth::speed_for_size(self.size, self.base_speed, self.min_speed, self.max_size);
        self.base_speed = base;
        self.current_speed = current;
    }

    /// Set the size (clamped to bounds) and refresh derived stats
    pub fn set_size(&mut self, size: f32) {
        self.size = size.clamp(self.min_size, self.max_size);
        self.refresh_speed();
    }
}

/// Data-only description a fresh cell is stamped from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CellTemplate {
    pub faction: Faction,
    pub control_mode: ControlMode,
    pub start_size: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub growth_rate: f32,
    pub base_speed: f32,
    pub min_speed: f32,
}

impl Default for CellTemplate {
    fn default() -> Self {
        Self::player()
    }
}

impl CellTemplate {
    pub fn player() -> Self {
        Self {
            faction: Faction::Player,
            control_mode: ControlMode::PlayerControlled,
            start_size: 1.0,
            min_size: 0.5,
            max_size: 15.0,
            growth_rate: 0.4,
            base_speed: 5.0,
            min_speed: 2.0,
        }
    }

    pub fn rival() -> Self {
        Self {
            faction: Faction::Rival,
            control_mode: ControlMode::Autonomous,
            base_speed: 3.0,
            min_speed: 1.5,
            ..Self::player()
        }
    }

    pub fn viral() -> Self {
        Self {
            faction: Faction::Viral,
            control_mode: ControlMode::Autonomous,
            base_speed: 3.0,
            min_speed: 3.0,
            ..Self::player()
        }
    }

    /// Build a fresh cell at `position`
    pub fn instantiate(&self, position: Vec2) -> Cell {
        let size = self.start_size.clamp(self.min_size, self.max_size);
        let (base_speed, current_speed) =
            growth::speed_for_size(size, self.base_speed, self.min_speed, self.max_size);

        Cell {
            faction: self.faction,
            control_mode: self.control_mode,
            position,
            velocity: Vec2::ZERO,
            move_target: None,
            size,
            min_size: self.min_size,
            max_size: self.max_size,
            growth_rate: self.growth_rate,
            base_speed,
            current_speed,
            min_speed: self.min_speed,
            lifecycle: Lifecycle::Growing,
            infection: InfectionState::Healthy,
            selected: false,
            last_infection_time: None,
            last_reproduction_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_copies_template() {
        let template = CellTemplate::rival();
        let cell = template.instantiate(Vec2::new(3.0, -2.0));

        assert_eq!(cell.faction, Faction::Rival);
        assert_eq!(cell.control_mode, ControlMode::Autonomous);
        assert_eq!(cell.position, Vec2::new(3.0, -2.0));
        assert_eq!(cell.size, 1.0);
        assert_eq!(cell.lifecycle, Lifecycle::Growing);
        assert_eq!(cell.infection, InfectionState::Healthy);
        assert!(cell.move_target.is_none());
        assert!(!cell.selected);
    }

    #[test]
    fn test_instantiate_clamps_start_size() {
        let template = CellTemplate {
            start_size: 40.0,
            ..CellTemplate::player()
        };
        let cell = template.instantiate(Vec2::ZERO);
        assert_eq!(cell.size, 15.0);
    }

    #[test]
    fn test_start_size_one_moves_at_base_speed() {
        let cell = CellTemplate::player().instantiate(Vec2::ZERO);
        assert_eq!(cell.current_speed, cell.base_speed);
    }

    #[test]
    fn test_set_size_clamps_and_slows() {
        let mut cell = CellTemplate::player().instantiate(Vec2::ZERO);
        cell.set_size(100.0);
        assert_eq!(cell.size, 15.0);
        assert!((cell.current_speed - cell.min_speed).abs() < 1e-5);

        cell.set_size(0.0);
        assert_eq!(cell.size, cell.min_size);
    }

    #[test]
    fn test_only_player_cells_selectable() {
        assert!(CellTemplate::player().instantiate(Vec2::ZERO).is_selectable());
        assert!(!CellTemplate::rival().instantiate(Vec2::ZERO).is_selectable());
        assert!(!CellTemplate::viral().instantiate(Vec2::ZERO).is_selectable());
    }
}
