//! Color definitions for factions and visual states

use crate::core::types::Faction;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Darken color by a factor (0.0 = black, 1.0 = unchanged)
    pub fn darken(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }
}

/// Background color for the renderer
pub const BACKGROUND: Color = Color::new(0.1, 0.1, 0.12, 1.0);

pub const NUTRIENT: Color = Color::new(0.3, 0.85, 0.3, 1.0);

/// Outline drawn around selected cells
pub const SELECTION_RING: Color = Color::new(1.0, 0.9, 0.2, 1.0);

/// Get the base color for a faction
pub fn faction_color(faction: Faction) -> Color {
    match faction {
        Faction::Player => Color::new(1.0, 1.0, 1.0, 1.0),
        Faction::Rival => Color::new(0.2, 0.35, 0.95, 1.0),
        Faction::Viral => Color::new(0.9, 0.15, 0.15, 1.0),
    }
}

/// Text color for size labels, chosen for contrast with the faction color
pub fn label_color(faction: Faction) -> Color {
    match faction {
        Faction::Rival => Color::new(1.0, 1.0, 1.0, 1.0),
        Faction::Player | Faction::Viral => Color::new(0.0, 0.0, 0.0, 1.0),
    }
}

/// Autonomous player cells are drawn slightly dimmer than commanded ones
pub fn control_tint(base: Color, player_controlled: bool) -> Color {
    if player_controlled {
        base
    } else {
        base.darken(0.8)
    }
}
