//! Simulation configuration with documented constants
//!
//! All tunables are collected here. Every section deserializes with
//! `#[serde(default)]`, so a TOML file only needs the values it overrides.

use crate::core::error::{ColonyError, Result};
use crate::core::types::{Faction, Vec2};
use crate::entity::cell::CellTemplate;
use crate::entity::nutrient::NutrientTemplate;
use serde::Deserialize;
use std::path::Path;

/// Configuration for the simulation systems
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TIME & SPACE ===
    /// Simulated seconds per tick
    ///
    /// 30 ticks per second keeps contact detection fine grained enough that
    /// a cell at base speed moves well under one eat radius per tick.
    pub tick_seconds: f32,

    /// Size of each cell in the spatial hash grid (world units)
    ///
    /// Should be at least the largest eat radius (max_size * 0.55) so most
    /// contact queries stay inside the 3x3 neighbourhood.
    pub grid_cell_size: f32,

    /// Minimum cell count before the detection pass runs on rayon
    pub parallel_threshold: usize,

    /// Seed for the simulation RNG (spawn placement, jitter, wandering)
    pub seed: u64,

    pub templates: TemplateConfig,
    pub eating: EatingConfig,
    pub infection: InfectionConfig,
    pub rival: RivalConfig,
    pub behavior: BehaviorConfig,
    pub spawners: SpawnerSet,
    pub selection: SelectionConfig,
    pub respawn: RespawnConfig,
    pub camera: CameraFramingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 1.0 / 30.0,
            grid_cell_size: 10.0,
            parallel_threshold: 1000,
            seed: 42,
            templates: TemplateConfig::default(),
            eating: EatingConfig::default(),
            infection: InfectionConfig::default(),
            rival: RivalConfig::default(),
            behavior: BehaviorConfig::default(),
            spawners: SpawnerSet::default(),
            selection: SelectionConfig::default(),
            respawn: RespawnConfig::default(),
            camera: CameraFramingConfig::default(),
        }
    }
}

/// Entity templates used by the spawn-from-template factory
///
/// A `None` template disables whatever spawns from it (the spawner or the
/// respawn monitor warns once and skips).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub player: Option<CellTemplate>,
    pub rival: Option<CellTemplate>,
    pub viral: Option<CellTemplate>,
    pub nutrient: Option<NutrientTemplate>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            player: Some(CellTemplate::player()),
            rival: Some(CellTemplate::rival()),
            viral: Some(CellTemplate::viral()),
            nutrient: Some(NutrientTemplate::default()),
        }
    }
}

impl TemplateConfig {
    /// Template for cells of `faction`
    pub fn cell(&self, faction: Faction) -> Result<&CellTemplate> {
        let template = match faction {
            Faction::Player => &self.player,
            Faction::Rival => &self.rival,
            Faction::Viral => &self.viral,
        };
        template
            .as_ref()
            .ok_or_else(|| ColonyError::MissingTemplate(format!("{:?} cells", faction)))
    }
}

/// Eating and division rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EatingConfig {
    /// Predator must be strictly larger than prey times this ratio
    pub size_ratio: f32,

    /// Eat radius as a multiple of the predator's visual radius
    pub eat_radius_multiplier: f32,

    /// Fraction of a cell prey's size the predator gains
    ///
    /// Flat transfer: the predator's growth rate does not apply.
    pub cell_transfer: f32,

    /// Offset (world units, +x) of the clone created by division
    pub division_offset: f32,

    /// Radius searched for a same-faction cell receiving division overflow
    pub overflow_recipient_radius: f32,
}

impl Default for EatingConfig {
    fn default() -> Self {
        Self {
            size_ratio: 1.3,
            eat_radius_multiplier: 1.1,
            cell_transfer: 0.8,
            division_offset: 1.0,
            overflow_recipient_radius: 2.0,
        }
    }
}

/// Viral infection and viral reproduction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InfectionConfig {
    /// Size removed from a victim per infecting contact
    pub damage: f32,

    /// Seconds an infector waits between two infections
    pub cooldown: f32,

    /// Victims at or below this size are converted
    pub conversion_threshold: f32,

    /// Reach of an infector, added to the victim's visual radius
    pub infection_radius: f32,

    /// How far a viral agent looks for victims
    pub seek_radius: f32,

    /// Wander distance when no victim is in range
    pub wander_radius: f32,

    /// Constant movement speed of viral agents
    pub move_speed: f32,

    /// Size at which a viral agent reproduces
    pub reproduction_size: f32,

    /// Seconds between two reproductions of the same agent
    pub reproduction_cooldown: f32,

    /// Infector growth per infection, as a fraction of `damage`
    pub growth_fraction: f32,

    /// Offset (world units, +x) of a reproduced viral clone
    pub clone_offset: f32,
}

impl Default for InfectionConfig {
    fn default() -> Self {
        Self {
            damage: 0.5,
            cooldown: 2.0,
            conversion_threshold: 0.5,
            infection_radius: 1.5,
            seek_radius: 8.0,
            wander_radius: 3.0,
            move_speed: 3.0,
            reproduction_size: 2.0,
            reproduction_cooldown: 10.0,
            growth_fraction: 0.5,
            clone_offset: 1.5,
        }
    }
}

/// Rival cell tactics and reproduction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RivalConfig {
    /// Food search radius for rivals
    pub aggression_radius: f32,

    /// Rivals run from threats closer than this
    pub flee_radius: f32,

    /// Size at which a rival splits in two
    pub reproduction_size: f32,

    /// Seconds between two rival reproductions
    pub reproduction_cooldown: f32,

    /// Offset (world units, +x) of a reproduced rival clone
    pub clone_offset: f32,
}

impl Default for RivalConfig {
    fn default() -> Self {
        Self {
            aggression_radius: 6.0,
            flee_radius: 4.0,
            reproduction_size: 2.5,
            reproduction_cooldown: 15.0,
            clone_offset: 1.5,
        }
    }
}

/// Autonomous foraging
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Nutrient search radius for autonomous non-rival cells
    pub nutrient_seek_radius: f32,

    /// A move target closer than this counts as reached
    pub arrival_distance: f32,

    /// Wander distance when nothing is in range
    pub wander_radius: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            nutrient_seek_radius: 5.0,
            arrival_distance: 0.5,
            wander_radius: 2.0,
        }
    }
}

/// Budget and placement for one spawner kind
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Spawns per second
    pub rate: f32,

    /// Radius of the disk (around the origin) spawns are placed in
    pub spawn_radius: f32,

    /// Maximum live entities of this kind
    pub cap: usize,

    /// Clearance from any player cell; 0 disables the check
    pub min_distance_from_player: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            spawn_radius: 10.0,
            cap: 10,
            min_distance_from_player: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnerSet {
    pub nutrient: SpawnerConfig,
    pub rival: SpawnerConfig,
    pub viral: SpawnerConfig,
}

impl Default for SpawnerSet {
    fn default() -> Self {
        Self {
            nutrient: SpawnerConfig {
                rate: 5.0,
                spawn_radius: 15.0,
                cap: 50,
                min_distance_from_player: 0.0,
            },
            rival: SpawnerConfig {
                rate: 0.1,
                spawn_radius: 15.0,
                cap: 5,
                min_distance_from_player: 8.0,
            },
            viral: SpawnerConfig {
                rate: 0.2,
                spawn_radius: 12.0,
                cap: 10,
                min_distance_from_player: 5.0,
            },
        }
    }
}

/// Selection and group command
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Move jitter radius per selected unit
    pub jitter_per_unit: f32,

    /// Drag-to-steer re-issues only after the target moved this far
    pub reissue_distance: f32,

    /// Speed of a group driven by directional input
    pub group_move_speed: f32,

    /// Velocity nudge toward the group centroid
    pub cohesion_strength: f32,

    /// Cohesion only applies beyond this distance from the centroid
    pub cohesion_threshold: f32,

    /// Axis values at or below this magnitude are ignored
    pub axis_dead_zone: f32,

    /// Deselected player cells return to autonomous foraging
    pub idle_player_cells_forage: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            jitter_per_unit: 0.5,
            reissue_distance: 0.1,
            group_move_speed: 4.0,
            cohesion_strength: 1.0,
            cohesion_threshold: 0.5,
            axis_dead_zone: 0.1,
            idle_player_cells_forage: true,
        }
    }
}

/// Revival after the last player cell is lost
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    /// Seconds between the wipe and the revival
    pub delay: f32,
    pub position: Vec2,
    /// Random offset radius around `position`
    pub radius: f32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            delay: 2.0,
            position: Vec2::ZERO,
            radius: 5.0,
        }
    }
}

/// Camera framing driven by the selected group
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraFramingConfig {
    pub base_zoom: f32,
    pub zoom_per_unit: f32,
    pub max_zoom: f32,
    pub spread_multiplier: f32,
    pub size_multiplier: f32,
    /// Fraction of the remaining distance covered per frame
    pub smooth_speed: f32,
}

impl Default for CameraFramingConfig {
    fn default() -> Self {
        Self {
            base_zoom: 5.0,
            zoom_per_unit: 1.0,
            max_zoom: 25.0,
            spread_multiplier: 2.0,
            size_multiplier: 1.5,
            smooth_speed: 0.125,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    ///
    /// A zero base speed is deliberately not rejected here: the growth
    /// ledger substitutes a fallback speed at runtime.
    pub fn validate(&self) -> Result<()> {
        if !(self.tick_seconds > 0.0) {
            return Err(ColonyError::InvalidConfig(format!(
                "tick_seconds ({}) must be positive",
                self.tick_seconds
            )));
        }

        if !(self.grid_cell_size > 0.0) {
            return Err(ColonyError::InvalidConfig(format!(
                "grid_cell_size ({}) must be positive",
                self.grid_cell_size
            )));
        }

        for (name, template) in [
            ("player", &self.templates.player),
            ("rival", &self.templates.rival),
            ("viral", &self.templates.viral),
        ] {
            if let Some(t) = template {
                if t.min_size <= 0.0 || t.min_size >= t.max_size {
                    return Err(ColonyError::InvalidConfig(format!(
                        "{} template: min_size ({}) must be in (0, max_size = {})",
                        name, t.min_size, t.max_size
                    )));
                }
                if t.start_size < t.min_size || t.start_size > t.max_size {
                    return Err(ColonyError::InvalidConfig(format!(
                        "{} template: start_size ({}) outside [{}, {}]",
                        name, t.start_size, t.min_size, t.max_size
                    )));
                }
            }
        }

        if self.eating.size_ratio < 1.0 {
            return Err(ColonyError::InvalidConfig(format!(
                "eating.size_ratio ({}) below 1.0 would let equal cells eat each other",
                self.eating.size_ratio
            )));
        }

        for (name, spawner) in [
            ("nutrient", &self.spawners.nutrient),
            ("rival", &self.spawners.rival),
            ("viral", &self.spawners.viral),
        ] {
            if spawner.rate < 0.0 || spawner.spawn_radius < 0.0 {
                return Err(ColonyError::InvalidConfig(format!(
                    "{} spawner: rate and spawn_radius must not be negative",
                    name
                )));
            }
        }

        if self.camera.base_zoom > self.camera.max_zoom {
            return Err(ColonyError::InvalidConfig(format!(
                "camera.base_zoom ({}) exceeds camera.max_zoom ({})",
                self.camera.base_zoom, self.camera.max_zoom
            )));
        }

        Ok(())
    }
}
