//! Player-wipe monitor
//!
//! Watches the registry's player count. When it drops to zero a revival is
//! scheduled; at the due time a fresh player cell appears near the respawn
//! point unless the player recovered in the meantime.

use crate::core::config::{RespawnConfig, TemplateConfig};
use crate::core::types::{EntityId, Faction};
use crate::ecs::world::World;
use crate::simulation::tick::SimulationEvent;
use crate::spatial::sample_in_disk;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RespawnState {
    Idle,
    Pending { due: f32 },
}

#[derive(Debug, Clone)]
pub struct RespawnMonitor {
    pub state: RespawnState,
    warned_missing: bool,
}

impl Default for RespawnMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl RespawnMonitor {
    pub fn new() -> Self {
        Self {
            state: RespawnState::Idle,
            warned_missing: false,
        }
    }

    /// Check the player count and revive when due
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: f32,
        world: &mut World,
        rules: &RespawnConfig,
        templates: &TemplateConfig,
        rng: &mut R,
        events: &mut Vec<SimulationEvent>,
    ) {
        let players = world.count_faction(Faction::Player);

        match self.state {
            RespawnState::Idle if players == 0 => {
                let due = now + rules.delay;
                tracing::info!(due, "All player cells lost, respawn scheduled");
                self.state = RespawnState::Pending { due };
                events.push(SimulationEvent::PlayerWiped { respawn_at: due });
            }
            RespawnState::Pending { due } if now >= due => {
                self.state = RespawnState::Idle;
                // The player may have recovered while waiting
                if players == 0 {
                    if let Some(id) = self.spawn_player(world, rules, templates, rng) {
                        events.push(SimulationEvent::PlayerRespawned { cell: id });
                    }
                }
            }
            _ => {}
        }
    }

    /// Place a player cell near the respawn point
    ///
    /// Returns None (warning once) when no player template is configured.
    pub fn spawn_player<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        rules: &RespawnConfig,
        templates: &TemplateConfig,
        rng: &mut R,
    ) -> Option<EntityId> {
        let template = match templates.cell(Faction::Player) {
            Ok(template) => template,
            Err(error) => {
                if !self.warned_missing {
                    tracing::warn!(%error, "Cannot respawn");
                    self.warned_missing = true;
                }
                return None;
            }
        };

        let position = rules.position + sample_in_disk(rng, rules.radius);
        let id = world.spawn_from_template(template, position);
        tracing::info!(?position, "Player cell spawned");
        Some(id)
    }
}
