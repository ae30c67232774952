//! Population control
//!
//! Rate-limited, capacity-bounded spawners for nutrients, rival cells and
//! viral agents. Live counts always come from the registry, so a spawner
//! never needs to hear about deaths.

use crate::core::config::{SimulationConfig, SpawnerConfig, TemplateConfig};
use crate::core::types::{Faction, Vec2};
use crate::ecs::world::World;
use crate::spatial::sample_in_disk;
use rand::Rng;
use serde::Serialize;

/// Placement attempts before the last sample is used regardless
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpawnerKind {
    Nutrient,
    Rival,
    Viral,
}

impl SpawnerKind {
    pub const ALL: [SpawnerKind; 3] = [SpawnerKind::Nutrient, SpawnerKind::Rival, SpawnerKind::Viral];

    /// Live entities of this kind in the registry
    pub fn live_count(self, world: &World) -> usize {
        match self {
            SpawnerKind::Nutrient => world.nutrient_count(),
            SpawnerKind::Rival => world.count_faction(Faction::Rival),
            SpawnerKind::Viral => world.count_faction(Faction::Viral),
        }
    }

    fn has_template(self, templates: &TemplateConfig) -> bool {
        match self {
            SpawnerKind::Nutrient => templates.nutrient.is_some(),
            SpawnerKind::Rival => templates.rival.is_some(),
            SpawnerKind::Viral => templates.viral.is_some(),
        }
    }
}

/// Rate limit and cap for one spawner
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerBudget {
    /// Spawns per second
    pub rate: f32,
    pub cap: usize,
    /// Earliest time the next spawn may happen
    pub next_eligible_time: f32,
}

/// Where and what to spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: SpawnerKind,
    pub position: Vec2,
    /// False when every placement attempt was too close to a player cell
    pub clear: bool,
}

/// A single spawner
#[derive(Debug, Clone)]
pub struct Spawner {
    pub kind: SpawnerKind,
    pub budget: SpawnerBudget,
    spawn_radius: f32,
    min_distance_from_player: f32,
    warned_rate: bool,
}

impl Spawner {
    pub fn new(kind: SpawnerKind, config: &SpawnerConfig) -> Self {
        Self {
            kind,
            budget: SpawnerBudget {
                rate: config.rate,
                cap: config.cap,
                next_eligible_time: 0.0,
            },
            spawn_radius: config.spawn_radius,
            min_distance_from_player: config.min_distance_from_player,
            warned_rate: false,
        }
    }

    /// Fire if the spawner is due and below cap
    ///
    /// A non-positive rate never fires; it is reported once.
    pub fn try_tick<R: Rng + ?Sized>(&mut self, now: f32, world: &World, rng: &mut R) -> Option<SpawnRequest> {
        if !(self.budget.rate > 0.0) {
            if !self.warned_rate {
                tracing::warn!(kind = ?self.kind, rate = self.budget.rate, "Spawner rate is not positive, spawner disabled");
                self.warned_rate = true;
            }
            return None;
        }
        if now < self.budget.next_eligible_time {
            return None;
        }
        if self.kind.live_count(world) >= self.budget.cap {
            return None;
        }

        self.budget.next_eligible_time = now + 1.0 / self.budget.rate;
        let (position, clear) = self.place(world, rng);
        Some(SpawnRequest {
            kind: self.kind,
            position,
            clear,
        })
    }

    /// Uniform disk sample, resampled while too close to any player cell
    fn place<R: Rng + ?Sized>(&self, world: &World, rng: &mut R) -> (Vec2, bool) {
        let mut candidate = sample_in_disk(rng, self.spawn_radius);
        if self.min_distance_from_player <= 0.0 {
            return (candidate, true);
        }

        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            if is_clear_of_players(world, candidate, self.min_distance_from_player) {
                return (candidate, true);
            }
            if attempt < MAX_PLACEMENT_ATTEMPTS {
                candidate = sample_in_disk(rng, self.spawn_radius);
            }
        }
        tracing::debug!(kind = ?self.kind, ?candidate, "No clear placement found, spawning anyway");
        (candidate, false)
    }
}

/// Whether `position` is at least `clearance` from every player cell
pub fn is_clear_of_players(world: &World, position: Vec2, clearance: f32) -> bool {
    let clearance_sq = clearance * clearance;
    world
        .cells()
        .filter(|(_, c)| c.faction == Faction::Player)
        .all(|(_, c)| c.position.distance_squared(&position) >= clearance_sq)
}

/// All spawners, ticked together after each frame's interactions
#[derive(Debug, Clone)]
pub struct PopulationController {
    spawners: Vec<Spawner>,
    warned_missing: Vec<SpawnerKind>,
}

impl PopulationController {
    pub fn new(config: &SimulationConfig) -> Self {
        let spawners = SpawnerKind::ALL
            .iter()
            .map(|&kind| {
                let settings = match kind {
                    SpawnerKind::Nutrient => &config.spawners.nutrient,
                    SpawnerKind::Rival => &config.spawners.rival,
                    SpawnerKind::Viral => &config.spawners.viral,
                };
                Spawner::new(kind, settings)
            })
            .collect();

        Self {
            spawners,
            warned_missing: Vec::new(),
        }
    }

    pub fn spawner(&self, kind: SpawnerKind) -> Option<&Spawner> {
        self.spawners.iter().find(|s| s.kind == kind)
    }

    /// Tick every spawner and insert what they produce
    ///
    /// Runs outside any detection pass, so entities are inserted directly.
    /// Returns the requests that were carried out.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: f32,
        world: &mut World,
        templates: &TemplateConfig,
        rng: &mut R,
    ) -> Vec<SpawnRequest> {
        let mut spawned = Vec::new();

        for spawner in &mut self.spawners {
            if !spawner.kind.has_template(templates) {
                if !self.warned_missing.contains(&spawner.kind) {
                    tracing::warn!(kind = ?spawner.kind, "No template configured, spawner skipped");
                    self.warned_missing.push(spawner.kind);
                }
                continue;
            }

            let Some(request) = spawner.try_tick(now, world, rng) else {
                continue;
            };

            match (request.kind, templates) {
                (SpawnerKind::Nutrient, TemplateConfig { nutrient: Some(t), .. }) => {
                    world.spawn_nutrient(t.instantiate(request.position));
                }
                (SpawnerKind::Rival, TemplateConfig { rival: Some(t), .. })
                | (SpawnerKind::Viral, TemplateConfig { viral: Some(t), .. }) => {
                    world.spawn_from_template(t, request.position);
                    tracing::info!(kind = ?request.kind, position = ?request.position, "Spawned cell");
                }
                _ => continue,
            }
            spawned.push(request);
        }

        spawned
    }
}
