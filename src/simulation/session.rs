//! Simulation session - owns the world and every stateful collaborator

use crate::command::{CommandDispatcher, GroupSignals, InputFrame, ScreenProjection};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::ecs::world::World;
use crate::simulation::infection::ContactMemory;
use crate::simulation::population::PopulationController;
use crate::simulation::respawn::RespawnMonitor;
use crate::simulation::tick::{run_simulation_tick, PopulationCounts, SimulationEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

pub struct Simulation {
    pub config: SimulationConfig,
    pub world: World,
    pub dispatcher: CommandDispatcher,
    pub population: PopulationController,
    pub respawn: RespawnMonitor,
    pub contacts: ContactMemory,
    pub rng: ChaCha8Rng,
}

impl Simulation {
    /// Validate the config and set up an arena with one player cell
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::empty(config)?;
        let Simulation {
            config,
            world,
            respawn,
            rng,
            ..
        } = &mut sim;
        respawn.spawn_player(world, &config.respawn, &config.templates, rng);
        Ok(sim)
    }

    /// Validate the config and set up an arena with no entities
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(seed = config.seed, "Simulation created");

        Ok(Self {
            world: World::new(config.grid_cell_size),
            dispatcher: CommandDispatcher::new(config.selection.clone()),
            population: PopulationController::new(&config),
            respawn: RespawnMonitor::new(),
            contacts: ContactMemory::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        Self::new(SimulationConfig::load_from_toml(path)?)
    }

    /// Run one tick with the input gathered since the previous one
    pub fn step(&mut self, frame: &InputFrame, projection: &dyn ScreenProjection) -> Vec<SimulationEvent> {
        run_simulation_tick(self, frame, projection)
    }

    pub fn group_signals(&self) -> Option<GroupSignals> {
        self.dispatcher.selection.group_signals(&self.world)
    }

    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Faction;

    #[test]
    fn test_new_spawns_one_player_cell() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.world.count_faction(Faction::Player), 1);
        assert_eq!(sim.world.cell_count(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            tick_seconds: 0.0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_same_seed_same_arena() {
        let a = Simulation::new(SimulationConfig::default()).unwrap();
        let b = Simulation::new(SimulationConfig::default()).unwrap();
        let pa = a.world.cells().next().unwrap().1.position;
        let pb = b.world.cells().next().unwrap().1.position;
        assert_eq!(pa, pb);
    }
}
