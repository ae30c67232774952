//! Cell lifecycle and interaction engine

pub mod behavior;
pub mod eating;
pub mod growth;
pub mod infection;
pub mod movement;
pub mod population;
pub mod reproduction;
pub mod respawn;
pub mod session;
pub mod tick;

pub use growth::{apply_growth, apply_nutrition, speed_for_size, GrowthOutcome};
pub use population::{PopulationController, SpawnRequest, Spawner, SpawnerKind};
pub use session::Simulation;
pub use tick::{run_simulation_tick, PopulationCounts, SimulationEvent};
