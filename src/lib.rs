//! Petri Colony - cell colony simulation core
//!
//! Growing, eating, dividing and infecting cells in a 2D arena, fed by
//! rate-limited spawners and steered by multi-unit selection commands.

pub mod command;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod render;
pub mod simulation;
pub mod spatial;
