//! Entity registry

pub mod world;

pub use world::{AppliedChanges, World};
