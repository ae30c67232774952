pub mod cell;
pub mod nutrient;

pub use cell::{Cell, CellTemplate, InfectionState, Lifecycle};
pub use nutrient::{Nutrient, NutrientTemplate};
