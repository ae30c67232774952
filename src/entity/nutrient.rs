//! Nutrients - passive food pellets

use crate::core::types::Vec2;
use serde::{Deserialize, Serialize};

/// A nutrient pellet; destroyed once, when eaten
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nutrient {
    pub position: Vec2,
    pub nutrition_value: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientTemplate {
    pub nutrition_value: f32,
}

impl Default for NutrientTemplate {
    fn default() -> Self {
        Self { nutrition_value: 1.0 }
    }
}

impl NutrientTemplate {
    pub fn instantiate(&self, position: Vec2) -> Nutrient {
        Nutrient {
            position,
            nutrition_value: self.nutrition_value,
        }
    }
}
