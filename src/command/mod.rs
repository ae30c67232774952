//! Selection and command dispatch
//!
//! Pointer and keyboard input arrives as `InputEvent`s batched per tick:
//! InputFrame -> CommandDispatcher -> SelectionSet + move intents on cells

pub mod dispatch;
pub mod selection;

pub use dispatch::{CommandDispatcher, ScreenProjection};
pub use selection::{GroupSignals, SelectionSet};

use serde::{Deserialize, Serialize};

/// Screen-space point in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One discrete input from the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Select press; `additive` is the modifier key
    PointerDown { at: ScreenPoint, additive: bool },
    PointerDrag { at: ScreenPoint },
    PointerUp { at: ScreenPoint },
    /// Move-command press
    CommandDown { at: ScreenPoint },
    CommandDrag { at: ScreenPoint },
    CommandUp,
    /// Directional input, each component in [-1, 1]; held until replaced
    Axis { x: f32, y: f32 },
    Divide,
    SelectAll,
}

/// Input collected since the previous tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
