//! Camera for 2D viewing
//!
//! Handles viewport positioning, zoom, coordinate transforms and framing
//! of the selected group.

use crate::command::{GroupSignals, ScreenPoint, ScreenProjection};
use crate::core::config::CameraFramingConfig;
use crate::core::types::Vec2;

/// Scale factor: 1 simulation unit = PIXELS_PER_UNIT pixels at zoom 1.0
pub const PIXELS_PER_UNIT: f32 = 4.0;

/// Camera configuration
#[derive(Debug, Clone)]
pub struct Camera {
    /// Center position in world coordinates
    pub position: Vec2,
    /// Zoom level (1.0 = normal, 2.0 = 2x magnification)
    pub zoom: f32,
    /// Viewport size in pixels
    pub viewport_size: (f32, f32),
}

impl Camera {
    /// Create a new camera centered at origin
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport_size: (viewport_width, viewport_height),
        }
    }

    /// Adjust zoom level, clamped to [0.1, 10.0]
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom * (1.0 + delta)).clamp(0.1, 10.0);
    }

    /// Half the visible world height
    pub fn view_half_height(&self) -> f32 {
        self.viewport_size.1 / (2.0 * self.zoom * PIXELS_PER_UNIT)
    }

    /// Zoom so that `half_height` world units fit above and below the centre
    pub fn set_view_half_height(&mut self, half_height: f32) {
        if half_height > 0.0 && self.viewport_size.1 > 0.0 {
            self.zoom = self.viewport_size.1 / (2.0 * half_height * PIXELS_PER_UNIT);
        }
    }
}

impl ScreenProjection for Camera {
    fn world_to_screen(&self, world_pos: Vec2) -> ScreenPoint {
        let relative = world_pos - self.position;
        let scale = self.zoom * PIXELS_PER_UNIT;
        ScreenPoint::new(
            relative.x * scale + self.viewport_size.0 / 2.0,
            relative.y * scale + self.viewport_size.1 / 2.0,
        )
    }

    fn screen_to_world(&self, point: ScreenPoint) -> Vec2 {
        let scale = self.zoom * PIXELS_PER_UNIT;
        Vec2::new(
            (point.x - self.viewport_size.0 / 2.0) / scale + self.position.x,
            (point.y - self.viewport_size.1 / 2.0) / scale + self.position.y,
        )
    }
}

/// Keeps the selected group centred and in view
#[derive(Debug, Clone)]
pub struct CameraFraming {
    pub config: CameraFramingConfig,
}

impl CameraFraming {
    pub fn new(config: CameraFramingConfig) -> Self {
        Self { config }
    }

    /// Visible half-height wanted for a group, growing with its count,
    /// spread and average cell size
    pub fn desired_view(&self, group: &GroupSignals) -> f32 {
        let c = &self.config;
        let raw = c.base_zoom
            + group.count as f32 * c.zoom_per_unit
            + group.spread * c.spread_multiplier
            + group.average_size * c.size_multiplier;
        raw.clamp(c.base_zoom, c.max_zoom)
    }

    /// Move one frame toward the group; no-op without a selection
    pub fn follow(&self, camera: &mut Camera, group: Option<&GroupSignals>) {
        let Some(group) = group else {
            return;
        };
        let t = self.config.smooth_speed;
        camera.position = camera.position.lerp(group.centroid, t);

        let current = camera.view_half_height();
        let desired = self.desired_view(group);
        camera.set_view_half_height(current + (desired - current) * t.clamp(0.0, 1.0));
    }
}
