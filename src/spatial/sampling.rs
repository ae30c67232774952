//! Random placement helpers

use crate::core::types::Vec2;
use rand::Rng;

/// Uniform point inside a disk of `radius` centred on the origin
///
/// Uses `r = R * sqrt(u)` so points are not bunched toward the centre.
pub fn sample_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    Vec2::new(r * theta.cos(), r * theta.sin())
}
