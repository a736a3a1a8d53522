//! Math types and glam re-exports.
//!
//! We re-export the [glam](https://docs.rs/glam) types the engine uses so
//! users don't need to depend on it directly. Colors are plain RGB vectors in
//! `0.0..=1.0`.

pub use glam::{Vec2, Vec3};

/// An RGB color, each channel in `0.0..=1.0`.
pub type Color = Vec3;

pub const WHITE: Color = Vec3::ONE;
pub const BLACK: Color = Vec3::ZERO;

/// Unit vector at `angle` radians from +X.
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
