//! Emission-shape velocity generators.
//!
//! Each [`EmissionShape`] maps to a distribution of initial velocities:
//!
//! | Shape      | Direction            | Magnitude                          |
//! |------------|----------------------|------------------------------------|
//! | Circle     | uniform angle        | [`SPEED`]                          |
//! | Radial     | uniform angle        | [`RADIAL_SPEED`]                   |
//! | Explosion  | uniform angle        | [`BURST_SPEED`]                    |
//! | Random     | uniform angle        | uniform in `[0, SPEED)`            |
//! | Box        | uniform square       | half-extent [`BOX_HALF_EXTENT`]    |
//! | Ellipse    | uniform angle        | stretched 1.5× on X                |
//! | Line       | +X                   | 50 plus up to 10 jitter            |
//! | Spiral     | uniform angle        | `(r + 5) * SPEED`, `r` in `[0, 50)` |
//! | Wave       | uniform angle        | Y modulated by `10 sin(2θ)`        |
//! | Cone       | uniform angle        | scaled by `cos(u * 30°)`           |

use std::f32::consts::TAU;

use rand::Rng;

use crate::components::EmissionShape;
use crate::math::{Vec2, direction};

pub const SPEED: f32 = 100.0;
pub const RADIAL_SPEED: f32 = 200.0;
pub const BURST_SPEED: f32 = 500.0;
pub const BOX_HALF_EXTENT: f32 = 50.0;
const ELLIPSE_STRETCH: f32 = 1.5;
const LINE_SPEED: f32 = 50.0;
const LINE_JITTER: f32 = 10.0;
const SPIRAL_MAX_RADIUS: f32 = 50.0;
const SPIRAL_GROWTH: f32 = 5.0;
const WAVE_FREQUENCY: f32 = 2.0;
const WAVE_AMPLITUDE: f32 = 10.0;
const CONE_HALF_ANGLE: f32 = 30.0 * (std::f32::consts::PI / 180.0);

/// Draw an initial velocity for a particle emitted with `shape`.
pub fn random_velocity<R: Rng + ?Sized>(shape: EmissionShape, rng: &mut R) -> Vec2 {
    match shape {
        EmissionShape::Circle => direction(rng.gen_range(0.0..TAU)) * SPEED,
        EmissionShape::Radial => direction(rng.gen_range(0.0..TAU)) * RADIAL_SPEED,
        EmissionShape::Explosion => direction(rng.gen_range(0.0..TAU)) * BURST_SPEED,
        EmissionShape::Random => {
            let angle = rng.gen_range(0.0..TAU);
            direction(angle) * rng.gen_range(0.0..SPEED)
        }
        EmissionShape::Box => Vec2::new(
            rng.gen_range(-1.0..=1.0) * BOX_HALF_EXTENT,
            rng.gen_range(-1.0..=1.0) * BOX_HALF_EXTENT,
        ),
        EmissionShape::Ellipse => {
            let d = direction(rng.gen_range(0.0..TAU));
            Vec2::new(d.x * ELLIPSE_STRETCH, d.y) * SPEED
        }
        EmissionShape::Line => Vec2::X * (LINE_SPEED + rng.gen_range(0.0..=LINE_JITTER)),
        EmissionShape::Spiral => {
            let angle = rng.gen_range(0.0..TAU);
            let radius = rng.gen_range(0.0..SPIRAL_MAX_RADIUS);
            direction(angle) * (radius + SPIRAL_GROWTH) * SPEED
        }
        EmissionShape::Wave => {
            let angle = rng.gen_range(0.0..TAU);
            let wave = WAVE_AMPLITUDE * (WAVE_FREQUENCY * angle).sin();
            Vec2::new(angle.cos(), angle.sin() * wave) * SPEED
        }
        EmissionShape::Cone => {
            let angle = rng.gen_range(0.0..TAU);
            let factor = (CONE_HALF_ANGLE * rng.gen_range(0.0..=1.0f32)).cos();
            direction(angle) * factor * SPEED
        }
    }
}
