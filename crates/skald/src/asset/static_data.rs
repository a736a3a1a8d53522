//! Shared gameplay defaults loaded once at startup.
//!
//! Bullet data describes every projectile the game fires; animation data maps
//! a sprite-sheet name to its grid and frame rate. The scene loader consults
//! both when hydrating `Bullet` and `Animation` components.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::read_json_file;
use crate::components::{
    Bullet, Collision, Movement, ObjectType, ParticleEmitter, Render, Text, Transform,
};
use crate::ecs::{Entity, World};
use crate::error::EngineResult;
use crate::math::{Color, Vec2};

/// Key bullet data is stored under.
pub const BULLET_KEY: &str = "Bullet";

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Xy {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

impl From<Xy> for Vec2 {
    fn from(v: Xy) -> Self {
        Vec2::new(v.x, v.y)
    }
}

// ── Bullet ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulletFile {
    #[serde(default)]
    scale: Xy,
    #[serde(rename = "textureID", default)]
    texture_id: Option<String>,
    #[serde(default)]
    color: [f32; 3],
    #[serde(default)]
    alpha: Option<f32>,
    #[serde(default)]
    movement: BulletMovement,
    #[serde(default)]
    text: BulletText,
    #[serde(default)]
    particle: Option<BulletParticle>,
    #[serde(default)]
    damage_multiplier: Option<i32>,
    #[serde(rename = "CollisionComponent", default)]
    collision: Option<BulletCollision>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulletMovement {
    #[serde(default)]
    base_velocity: Xy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulletText {
    #[serde(default)]
    font_name: Option<String>,
}

/// Missing keys fall back to the [`BulletData`] defaults one by one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BulletParticle {
    texture_name: Option<String>,
    life: Option<f32>,
    size: Option<f32>,
    color: Option<[f32; 3]>,
    emit_delay: Option<f32>,
    emission_rate: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BulletCollision {
    collision_scale_x: Option<f32>,
    collision_scale_y: Option<f32>,
}

/// Particles per emission, rounded to the nearest whole count.
fn emission_count(rate: f32) -> u32 {
    let rounded = rate.max(0.0).round();
    if rounded != rate {
        log::warn!("Bullet particle emissionRate {rate} rounded to {rounded}");
    }
    rounded as u32
}

/// Everything needed to spawn a projectile.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletData {
    pub scale: Vec2,
    pub texture: String,
    pub color: Color,
    pub alpha: f32,
    pub base_velocity: Vec2,
    pub font_name: String,
    pub particle_texture: String,
    pub particle_life: f32,
    pub particle_size: f32,
    pub particle_color: Color,
    pub emit_delay: f32,
    pub emission_rate: u32,
    pub damage_multiplier: i32,
    pub collision_scale: Vec2,
}

impl Default for BulletData {
    fn default() -> Self {
        Self {
            scale: Vec2::ZERO,
            texture: "noTexture".to_string(),
            color: Color::ZERO,
            alpha: 1.0,
            base_velocity: Vec2::ZERO,
            font_name: "noFont".to_string(),
            particle_texture: "noParticleTexture".to_string(),
            particle_life: 1.0,
            particle_size: 1.0,
            particle_color: Color::ZERO,
            emit_delay: 1.0,
            emission_rate: 1,
            damage_multiplier: 1,
            collision_scale: Vec2::new(10.0, 10.0),
        }
    }
}

impl From<BulletFile> for BulletData {
    fn from(f: BulletFile) -> Self {
        let d = BulletData::default();
        let p = f.particle.unwrap_or_default();
        let collision = f.collision.unwrap_or_default();
        Self {
            scale: f.scale.into(),
            texture: f.texture_id.unwrap_or(d.texture),
            color: Color::from(f.color),
            alpha: f.alpha.unwrap_or(d.alpha),
            base_velocity: f.movement.base_velocity.into(),
            font_name: f.text.font_name.unwrap_or(d.font_name),
            particle_texture: p.texture_name.unwrap_or(d.particle_texture),
            particle_life: p.life.unwrap_or(d.particle_life),
            particle_size: p.size.unwrap_or(d.particle_size),
            particle_color: p.color.map_or(d.particle_color, Color::from),
            emit_delay: p.emit_delay.unwrap_or(d.emit_delay),
            emission_rate: p.emission_rate.map_or(d.emission_rate, emission_count),
            damage_multiplier: f.damage_multiplier.unwrap_or(d.damage_multiplier),
            collision_scale: Vec2::new(
                collision.collision_scale_x.unwrap_or(d.collision_scale.x),
                collision.collision_scale_y.unwrap_or(d.collision_scale.y),
            ),
        }
    }
}

impl BulletData {
    /// Spawn a projectile at `position` homing on `target`, with a trailing
    /// particle emitter.
    pub fn spawn(&self, world: &mut World, position: Vec2, target: Entity) -> EngineResult<Entity> {
        let bullet = world.create_entity()?;
        world.set_entity_name(bullet, BULLET_KEY)?;
        world.add_component(
            bullet,
            Transform {
                position,
                scale: self.scale,
                rotation: 0.0,
                tag: BULLET_KEY.to_string(),
            },
        )?;
        world.add_tag(bullet, BULLET_KEY)?;
        world.add_component(
            bullet,
            Render {
                texture: self.texture.clone(),
                color: self.color,
                alpha: self.alpha,
                ..Render::default()
            },
        )?;
        world.add_component(
            bullet,
            Movement {
                velocity: self.base_velocity,
                base_velocity: self.base_velocity,
            },
        )?;
        world.add_component(
            bullet,
            Text {
                font_name: self.font_name.clone(),
                ..Text::default()
            },
        )?;
        world.add_component(
            bullet,
            Collision {
                kind: ObjectType::Bullet,
                scale: self.collision_scale,
                ..Collision::default()
            },
        )?;
        world.add_component(
            bullet,
            Bullet {
                target_id: target.id(),
                damage_multiplier: self.damage_multiplier,
            },
        )?;
        world.add_component(
            bullet,
            ParticleEmitter {
                texture: self.particle_texture.clone(),
                life: self.particle_life,
                size: self.particle_size,
                color: self.particle_color,
                emit_delay: self.emit_delay,
                emission_rate: self.emission_rate,
                ..ParticleEmitter::default()
            },
        )?;
        Ok(bullet)
    }
}

// ── Animation ────────────────────────────────────────────────────────────

/// Sprite-sheet grid and playback rate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationData {
    pub rows: u32,
    pub cols: u32,
    pub animation_speed: f32,
}

#[derive(Deserialize)]
struct AnimationEntry {
    name: String,
    #[serde(flatten)]
    data: AnimationData,
}

// ── Store ────────────────────────────────────────────────────────────────

/// Name-keyed bullet and animation defaults.
#[derive(Debug, Default)]
pub struct StaticData {
    bullets: HashMap<String, BulletData>,
    animations: HashMap<String, AnimationData>,
}

impl StaticData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `{"Bullet": {...}}` and store it under [`BULLET_KEY`].
    pub fn load_bullets(&mut self, path: impl AsRef<Path>) -> EngineResult<()> {
        let value: serde_json::Value = read_json_file(path.as_ref())?;
        self.load_bullets_from_value(value)
    }

    pub fn load_bullets_from_value(&mut self, mut value: serde_json::Value) -> EngineResult<()> {
        let Some(entry) = value.get_mut(BULLET_KEY).map(serde_json::Value::take) else {
            log::warn!("Bullet data has no \"{BULLET_KEY}\" object; keeping defaults");
            return Ok(());
        };
        let file: BulletFile = serde_json::from_value(entry)?;
        self.bullets.insert(BULLET_KEY.to_string(), file.into());
        Ok(())
    }

    /// Read `{"animations": [{name, rows, cols, animationSpeed}, ...]}`.
    /// Entries missing a field are skipped with a warning.
    pub fn load_animations(&mut self, path: impl AsRef<Path>) -> EngineResult<()> {
        let value: serde_json::Value = read_json_file(path.as_ref())?;
        self.load_animations_from_value(&value)
    }

    pub fn load_animations_from_value(&mut self, value: &serde_json::Value) -> EngineResult<()> {
        let Some(list) = value.get("animations").and_then(|v| v.as_array()) else {
            log::warn!("Animation data has no \"animations\" array");
            return Ok(());
        };
        for item in list {
            match AnimationEntry::deserialize(item) {
                Ok(entry) => {
                    self.animations.insert(entry.name, entry.data);
                }
                Err(e) => log::warn!("Skipping animation entry: {e}"),
            }
        }
        Ok(())
    }

    pub fn store_bullet(&mut self, name: &str, data: BulletData) {
        self.bullets.insert(name.to_string(), data);
    }

    pub fn bullet(&self, name: &str) -> Option<&BulletData> {
        self.bullets.get(name)
    }

    pub fn store_animation(&mut self, name: &str, data: AnimationData) {
        self.animations.insert(name.to_string(), data);
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationData> {
        self.animations.get(name)
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bullet_data_reads_nested_fields() {
        let mut data = StaticData::new();
        data.load_bullets_from_value(json!({
            "Bullet": {
                "scale": {"x": 12.0, "y": 6.0},
                "textureID": "bullet",
                "color": [1.0, 0.5, 0.0],
                "alpha": 0.8,
                "movement": {"baseVelocity": {"x": 300.0, "y": 0.0}},
                "text": {"fontName": "mono"},
                "particle": {
                    "textureName": "spark", "life": 0.4, "size": 8.0,
                    "color": [1.0, 1.0, 0.0], "emitDelay": 0.0, "emissionRate": 3
                },
                "damageMultiplier": 2,
                "CollisionComponent": {"collisionScaleX": 4.0, "collisionScaleY": 4.0}
            }
        }))
        .unwrap();

        let b = data.bullet(BULLET_KEY).unwrap();
        assert_eq!(b.scale, Vec2::new(12.0, 6.0));
        assert_eq!(b.base_velocity, Vec2::new(300.0, 0.0));
        assert_eq!(b.particle_texture, "spark");
        assert_eq!(b.emission_rate, 3);
        assert_eq!(b.damage_multiplier, 2);
        assert_eq!(b.collision_scale, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn partial_particle_and_collision_objects_fill_in_defaults() {
        let mut data = StaticData::new();
        data.load_bullets_from_value(json!({
            "Bullet": {
                "particle": {"textureName": "spark", "emissionRate": 2.6},
                "CollisionComponent": {"collisionScaleY": 3.0}
            }
        }))
        .unwrap();

        let b = data.bullet(BULLET_KEY).unwrap();
        let d = BulletData::default();
        assert_eq!(b.particle_texture, "spark");
        assert_eq!(b.particle_life, d.particle_life);
        assert_eq!(b.particle_size, d.particle_size);
        assert_eq!(b.emit_delay, d.emit_delay);
        assert_eq!(b.emission_rate, 3);
        assert_eq!(b.collision_scale, Vec2::new(d.collision_scale.x, 3.0));
    }

    #[test]
    fn missing_bullet_object_keeps_defaults() {
        let mut data = StaticData::new();
        data.load_bullets_from_value(json!({"Other": {}})).unwrap();
        assert!(data.bullet(BULLET_KEY).is_none());
    }

    #[test]
    fn animations_skip_incomplete_entries() {
        let mut data = StaticData::new();
        data.load_animations_from_value(&json!({
            "animations": [
                {"name": "Boss", "rows": 2, "cols": 4, "animationSpeed": 0.2},
                {"name": "Broken", "rows": 2}
            ]
        }))
        .unwrap();
        assert_eq!(data.animation_count(), 1);
        assert_eq!(
            data.animation("Boss"),
            Some(&AnimationData { rows: 2, cols: 4, animation_speed: 0.2 })
        );
    }
}
