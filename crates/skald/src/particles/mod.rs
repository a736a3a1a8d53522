//! # Particle Simulation
//!
//! A fixed pool of particle slots, filled by emitter entities and drained by
//! expiry. The pool never grows: when every slot is live, further emission is
//! silently dropped.
//!
//! ```text
//! ParticleSystem (World resource)
//!   slots[0..capacity] ── Particle { active, position, velocity, life, ... }
//!   rng               ── StdRng feeding shape::random_velocity
//!
//! ParticleUpdate (System, requires ParticleEmitter)
//!   1. extract ParticleSystem from the world
//!   2. emit for each matched entity that meets the trigger rule
//!   3. integrate every active slot, expire those with life <= 0
//!   4. reinsert ParticleSystem
//! ```
//!
//! ## Trigger Rule
//!
//! A matched entity emits on a tick when:
//! - its [`Collision`] type is `Bullet` (bullet trails), or
//! - its [`Enemy`] type is Boss, Minion or Poison and its health is at or
//!   below zero (death bursts), or
//! - [`ParticleSystem::set_emit`] was raised since the last tick (one-shot).
//!
//! ## Emission Timer
//!
//! `emit_timer` accumulates every emission attempt and is never reset, so
//! once it passes `emit_delay` the emitter fires on every subsequent tick.
//! `emit_delay` is therefore a start delay, not an interval.

pub mod shape;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::components::{Collision, Enemy, EnemyType, ObjectType, ParticleEmitter, Transform};
use crate::config::DEFAULT_MAX_PARTICLES;
use crate::ecs::{Entity, System, World};
use crate::error::EngineResult;
use crate::math::{Color, Vec2, WHITE};
use crate::state::EngineState;

pub use shape::random_velocity;

/// Texture used for floating damage digits.
pub const DAMAGE_TEXTURE: &str = "fire";
const DAMAGE_DIGIT_SPACING: f32 = 20.0;
const DAMAGE_VELOCITY: Vec2 = Vec2::new(0.0, -50.0);
const DAMAGE_LIFE: f32 = 2.0;
const DAMAGE_SIZE: f32 = 50.0;
/// Life at which a particle is drawn fully opaque.
const FULL_ALPHA_LIFE: f32 = 5.0;

/// One pooled particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Color,
    pub size: f32,
    /// Remaining life in seconds.
    pub life: f32,
    pub active: bool,
    pub texture: String,
}

impl Particle {
    /// Draw opacity. Fades linearly as life runs out; values above one mean
    /// fully opaque.
    pub fn alpha(&self) -> f32 {
        self.life / FULL_ALPHA_LIFE
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: WHITE,
            size: 1.0,
            life: 0.0,
            active: false,
            texture: String::new(),
        }
    }
}

/// Counters for the current pool state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    pub active: usize,
    pub capacity: usize,
    /// Particles spawned since the last tick.
    pub spawned: usize,
    /// Spawns dropped because the pool was full, since the last tick.
    pub dropped: usize,
}

/// Fixed-capacity particle pool and the emission logic that fills it.
pub struct ParticleSystem {
    slots: Vec<Particle>,
    rng: StdRng,
    force_emit: bool,
    spawned: usize,
    dropped: usize,
}

impl ParticleSystem {
    /// A pool of [`DEFAULT_MAX_PARTICLES`] inactive slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_PARTICLES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    pub fn with_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            rng,
            force_emit: false,
            spawned: 0,
            dropped: 0,
        }
    }

    /// Insert `self` as a world resource and register the
    /// [`ParticleUpdate`] system over every entity with a
    /// [`ParticleEmitter`].
    pub fn install(self, world: &mut World) -> EngineResult<usize> {
        world.register_component::<ParticleEmitter>()?;
        let signature = world.signature_for::<(ParticleEmitter,)>()?;
        world.insert_resource(self);
        Ok(world.add_system("ParticleSystem", signature, ParticleUpdate))
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    /// Live particles, in slot order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }

    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            active: self.active_count(),
            capacity: self.capacity(),
            spawned: self.spawned,
            dropped: self.dropped,
        }
    }

    /// Make every matched entity emit on the next tick, regardless of the
    /// trigger rule. Any emitter qualifies, whatever its entity is named. The
    /// flag clears after that one tick, so a second burst needs another call.
    pub fn set_emit(&mut self, emit: bool) {
        self.force_emit = emit;
    }

    /// Accumulate `dt` on the entity's emitter timer and, once past the
    /// delay, spawn `emission_rate` particles at the entity's position.
    /// Entities without both a [`ParticleEmitter`] and a [`Transform`] are
    /// ignored. Returns the number of particles spawned.
    pub fn emit(&mut self, world: &mut World, entity: Entity, dt: f32) -> usize {
        let Some(origin) = world.get::<Transform>(entity).map(|t| t.position) else {
            return 0;
        };
        let Some(emitter) = world.get_mut::<ParticleEmitter>(entity) else {
            return 0;
        };

        emitter.emit_timer += dt;
        if emitter.emit_timer < emitter.emit_delay {
            return 0;
        }

        let mut spawned = 0;
        for _ in 0..emitter.emission_rate {
            let velocity = random_velocity(emitter.shape, &mut self.rng);
            let Some(slot) = self.inactive_slot() else {
                self.dropped += (emitter.emission_rate as usize) - spawned;
                break;
            };
            *slot = Particle {
                position: origin,
                velocity,
                color: emitter.color,
                size: emitter.size,
                life: emitter.life,
                active: true,
                texture: emitter.texture.clone(),
            };
            spawned += 1;
        }
        self.spawned += spawned;
        spawned
    }

    /// Spawn one rising digit particle per character of `damage` at the
    /// entity's position. Returns the number spawned.
    pub fn emit_damage_number(&mut self, world: &World, entity: Entity, damage: i32) -> usize {
        let Some(origin) = world.get::<Transform>(entity).map(|t| t.position) else {
            return 0;
        };

        let mut spawned = 0;
        for (i, _) in damage.to_string().chars().enumerate() {
            let Some(slot) = self.inactive_slot() else {
                self.dropped += 1;
                continue;
            };
            *slot = Particle {
                position: origin + Vec2::new(i as f32 * DAMAGE_DIGIT_SPACING, 0.0),
                velocity: DAMAGE_VELOCITY,
                color: WHITE,
                size: DAMAGE_SIZE,
                life: DAMAGE_LIFE,
                active: true,
                texture: DAMAGE_TEXTURE.to_string(),
            };
            spawned += 1;
        }
        self.spawned += spawned;
        spawned
    }

    /// Retexture the entity's emitter and reinitialize the whole pool from
    /// it. Every slot ends up inactive, not just the ones this entity
    /// spawned.
    pub fn reset_particles(&mut self, world: &mut World, entity: Entity, texture: &str) {
        let Some(emitter) = world.get_mut::<ParticleEmitter>(entity) else {
            return;
        };
        emitter.texture = texture.to_string();
        let template = Particle {
            position: emitter.position,
            velocity: emitter.velocity,
            color: emitter.color,
            size: emitter.size,
            life: emitter.life,
            active: false,
            texture: texture.to_string(),
        };
        self.slots.fill(template);
        log::debug!("Particle pool reset to texture '{texture}'");
    }

    /// Advance every live particle by `dt` and expire the spent ones.
    pub fn integrate(&mut self, dt: f32) {
        for p in self.slots.iter_mut().filter(|p| p.active) {
            p.position += p.velocity * dt;
            p.life -= dt;
            if p.life <= 0.0 {
                p.active = false;
            }
        }
    }

    /// One full tick: trigger emission on `entities`, then integrate. Does
    /// nothing while the engine is paused or in edit mode.
    pub fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        if world
            .get_resource::<EngineState>()
            .is_some_and(|state| !state.is_running())
        {
            return;
        }

        self.spawned = 0;
        self.dropped = 0;
        let forced = std::mem::take(&mut self.force_emit);
        for &entity in entities {
            if forced || should_emit(world, entity) {
                self.emit(world, entity, dt);
            }
        }
        self.integrate(dt);
    }

    /// First inactive slot in pool order.
    fn inactive_slot(&mut self) -> Option<&mut Particle> {
        self.slots.iter_mut().find(|p| !p.active)
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Does `entity` meet the automatic trigger rule?
pub fn should_emit(world: &World, entity: Entity) -> bool {
    let bullet = world
        .get::<Collision>(entity)
        .is_some_and(|c| c.kind == ObjectType::Bullet);
    let dead_enemy = world.get::<Enemy>(entity).is_some_and(|e| {
        matches!(e.kind, EnemyType::Boss | EnemyType::Minion | EnemyType::Poison) && e.health <= 0.0
    });
    bullet || dead_enemy
}

/// Dispatcher entry for the [`ParticleSystem`] resource.
pub struct ParticleUpdate;

impl System for ParticleUpdate {
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        let Some(mut particles) = world.resource_remove::<ParticleSystem>() else {
            log::warn!("ParticleUpdate ran without a ParticleSystem resource");
            return;
        };
        particles.update(world, entities, dt);
        world.insert_resource(particles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{self, EmissionShape};
    use crate::state::Mode;

    fn setup(capacity: usize) -> World {
        let mut world = World::new();
        components::register_all(&mut world).unwrap();
        ParticleSystem::with_rng(capacity, StdRng::seed_from_u64(1))
            .install(&mut world)
            .unwrap();
        world
    }

    fn emitter_entity(world: &mut World, rate: u32, delay: f32) -> Entity {
        let e = world.create_entity().unwrap();
        world.add_component(e, Transform::from_xy(3.0, 4.0)).unwrap();
        world
            .add_component(
                e,
                ParticleEmitter {
                    emission_rate: rate,
                    emit_delay: delay,
                    life: 1.0,
                    texture: "spark".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        e
    }

    fn bullet(world: &mut World, e: Entity) {
        world
            .add_component(
                e,
                Collision {
                    kind: ObjectType::Bullet,
                    ..Default::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn pool_starts_inactive() {
        let ps = ParticleSystem::with_capacity(16);
        assert_eq!(ps.capacity(), 16);
        assert_eq!(ps.active_count(), 0);
        assert_eq!(ParticleSystem::new().capacity(), DEFAULT_MAX_PARTICLES);
    }

    #[test]
    fn emit_copies_emitter_values() {
        let mut world = setup(8);
        let e = emitter_entity(&mut world, 3, 0.0);
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();

        assert_eq!(ps.emit(&mut world, e, 0.1), 3);
        for p in ps.particles() {
            assert_eq!(p.position, Vec2::new(3.0, 4.0));
            assert_eq!(p.texture, "spark");
            assert_eq!(p.life, 1.0);
            assert!((p.velocity.length() - shape::SPEED).abs() < 1e-3);
        }
    }

    #[test]
    fn emit_needs_transform_and_emitter() {
        let mut world = setup(8);
        let e = world.create_entity().unwrap();
        world.add_component(e, ParticleEmitter::default()).unwrap();
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();
        assert_eq!(ps.emit(&mut world, e, 1.0), 0);
        assert_eq!(world.get::<ParticleEmitter>(e).unwrap().emit_timer, 0.0);
    }

    #[test]
    fn full_pool_drops_silently() {
        let mut world = setup(4);
        let e = emitter_entity(&mut world, 3, 0.0);
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();

        assert_eq!(ps.emit(&mut world, e, 0.0), 3);
        assert_eq!(ps.emit(&mut world, e, 0.0), 1);
        assert_eq!(ps.emit(&mut world, e, 0.0), 0);
        assert_eq!(ps.active_count(), 4);
        assert_eq!(ps.stats().dropped, 5);
    }

    #[test]
    fn timer_delays_then_fires_every_tick() {
        let mut world = setup(100);
        let e = emitter_entity(&mut world, 1, 0.25);
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();

        assert_eq!(ps.emit(&mut world, e, 0.1), 0);
        assert_eq!(ps.emit(&mut world, e, 0.1), 0);
        assert_eq!(ps.emit(&mut world, e, 0.1), 1);
        // Timer keeps growing, so every later call fires too.
        assert_eq!(ps.emit(&mut world, e, 0.1), 1);
        assert_eq!(ps.emit(&mut world, e, 0.0), 1);
        assert!(world.get::<ParticleEmitter>(e).unwrap().emit_timer > 0.25);
    }

    #[test]
    fn integrate_moves_and_expires() {
        let mut ps = ParticleSystem::with_rng(2, StdRng::seed_from_u64(0));
        ps.slots[0] = Particle {
            velocity: Vec2::new(10.0, 0.0),
            life: 0.5,
            active: true,
            ..Default::default()
        };
        ps.integrate(0.2);
        assert!((ps.slots[0].position.x - 2.0).abs() < 1e-5);
        assert!(ps.slots[0].active);
        ps.integrate(0.3);
        assert!(!ps.slots[0].active);
    }

    #[test]
    fn expired_slots_are_reused() {
        let mut world = setup(1);
        let e = emitter_entity(&mut world, 1, 0.0);
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();
        assert_eq!(ps.emit(&mut world, e, 0.0), 1);
        ps.integrate(2.0);
        assert_eq!(ps.emit(&mut world, e, 0.0), 1);
    }

    #[test]
    fn bullets_trail_through_dispatch() {
        let mut world = setup(50);
        let e = emitter_entity(&mut world, 2, 0.0);
        bullet(&mut world, e);
        let idle = emitter_entity(&mut world, 2, 0.0);

        world.update(0.016);
        let ps = world.resource::<ParticleSystem>();
        assert_eq!(ps.active_count(), 2);
        assert_eq!(world.get::<ParticleEmitter>(idle).unwrap().emit_timer, 0.0);
    }

    #[test]
    fn dead_enemies_burst() {
        let mut world = setup(50);
        let alive = emitter_entity(&mut world, 1, 0.0);
        world.add_component(alive, Enemy::new(EnemyType::Boss, 10.0)).unwrap();
        let dead = emitter_entity(&mut world, 1, 0.0);
        world.add_component(dead, Enemy::new(EnemyType::Minion, 0.0)).unwrap();
        let spawner = emitter_entity(&mut world, 1, 0.0);
        world.add_component(spawner, Enemy::new(EnemyType::Spawner, 0.0)).unwrap();

        assert!(!should_emit(&world, alive));
        assert!(should_emit(&world, dead));
        assert!(!should_emit(&world, spawner));

        world.update(0.016);
        assert_eq!(world.resource::<ParticleSystem>().active_count(), 1);
    }

    #[test]
    fn set_emit_is_one_shot() {
        let mut world = setup(50);
        emitter_entity(&mut world, 1, 0.0);
        emitter_entity(&mut world, 1, 0.0);

        world.resource_mut::<ParticleSystem>().set_emit(true);
        world.update(0.01);
        assert_eq!(world.resource::<ParticleSystem>().active_count(), 2);
        world.update(0.01);
        assert_eq!(world.resource::<ParticleSystem>().stats().spawned, 0);
    }

    #[test]
    fn paused_or_editing_is_a_no_op() {
        let mut world = setup(50);
        let e = emitter_entity(&mut world, 1, 0.0);
        bullet(&mut world, e);

        world.insert_resource(EngineState {
            paused: true,
            ..Default::default()
        });
        world.update(0.1);
        assert_eq!(world.resource::<ParticleSystem>().active_count(), 0);

        world.insert_resource(EngineState {
            mode: Mode::Edit,
            ..Default::default()
        });
        world.update(0.1);
        assert_eq!(world.resource::<ParticleSystem>().active_count(), 0);
        assert_eq!(world.get::<ParticleEmitter>(e).unwrap().emit_timer, 0.0);
    }

    #[test]
    fn damage_number_spawns_one_per_digit() {
        let mut world = setup(10);
        let e = world.create_entity().unwrap();
        world.add_component(e, Transform::from_xy(100.0, 50.0)).unwrap();
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();

        assert_eq!(ps.emit_damage_number(&world, e, 125), 3);
        let xs: Vec<f32> = ps.particles().map(|p| p.position.x).collect();
        assert_eq!(xs, [100.0, 120.0, 140.0]);
        let p = ps.particles().next().unwrap();
        assert_eq!(p.texture, DAMAGE_TEXTURE);
        assert_eq!(p.velocity, Vec2::new(0.0, -50.0));
        assert_eq!((p.life, p.size), (2.0, 50.0));
    }

    #[test]
    fn reset_clears_whole_pool() {
        let mut world = setup(8);
        let a = emitter_entity(&mut world, 4, 0.0);
        let b = emitter_entity(&mut world, 4, 0.0);
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();
        ps.emit(&mut world, a, 0.0);
        ps.emit(&mut world, b, 0.0);
        assert_eq!(ps.active_count(), 8);

        ps.reset_particles(&mut world, a, "smoke");
        assert_eq!(ps.active_count(), 0);
        assert!(ps.slots.iter().all(|p| p.texture == "smoke"));
        assert_eq!(world.get::<ParticleEmitter>(a).unwrap().texture, "smoke");
    }

    #[test]
    fn alpha_fades_with_life() {
        let p = Particle {
            life: 2.5,
            ..Default::default()
        };
        assert_eq!(p.alpha(), 0.5);
    }

    #[test]
    fn shape_drives_velocity() {
        let mut world = setup(4);
        let e = emitter_entity(&mut world, 1, 0.0);
        world.get_mut::<ParticleEmitter>(e).unwrap().shape = EmissionShape::Explosion;
        let mut ps = world.resource_remove::<ParticleSystem>().unwrap();
        ps.emit(&mut world, e, 0.0);
        let v = ps.particles().next().unwrap().velocity;
        assert!((v.length() - shape::BURST_SPEED).abs() < 1e-2);
    }
}
