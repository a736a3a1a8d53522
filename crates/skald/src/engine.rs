//! The engine façade: every service wired together and stepped per frame.
//!
//! ```ignore
//! use skald::prelude::*;
//!
//! fn boss_logic(world: &mut World, boss: Entity, dt: f32) { /* ... */ }
//!
//! let mut engine = Engine::from_config(EngineConfig::load("engine.json")?)?;
//! engine.callbacks.register_behavior("BossLogic", boss_logic);
//! engine.load_scene("Scenes/Level1.json")?;
//! loop {
//!     engine.tick(1.0 / 60.0);
//! }
//! ```

use std::path::Path;

use crate::asset::AssetManager;
use crate::callbacks::CallbackRegistry;
use crate::components::{self, Enemy};
use crate::config::EngineConfig;
use crate::ecs::{Entity, System, World};
use crate::error::EngineResult;
use crate::lexicon::Lexicon;
use crate::math::Vec2;
use crate::particles::ParticleSystem;
use crate::scene::{SceneLoader, SceneManager};
use crate::state::EngineState;
use crate::time::Time;

/// Random stream offsets passed to [`EngineConfig::rng`].
const LEXICON_STREAM: u64 = 1;
const PARTICLE_STREAM: u64 = 2;

/// Owns the world and the services around it.
///
/// Fields are public so games can reach any service directly; the methods
/// here only cover the calls that need more than one of them at once.
pub struct Engine {
    pub world: World,
    pub assets: AssetManager,
    pub lexicon: Lexicon,
    pub callbacks: CallbackRegistry,
    pub scenes: SceneManager,
    config: EngineConfig,
}

impl Engine {
    /// Build an engine from `config`, loading every data file it names.
    ///
    /// The world starts with [`Time`] and [`EngineState`] resources, every
    /// catalogue component registered, and two systems: enemy behaviors
    /// followed by the particle system.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        let mut world = World::with_entity_capacity(config.max_entities);
        components::register_all(&mut world)?;
        world.insert_resource(Time::new());
        world.insert_resource(EngineState::default());

        let enemies = world.signature_for::<(Enemy,)>()?;
        world.add_system("EnemyBehavior", enemies, EnemyBehavior);
        ParticleSystem::with_rng(config.max_particles, config.rng(PARTICLE_STREAM))
            .install(&mut world)?;

        let mut lexicon = Lexicon::with_rng(config.rng(LEXICON_STREAM))
            .with_prefix_rules(config.prefix_min_words, config.prefix_max_attempts);

        let mut assets = AssetManager::new();
        let data = &config.data;
        if let Some(path) = &data.textures {
            assets.load_textures(path)?;
        }
        if let Some(path) = &data.audio {
            assets.load_audio(path)?;
        }
        if let Some(path) = &data.windows {
            assets.load_window(path)?;
        }
        if let Some(path) = &data.bullet {
            assets.load_bullets(path)?;
        }
        if let Some(path) = &data.animation {
            assets.load_animations(path)?;
        }
        assets.load_word_lists(
            &mut lexicon,
            data.dictionary.as_deref(),
            data.prefixes.as_deref(),
            data.nsfw.as_deref(),
        )?;

        let scenes = SceneManager::new(config.default_scene.clone(), config.scene_dir.clone());
        log::info!(
            "Engine ready: {} entities max, {} particles, scene dir {}",
            config.max_entities,
            config.max_particles,
            config.scene_dir.display()
        );

        Ok(Self {
            world,
            assets,
            lexicon,
            callbacks: CallbackRegistry::new(),
            scenes,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A loader over the current callbacks and static data.
    pub fn loader(&self) -> SceneLoader<'_> {
        SceneLoader::new(&self.callbacks, self.assets.static_data())
    }

    /// Load a scene file additively and make it the current scene.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> EngineResult<Vec<Entity>> {
        let loader = SceneLoader::new(&self.callbacks, self.assets.static_data());
        self.scenes.load_scene(&mut self.world, &loader, path)
    }

    /// Load the configured default scene from the scene directory.
    pub fn load_default_scene(&mut self) -> EngineResult<Vec<Entity>> {
        let path = self.scenes.scene_path(&self.config.default_scene);
        self.load_scene(path)
    }

    pub fn load_prefab(&mut self, path: impl AsRef<Path>, position: Vec2) -> EngineResult<Vec<Entity>> {
        let loader = SceneLoader::new(&self.callbacks, self.assets.static_data());
        self.scenes.load_prefab(&mut self.world, &loader, path, position)
    }

    pub fn save_scene(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        self.scenes.save_scene(&self.world, path)
    }

    /// Step one frame of `dt` seconds: advance time, apply settled data
    /// reloads, perform a queued scene switch, then run every system.
    pub fn tick(&mut self, dt: f32) {
        let scale = self
            .world
            .get_resource::<EngineState>()
            .map_or(1.0, |s| s.time_scale);
        let time = self.world.resource_mut::<Time>();
        time.set_scale(scale);
        let dt = time.advance(dt);

        self.assets.process_reloads(&mut self.lexicon);

        let loader = SceneLoader::new(&self.callbacks, self.assets.static_data());
        self.scenes.update(&mut self.world, &loader);

        self.world.update(dt);
    }

    pub fn pause(&mut self, paused: bool) {
        self.world.resource_mut::<EngineState>().paused = paused;
    }

    pub fn particles(&self) -> &ParticleSystem {
        self.world.resource::<ParticleSystem>()
    }

    #[cfg(feature = "diagnostics")]
    pub fn snapshot(&mut self) -> crate::diag::Snapshot {
        crate::diag::Snapshot::capture(&mut self.world)
    }
}

/// Runs each enemy's resolved behavior callback once per tick.
///
/// Enemies whose behavior name didn't resolve are skipped. Nothing runs while
/// the engine is paused or in edit mode.
pub struct EnemyBehavior;

impl System for EnemyBehavior {
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        if world
            .get_resource::<EngineState>()
            .is_some_and(|state| !state.is_running())
        {
            return;
        }
        for &entity in entities {
            // The list was fixed at dispatch; an earlier behavior may have
            // destroyed this entity.
            let Some(behavior) = world
                .get::<Enemy>(entity)
                .and_then(|e| e.behavior.as_ref())
                .and_then(|cb| cb.get())
            else {
                continue;
            };
            behavior(world, entity, dt);
        }
    }
}
