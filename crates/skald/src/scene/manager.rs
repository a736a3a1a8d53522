//! Current-scene tracking and deferred scene switches.

use std::path::{Path, PathBuf};

use super::load::SceneLoader;
use super::save;
use crate::ecs::{Entity, World};
use crate::error::EngineResult;
use crate::math::Vec2;
use crate::state::EngineState;

/// Tracks which scene is loaded and performs queued transitions.
///
/// [`transition_to`](Self::transition_to) only records the request; the
/// switch happens on the next [`update`](Self::update) so systems never see
/// the world cleared mid-frame.
#[derive(Debug)]
pub struct SceneManager {
    scene_dir: PathBuf,
    current: String,
    next: Option<String>,
}

impl SceneManager {
    /// Scenes are looked up as `<scene_dir>/<name>.json`.
    pub fn new(default_scene: impl Into<String>, scene_dir: impl Into<PathBuf>) -> Self {
        Self {
            scene_dir: scene_dir.into(),
            current: default_scene.into(),
            next: None,
        }
    }

    pub fn current_scene(&self) -> &str {
        &self.current
    }

    pub fn next_scene(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn scene_dir(&self) -> &Path {
        &self.scene_dir
    }

    pub fn scene_path(&self, name: &str) -> PathBuf {
        self.scene_dir.join(format!("{name}.json"))
    }

    /// Queue a switch to `name`. A later call before the next update replaces
    /// the queued scene.
    pub fn transition_to(&mut self, name: &str) {
        log::debug!("Scene transition queued: {} -> {name}", self.current);
        self.next = Some(name.to_string());
    }

    pub fn is_transitioning(&self) -> bool {
        self.next.is_some()
    }

    /// Perform a queued transition. Returns true if one happened.
    ///
    /// The world is cleared first. If the next scene fails to load the error
    /// is logged and the world stays empty, but the scene still counts as
    /// current so a retry targets the same name.
    pub fn update(&mut self, world: &mut World, loader: &SceneLoader<'_>) -> bool {
        let Some(next) = self.next.take() else {
            return false;
        };

        world.clear_entities();
        if let Some(state) = world.get_resource_mut::<EngineState>() {
            state.time_scale = 1.0;
        }

        let path = self.scene_path(&next);
        match loader.load_file(world, &path, None) {
            Ok(entities) => log::info!("Switched to scene '{next}' ({} entities)", entities.len()),
            Err(e) => log::error!("Failed to load scene '{next}': {e}"),
        }
        self.current = next;
        true
    }

    /// Load a scene file into `world` and make it current. Existing entities
    /// are kept.
    pub fn load_scene(
        &mut self,
        world: &mut World,
        loader: &SceneLoader<'_>,
        path: impl AsRef<Path>,
    ) -> EngineResult<Vec<Entity>> {
        let path = path.as_ref();
        let entities = loader.load_file(world, path, None)?;
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            self.current = name.to_string();
        }
        Ok(entities)
    }

    pub fn save_scene(&self, world: &World, path: impl AsRef<Path>) -> EngineResult<()> {
        save::save_to_file(world, path)
    }

    /// Save the world under the current scene's name in the scene directory.
    pub fn save_current(&self, world: &World) -> EngineResult<()> {
        save::save_to_file(world, self.scene_path(&self.current))
    }

    /// Instance a scene document additively, moving every loaded Transform
    /// to `position`.
    pub fn load_prefab(
        &self,
        world: &mut World,
        loader: &SceneLoader<'_>,
        path: impl AsRef<Path>,
        position: Vec2,
    ) -> EngineResult<Vec<Entity>> {
        loader.load_file(world, path, Some(position))
    }
}
