//! Engine configuration.
//!
//! Every field has a default, so a config file only lists what it changes:
//!
//! ```text
//! {
//!   "max_entities": 2000,
//!   "data": { "dictionary": "Data/words.json" },
//!   "rng_seed": 42
//! }
//! ```

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::asset::read_json_file;
use crate::ecs::entity::DEFAULT_MAX_ENTITIES;
use crate::error::EngineResult;
use crate::lexicon::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_WORDS};

pub const DEFAULT_MAX_PARTICLES: usize = 10_000;
pub const DEFAULT_SCENE: &str = "DefaultScene";
pub const DEFAULT_SCENE_DIR: &str = "Scenes";

/// Locations of the JSON data files. Unset paths are simply not loaded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub textures: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub windows: Option<PathBuf>,
    pub bullet: Option<PathBuf>,
    pub animation: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
    pub prefixes: Option<PathBuf>,
    pub nsfw: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_entities: usize,
    pub max_particles: usize,
    /// Words a generated prefix must start.
    pub prefix_min_words: usize,
    /// Sampling attempts before prefix generation falls back.
    pub prefix_max_attempts: usize,
    pub data: DataPaths,
    pub default_scene: String,
    /// Directory holding `<name>.json` scene files.
    pub scene_dir: PathBuf,
    /// Seed for every random generator the engine creates. Entropy when unset.
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let config: Self = read_json_file(path.as_ref())?;
        log::debug!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }

    /// A generator seeded from `rng_seed`, offset by `stream` so separate
    /// consumers don't share a sequence.
    pub fn rng(&self, stream: u64) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            max_particles: DEFAULT_MAX_PARTICLES,
            prefix_min_words: DEFAULT_MIN_WORDS,
            prefix_max_attempts: DEFAULT_MAX_ATTEMPTS,
            data: DataPaths::default(),
            default_scene: DEFAULT_SCENE.to_string(),
            scene_dir: PathBuf::from(DEFAULT_SCENE_DIR),
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn empty_document_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_entities, 5000);
        assert_eq!(config.max_particles, 10_000);
        assert_eq!(config.default_scene, "DefaultScene");
    }

    #[test]
    fn partial_document_overrides() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"max_entities": 10, "data": {"dictionary": "words.json"}, "rng_seed": 3}"#,
        )
        .unwrap();
        assert_eq!(config.max_entities, 10);
        assert_eq!(config.prefix_min_words, 20);
        assert_eq!(config.data.dictionary, Some(PathBuf::from("words.json")));
        assert_eq!(config.data.prefixes, None);
    }

    #[test]
    fn seeded_rng_is_repeatable() {
        let config = EngineConfig {
            rng_seed: Some(9),
            ..Default::default()
        };
        let a: u32 = config.rng(1).r#gen();
        let b: u32 = config.rng(1).r#gen();
        assert_eq!(a, b);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"max_particles": 64}"#).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap().max_particles, 64);
    }
}
