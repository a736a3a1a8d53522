//! Asset manifest files: textures, audio, and window configuration.
//!
//! ```text
//! {"textures":    [{"name": "fire", "path": "Assets/fire.png"}]}
//! {"musicAssets": [{"customName": "hit", "filePath": "hit.wav",
//!                   "mode": "oneshot", "soundType": "effect"}]}
//! {"windows":     [{"x": 1600, "y": 900, "program_name": "Skald"}]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{read_json_file, write_json_file};
use crate::error::EngineResult;

// ── Textures ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TextureManifest {
    #[serde(default)]
    pub textures: Vec<TextureEntry>,
}

impl TextureManifest {
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        read_json_file(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        write_json_file(path, self)
    }
}

// ── Audio ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundType {
    Background,
    #[default]
    Effect,
}

fn default_mode() -> String {
    "oneshot".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioEntry {
    pub custom_name: String,
    pub file_path: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub sound_type: SoundType,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioManifest {
    #[serde(default)]
    pub music_assets: Vec<AudioEntry>,
}

impl AudioManifest {
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        read_json_file(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        write_json_file(path, self)
    }
}

// ── Windows ──────────────────────────────────────────────────────────────

/// Window size and title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub x: u32,
    pub y: u32,
    pub program_name: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: 1600,
            y: 900,
            program_name: "Skald".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowManifest {
    #[serde(default)]
    pub windows: Vec<WindowConfig>,
}

impl WindowManifest {
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        read_json_file(path)
    }
}
