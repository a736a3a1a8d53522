//! # Asset Data
//!
//! Games built on the engine describe their assets in JSON: a texture
//! manifest, an audio manifest, window settings, and static gameplay data
//! (bullet template, animation table). The [`AssetManager`] owns all of it.
//!
//! ```text
//! AssetManager
//!   textures ── NamedRegistry<TextureEntry>   name → file path
//!   audio    ── NamedRegistry<AudioEntry>     name → file + playback info
//!   windows  ── path → Vec<WindowConfig>      read once, cached
//!   shaders  ── path → source text            read once, cached
//!   data     ── StaticData                    bullet + animation templates
//!   watcher  ── DataWatcher                   hot reload of everything above
//! ```
//!
//! Nothing here touches a GPU or an audio device. Registries hold names and
//! paths; whoever renders or plays them looks them up.
//!
//! ## Hot Reload
//!
//! Every file loaded through the manager is registered with the
//! [`DataWatcher`]. Call [`AssetManager::process_reloads`] once per frame: it
//! re-reads each file whose changes have settled and replaces the data that
//! file fed. A file that fails to parse keeps its old data and logs a warning.

mod manifest;
mod registry;
mod static_data;
mod watch;

pub use manifest::{
    AudioEntry, AudioManifest, SoundType, TextureEntry, TextureManifest, WindowConfig,
    WindowManifest,
};
pub use registry::NamedRegistry;
pub use static_data::{AnimationData, BULLET_KEY, BulletData, StaticData};
pub use watch::{DEBOUNCE_DURATION, DataKind, DataWatcher};

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{EngineError, EngineResult};
use crate::lexicon::Lexicon;

/// Parse a JSON file into `T`.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> EngineResult<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write `value` as pretty-printed JSON, replacing the file.
///
/// The document goes to a sibling `.tmp` file first and is renamed over
/// `path`, so readers never see a half-written file.
pub fn write_json_file<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> EngineResult<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let file = File::create(&tmp).map_err(|e| EngineError::io(&tmp, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n").map_err(|e| EngineError::io(&tmp, e))?;
    out.flush().map_err(|e| EngineError::io(&tmp, e))?;
    drop(out);
    fs::rename(&tmp, path).map_err(|e| EngineError::io(path, e))
}

pub struct AssetManager {
    textures: NamedRegistry<TextureEntry>,
    audio: NamedRegistry<AudioEntry>,
    windows: HashMap<PathBuf, Vec<WindowConfig>>,
    shaders: HashMap<PathBuf, String>,
    data: StaticData,
    watcher: DataWatcher,
}

impl AssetManager {
    pub fn new() -> Self {
        Self {
            textures: NamedRegistry::new("texture"),
            audio: NamedRegistry::new("audio"),
            windows: HashMap::new(),
            shaders: HashMap::new(),
            data: StaticData::new(),
            watcher: DataWatcher::new(),
        }
    }

    // ── Textures ─────────────────────────────────────────────────────

    /// Read a texture manifest, adding (or replacing) every entry. Returns the
    /// number of entries read.
    pub fn load_textures(&mut self, path: impl AsRef<Path>) -> EngineResult<usize> {
        let path = path.as_ref();
        let manifest = TextureManifest::load(path)?;
        let n = manifest.textures.len();
        for entry in manifest.textures {
            self.textures.insert(entry.name.clone(), entry);
        }
        self.watcher.watch(path, DataKind::Textures);
        log::info!("Loaded {n} textures from {}", path.display());
        Ok(n)
    }

    /// Write the texture registry back out as a manifest, sorted by name.
    pub fn save_textures(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        TextureManifest {
            textures: self.textures.iter().map(|(_, e)| e.clone()).collect(),
        }
        .save(path)
    }

    pub fn textures(&self) -> &NamedRegistry<TextureEntry> {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut NamedRegistry<TextureEntry> {
        &mut self.textures
    }

    pub fn texture(&self, name: &str) -> EngineResult<&TextureEntry> {
        self.textures.get(name)
    }

    /// Rename a texture. The entry's own `name` field follows the key.
    pub fn rename_texture(&mut self, old: &str, new: &str) -> EngineResult<()> {
        self.textures.rename(old, new)?;
        if let Some(entry) = self.textures.get_mut(new) {
            entry.name = new.to_string();
        }
        Ok(())
    }

    // ── Audio ────────────────────────────────────────────────────────

    pub fn load_audio(&mut self, path: impl AsRef<Path>) -> EngineResult<usize> {
        let path = path.as_ref();
        let manifest = AudioManifest::load(path)?;
        let n = manifest.music_assets.len();
        for entry in manifest.music_assets {
            self.audio.insert(entry.custom_name.clone(), entry);
        }
        self.watcher.watch(path, DataKind::Audio);
        log::info!("Loaded {n} audio assets from {}", path.display());
        Ok(n)
    }

    pub fn save_audio(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        AudioManifest {
            music_assets: self.audio.iter().map(|(_, e)| e.clone()).collect(),
        }
        .save(path)
    }

    pub fn audio(&self) -> &NamedRegistry<AudioEntry> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut NamedRegistry<AudioEntry> {
        &mut self.audio
    }

    pub fn rename_audio(&mut self, old: &str, new: &str) -> EngineResult<()> {
        self.audio.rename(old, new)?;
        if let Some(entry) = self.audio.get_mut(new) {
            entry.custom_name = new.to_string();
        }
        Ok(())
    }

    // ── Windows & shaders ────────────────────────────────────────────

    /// Window configurations from `path`, read on first request and cached.
    pub fn load_window(&mut self, path: impl AsRef<Path>) -> EngineResult<&[WindowConfig]> {
        let path = path.as_ref().to_path_buf();
        if !self.windows.contains_key(&path) {
            let manifest = WindowManifest::load(&path)?;
            self.windows.insert(path.clone(), manifest.windows);
        }
        Ok(self.windows.get(&path).map(Vec::as_slice).unwrap_or_default())
    }

    /// The first window in `path`, or the default window when the file
    /// lists none.
    pub fn primary_window(&mut self, path: impl AsRef<Path>) -> EngineResult<WindowConfig> {
        Ok(self.load_window(path)?.first().cloned().unwrap_or_default())
    }

    /// Shader source text, read once and cached by path.
    pub fn load_shader_source(&mut self, path: impl AsRef<Path>) -> EngineResult<&str> {
        let path = path.as_ref().to_path_buf();
        if !self.shaders.contains_key(&path) {
            let source = std::fs::read_to_string(&path).map_err(|e| EngineError::io(&path, e))?;
            log::debug!("Cached shader source {}", path.display());
            self.shaders.insert(path.clone(), source);
        }
        Ok(self.shaders.get(&path).map(String::as_str).unwrap_or_default())
    }

    // ── Static data ──────────────────────────────────────────────────

    pub fn load_bullets(&mut self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        self.data.load_bullets(path)?;
        self.watcher.watch(path, DataKind::Bullets);
        Ok(())
    }

    pub fn load_animations(&mut self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        self.data.load_animations(path)?;
        self.watcher.watch(path, DataKind::Animations);
        Ok(())
    }

    pub fn static_data(&self) -> &StaticData {
        &self.data
    }

    pub fn static_data_mut(&mut self) -> &mut StaticData {
        &mut self.data
    }

    // ── Lexicon lists ────────────────────────────────────────────────

    /// Load the three word lists into `lexicon` and watch them for changes.
    /// Any list may be skipped by passing `None`.
    pub fn load_word_lists(
        &mut self,
        lexicon: &mut Lexicon,
        dictionary: Option<&Path>,
        prefixes: Option<&Path>,
        nsfw: Option<&Path>,
    ) -> EngineResult<()> {
        if let Some(path) = dictionary {
            let n = lexicon.load_dictionary(path)?;
            self.watcher.watch(path, DataKind::Dictionary);
            log::info!("Loaded {n} dictionary words");
        }
        if let Some(path) = prefixes {
            let n = lexicon.load_prefixes(path)?;
            self.watcher.watch(path, DataKind::Prefixes);
            log::info!("Loaded {n} prefixes");
        }
        if let Some(path) = nsfw {
            lexicon.load_nsfw(path)?;
            self.watcher.watch(path, DataKind::Nsfw);
        }
        Ok(())
    }

    // ── Hot reload ───────────────────────────────────────────────────

    pub fn watcher(&self) -> &DataWatcher {
        &self.watcher
    }

    /// Re-read every watched file whose changes have settled. Returns the
    /// kinds that were reloaded successfully.
    pub fn process_reloads(&mut self, lexicon: &mut Lexicon) -> Vec<DataKind> {
        self.watcher.poll();
        let mut reloaded = Vec::new();
        for (path, kind) in self.watcher.drain_ready() {
            match self.reload(&path, kind, lexicon) {
                Ok(()) => {
                    log::info!("Hot-reloaded {kind:?} from {}", path.display());
                    reloaded.push(kind);
                }
                Err(e) => log::warn!("Hot-reload failed for '{}': {e}", path.display()),
            }
        }
        reloaded
    }

    fn reload(&mut self, path: &Path, kind: DataKind, lexicon: &mut Lexicon) -> EngineResult<()> {
        match kind {
            DataKind::Textures => {
                let manifest = TextureManifest::load(path)?;
                self.textures.clear();
                for entry in manifest.textures {
                    self.textures.insert(entry.name.clone(), entry);
                }
            }
            DataKind::Audio => {
                let manifest = AudioManifest::load(path)?;
                self.audio.clear();
                for entry in manifest.music_assets {
                    self.audio.insert(entry.custom_name.clone(), entry);
                }
            }
            DataKind::Bullets => self.data.load_bullets(path)?,
            DataKind::Animations => self.data.load_animations(path)?,
            DataKind::Dictionary => {
                let doc: serde_json::Value = read_json_file(path)?;
                lexicon.clear_dictionary();
                lexicon.add_dictionary_from_value(&doc);
            }
            DataKind::Prefixes => {
                let doc: serde_json::Value = read_json_file(path)?;
                lexicon.clear_prefixes();
                lexicon.add_prefixes_from_value(&doc);
            }
            DataKind::Nsfw => {
                let doc: serde_json::Value = read_json_file(path)?;
                lexicon.clear_nsfw();
                lexicon.add_nsfw_from_value(&doc);
            }
        }
        Ok(())
    }
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new()
    }
}
