//! # Data-File Hot Reload
//!
//! [`DataWatcher`] watches the JSON data files the asset manager loaded
//! (manifests, static data, word lists) and reports which ones changed.
//!
//! ```text
//! notify watcher ──► background thread ──► mpsc channel
//!                                              │
//! poll():        drain channel into `pending` (path → last event time)
//! drain_ready(): hand back paths quiet for at least DEBOUNCE_DURATION
//! ```
//!
//! Editors often save atomically (write temp, rename over the original), which
//! fires several events for one logical save. Debouncing collapses each burst
//! into a single reload.
//!
//! If the watcher can't be created the asset manager still works; files just
//! won't reload. Failures are logged, never panicked on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events for the same path closer together than this are one reload.
pub const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// Which data set a watched file feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Textures,
    Audio,
    Bullets,
    Animations,
    Dictionary,
    Prefixes,
    Nsfw,
}

pub struct DataWatcher {
    /// `None` if initialization failed.
    watcher: Option<RecommendedWatcher>,
    /// `Mutex` only so the watcher can live in a `Send + Sync` resource.
    rx: Mutex<mpsc::Receiver<Result<notify::Event, notify::Error>>>,
    watched: HashMap<PathBuf, DataKind>,
    pending: HashMap<PathBuf, (DataKind, Instant)>,
    disconnected: bool,
}

impl DataWatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        let watcher = notify::recommended_watcher(move |res| {
            // Receiver gone means the watcher is being dropped.
            let _ = tx.send(res);
        });

        let watcher = match watcher {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("Failed to create file watcher: {e}. Hot-reload disabled.");
                None
            }
        };

        Self {
            watcher,
            rx: Mutex::new(rx),
            watched: HashMap::new(),
            pending: HashMap::new(),
            disconnected: false,
        }
    }

    /// Start watching `path` as a source of `kind`.
    pub fn watch(&mut self, path: &Path, kind: DataKind) {
        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Cannot watch '{}': {e}", path.display());
                return;
            }
        };
        if self.watched.contains_key(&canonical) {
            return;
        }

        if let Some(watcher) = &mut self.watcher {
            if let Err(e) = watcher.watch(&canonical, RecursiveMode::NonRecursive) {
                log::warn!("Failed to watch '{}': {e}", canonical.display());
                return;
            }
        }
        log::debug!("Watching {} as {kind:?}", canonical.display());
        self.watched.insert(canonical, kind);
    }

    pub fn is_active(&self) -> bool {
        self.watcher.is_some() && !self.disconnected
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Drain watcher events into the debounce buffer.
    pub fn poll(&mut self) {
        if self.disconnected {
            return;
        }
        let rx = match self.rx.get_mut() {
            Ok(rx) => rx,
            Err(poisoned) => poisoned.into_inner(),
        };

        loop {
            match rx.try_recv() {
                Ok(Ok(event)) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        continue;
                    }
                    for path in &event.paths {
                        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
                        if let Some(&kind) = self.watched.get(&canonical) {
                            self.pending.insert(canonical, (kind, Instant::now()));
                        }
                    }
                }
                Ok(Err(e)) => log::warn!("File watcher error: {e}"),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("File watcher disconnected. Hot-reload disabled.");
                    self.disconnected = true;
                    break;
                }
            }
        }
    }

    /// Paths that have been quiet for at least [`DEBOUNCE_DURATION`].
    pub fn drain_ready(&mut self) -> Vec<(PathBuf, DataKind)> {
        self.drain_ready_at(Instant::now())
    }

    fn drain_ready_at(&mut self, now: Instant) -> Vec<(PathBuf, DataKind)> {
        let mut ready = Vec::new();
        self.pending.retain(|path, (kind, stamp)| {
            if now.duration_since(*stamp) >= DEBOUNCE_DURATION {
                ready.push((path.clone(), *kind));
                false
            } else {
                true
            }
        });
        ready
    }
}

impl Default for DataWatcher {
    fn default() -> Self {
        Self::new()
    }
}
