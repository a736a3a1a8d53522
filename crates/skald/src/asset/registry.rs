//! Name-keyed asset tables.

use std::collections::{BTreeMap, HashSet};

use crate::error::{EngineError, EngineResult};

/// A table of assets addressed by a user-facing name.
///
/// Lookups that miss are logged once per name, then stay quiet.
#[derive(Debug)]
pub struct NamedRegistry<T> {
    kind: &'static str,
    entries: BTreeMap<String, T>,
    reported_misses: HashSet<String>,
}

impl<T> NamedRegistry<T> {
    /// `kind` is used in errors and log lines ("texture", "audio").
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
            reported_misses: HashSet::new(),
        }
    }

    /// Insert or replace the entry for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        self.reported_misses.remove(&name);
        self.entries.insert(name, value)
    }

    pub fn get(&self, name: &str) -> EngineResult<&T> {
        self.entries.get(name).ok_or_else(|| self.not_found(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    /// Like [`get`](Self::get), but a miss is logged (once) and returns `None`.
    pub fn lookup(&mut self, name: &str) -> Option<&T> {
        if !self.entries.contains_key(name) {
            if self.reported_misses.insert(name.to_string()) {
                log::warn!("{} '{name}' not found", self.kind);
            }
            return None;
        }
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Move the entry at `old` to `new`. Fails without changing anything if
    /// `new` is taken or `old` doesn't exist.
    pub fn rename(&mut self, old: &str, new: &str) -> EngineResult<()> {
        if self.entries.contains_key(new) {
            log::warn!("Cannot rename {} '{old}': '{new}' already exists", self.kind);
            return Err(EngineError::NameTaken {
                kind: self.kind,
                name: new.to_string(),
            });
        }
        let value = self.entries.remove(old).ok_or_else(|| self.not_found(old))?;
        self.entries.insert(new.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> EngineResult<T> {
        self.entries.remove(name).ok_or_else(|| self.not_found(name))
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.reported_misses.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn not_found(&self, name: &str) -> EngineError {
        EngineError::AssetNotFound {
            kind: self.kind,
            name: name.to_string(),
        }
    }
}
