//! Named behavior callbacks.
//!
//! Scene files refer to behavior by name (`"UpdateFunctionName": "BossLogic"`,
//! `"onClick": "StartGame"`). Game code registers plain function handles under
//! those names in a [`CallbackRegistry`], and the scene loader resolves each
//! name once, at load time, into a [`Callback`] stored on the component.
//!
//! A `Callback` keeps its name even when resolution fails, so saving the scene
//! writes the name back out unchanged.

use std::collections::HashMap;
use std::fmt;

use crate::ecs::{Entity, World};

/// Per-frame enemy behavior.
pub type BehaviorFn = fn(&mut World, Entity, f32);
/// Button press action.
pub type ButtonFn = fn(&mut World, Entity);
/// Timeline transition step, called with the timeline's progress timer.
pub type TransitionFn = fn(&mut World, Entity, f32);

/// A name from a scene file plus the handle it resolved to, if any.
#[derive(Clone)]
pub struct Callback<F> {
    pub name: String,
    pub handle: Option<F>,
}

impl<F: Copy> Callback<F> {
    pub fn new(name: impl Into<String>, handle: Option<F>) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.handle.is_some()
    }

    pub fn get(&self) -> Option<F> {
        self.handle
    }
}

impl<F> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("resolved", &self.handle.is_some())
            .finish()
    }
}

/// Equality is by name. Two callbacks naming the same function are the same
/// callback as far as scenes are concerned.
impl<F> PartialEq for Callback<F> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Name → function handle maps, one per callback kind.
#[derive(Default)]
pub struct CallbackRegistry {
    behaviors: HashMap<String, BehaviorFn>,
    buttons: HashMap<String, ButtonFn>,
    transitions: HashMap<String, TransitionFn>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_behavior(&mut self, name: &str, f: BehaviorFn) {
        self.behaviors.insert(name.to_string(), f);
    }

    pub fn register_button(&mut self, name: &str, f: ButtonFn) {
        self.buttons.insert(name.to_string(), f);
    }

    pub fn register_transition(&mut self, name: &str, f: TransitionFn) {
        self.transitions.insert(name.to_string(), f);
    }

    pub fn behavior(&self, name: &str) -> Option<BehaviorFn> {
        self.behaviors.get(name).copied()
    }

    pub fn button(&self, name: &str) -> Option<ButtonFn> {
        self.buttons.get(name).copied()
    }

    pub fn transition(&self, name: &str) -> Option<TransitionFn> {
        self.transitions.get(name).copied()
    }

    /// Number of registered callbacks across all kinds.
    pub fn len(&self) -> usize {
        self.behaviors.len() + self.buttons.len() + self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
