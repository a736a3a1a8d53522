//! Engine-wide error type.
//!
//! Operations that can fail outright (entity creation past capacity, a scene
//! file that won't parse, a missing texture) return [`EngineResult`]. Problems
//! scoped to a single field of a single component are not errors at all: the
//! scene loader logs them and falls back to the field's default.

use std::path::PathBuf;

use thiserror::Error;

use crate::ecs::Entity;

/// Errors surfaced by the engine core.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("entity capacity exceeded (max {max} live entities)")]
    CapacityExceeded { max: usize },

    #[error("unknown entity {0}")]
    UnknownEntity(Entity),

    #[error("entity {entity} already has component {component}")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {entity} has no component {component}")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("component {0} was never registered")]
    UnregisteredComponent(&'static str),

    #[error("too many component types (max {max})")]
    TooManyComponentTypes { max: usize },

    #[error("malformed scene: {0}")]
    MalformedScene(String),

    #[error("scene entity #{index} has no `type`")]
    MissingEntityType { index: usize },

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} '{name}' not found")]
    AssetNotFound { kind: &'static str, name: String },

    #[error("{kind} name '{name}' is already taken")]
    NameTaken { kind: &'static str, name: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Wrap an `io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
