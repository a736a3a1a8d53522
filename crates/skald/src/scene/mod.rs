//! # Scenes: JSON Documents In and Out of the World
//!
//! A scene file is a single object with an `entities` array. Each element
//! names the entity's `type` and carries a `components` object keyed by
//! component name:
//!
//! ```text
//! {
//!   "entities": [
//!     {
//!       "type": "Enemy1",
//!       "components": {
//!         "TransformComponent": { "x": 5, "y": 10, "tag": "enemy, boss" },
//!         "EnemyComponent": { "type": "Boss", "health": 100,
//!                             "UpdateFunctionName": "BossLogic" }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Loading is forgiving below the document level: unknown component keys are
//! ignored and bad fields fall back to their defaults with a warning. Only a
//! document without an `entities` array is rejected outright.
//!
//! ## Module Overview
//!
//! - [`SceneLoader`] builds entities from a document
//! - [`save_value`] / [`save_to_file`] write the world back out
//! - [`SceneManager`] tracks the current scene and performs deferred switches

mod load;
mod manager;
mod reader;
mod save;

pub use load::{DEFAULT_TAG_PREFIX, SceneLoader};
pub use manager::SceneManager;
pub use save::{save_to_file, save_to_string, save_value};
