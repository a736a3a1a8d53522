//! Convenience re-exports — `use skald::prelude::*` for the common items.

pub use crate::asset::{AssetManager, StaticData};
pub use crate::callbacks::{BehaviorFn, ButtonFn, Callback, CallbackRegistry, TransitionFn};
pub use crate::components::{
    Animation, Bullet, Button, ButtonState, Collision, EmissionShape, Enemy, EnemyType, Layer,
    LayerId, Movement, ObjectType, ParticleEmitter, Player, PlayerKind, Render, RenderType,
    Spawner, Text, Timeline, Transform, UiBar,
};
pub use crate::config::EngineConfig;
pub use crate::diag::init_logger;
#[cfg(feature = "diagnostics")]
pub use crate::diag::Snapshot;
pub use crate::ecs::{Entity, Signature, System, World};
pub use crate::engine::Engine;
pub use crate::error::{EngineError, EngineResult};
pub use crate::lexicon::Lexicon;
pub use crate::math::{Color, Vec2, Vec3};
pub use crate::particles::{Particle, ParticleSystem};
pub use crate::scene::{SceneLoader, SceneManager};
pub use crate::state::{EngineState, Mode};
pub use crate::time::Time;
