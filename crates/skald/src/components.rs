//! The engine's component catalogue.
//!
//! Every type here is plain data. Behavior lives in systems, or in
//! [`Callback`] handles resolved by name when a scene is loaded. Enum-typed
//! fields round-trip through scene files as their canonical strings, which
//! are their serde names.

use serde::{Deserialize, Serialize};

use crate::callbacks::{BehaviorFn, ButtonFn, Callback, TransitionFn};
use crate::ecs::World;
use crate::error::EngineResult;
use crate::math::{Color, Vec2, WHITE};

/// Fieldless enum serialized as a canonical string per variant.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

named_enum! {
    /// How the renderer treats an entity.
    RenderType default Sprite {
        Sprite => "Sprite",
        Particle => "Particle",
        Text => "Text",
        PauseUi => "PauseUI",
    }
}

named_enum! {
    /// Draw layer, back to front.
    LayerId default Background {
        Background => "Background",
        Character => "Character",
        Foreground => "Foreground",
        Ui => "UI",
        Debug => "Debug",
    }
}

impl LayerId {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

named_enum! {
    PlayerKind default Player {
        Player => "Player",
        TextBox => "TextBox",
    }
}

named_enum! {
    /// What a collider represents.
    ObjectType default CollidableObject {
        Player => "Player",
        Enemy => "Enemy",
        CollidableObject => "CollidableObject",
        Bullet => "Bullet",
    }
}

named_enum! {
    EnemyType default Minion {
        Minion => "Minion",
        Boss => "Boss",
        Mc => "MC",
        Poison => "Poison",
        Spawner => "Spawner",
        Smoke => "Smoke",
    }
}

named_enum! {
    ButtonState default Idle {
        Idle => "Idle",
        Hover => "Hover",
        Pressed => "Pressed",
    }
}

named_enum! {
    /// Velocity distribution used when a particle is emitted.
    EmissionShape default Circle {
        Circle => "CIRCLE",
        Box => "BOX",
        Ellipse => "ELLIPSE",
        Line => "LINE",
        Spiral => "SPIRAL",
        Radial => "RADIAL",
        Random => "RANDOM",
        Wave => "WAVE",
        Cone => "CONE",
        Explosion => "EXPLOSION",
    }
}

/// Position, scale, and rotation in 2D, plus the comma-joined tag string the
/// entity was loaded with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub tag: String,
}

impl Transform {
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Render {
    /// Texture key in the asset manager.
    pub texture: String,
    pub color: Color,
    pub alpha: f32,
    pub render_type: RenderType,
    pub active: bool,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            texture: String::new(),
            color: Color::ZERO,
            alpha: 1.0,
            render_type: RenderType::Sprite,
            active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    pub layer: LayerId,
    pub sort_id: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub text: String,
    pub font_size: f32,
    pub color: Color,
    pub font_name: String,
    pub offset: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub current_text: String,
    pub kind: PlayerKind,
    pub health: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            current_text: String::new(),
            kind: PlayerKind::Player,
            health: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spawner {
    pub accumulated_time: f32,
    pub spawn_interval: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Movement {
    pub velocity: Vec2,
    pub base_velocity: Vec2,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collision {
    pub kind: ObjectType,
    pub collided: bool,
    pub radius: f32,
    pub scale: Vec2,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enemy {
    pub kind: EnemyType,
    pub health: f32,
    pub predicted_health: f32,
    pub max_health: f32,
    /// Per-frame behavior, resolved from `UpdateFunctionName`.
    pub behavior: Option<Callback<BehaviorFn>>,
    pub spawned: bool,
    pub spawn_rate: f32,
    pub spawn_timer: f32,
}

impl Enemy {
    /// An enemy of `kind` at full `health`.
    pub fn new(kind: EnemyType, health: f32) -> Self {
        Self {
            kind,
            health,
            predicted_health: health,
            max_health: health,
            ..Self::default()
        }
    }
}

/// Sprite-sheet animation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub speed: f32,
    pub cols: u32,
    pub rows: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            speed: 0.1,
            cols: 1,
            rows: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    /// Raw id of the entity this bullet is homing on.
    pub target_id: u32,
    pub damage_multiplier: i32,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            target_id: 0,
            damage_multiplier: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub idle_texture: String,
    pub hover_texture: String,
    pub pressed_texture: String,
    pub press_cooldown: f32,
    pub on_click: Option<Callback<ButtonFn>>,
    pub pressed_audio: String,
    pub hover_audio: String,
    pub first_hover: bool,
    pub press_time_remaining: f32,
    pub state: ButtonState,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            label: "DefaultLabel".to_string(),
            idle_texture: String::new(),
            hover_texture: String::new(),
            pressed_texture: String::new(),
            press_cooldown: 0.2,
            on_click: None,
            pressed_audio: String::new(),
            hover_audio: String::new(),
            first_hover: true,
            press_time_remaining: 0.0,
            state: ButtonState::Idle,
        }
    }
}

/// Scripted in/out transition between two positions along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub internal_timer: f32,
    pub transition_duration: f32,
    pub transition_in_delay: f32,
    pub transition_out_delay: f32,
    pub transition_in: Option<Callback<TransitionFn>>,
    pub transition_out: Option<Callback<TransitionFn>>,
    pub active: bool,
    pub transitioning_in: bool,
    pub tag: String,
    pub start_position: f32,
    pub end_position: f32,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            internal_timer: 0.0,
            transition_duration: 1.0,
            transition_in_delay: 1.0,
            transition_out_delay: 1.0,
            transition_in: None,
            transition_out: None,
            active: false,
            transitioning_in: true,
            tag: "DefaultTag".to_string(),
            start_position: 0.0,
            end_position: 0.0,
        }
    }
}

/// Authoring data for a particle emitter. The live particles themselves are
/// owned by the [`ParticleSystem`](crate::particles::ParticleSystem) pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEmitter {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Color,
    pub size: f32,
    pub life: f32,
    pub active: bool,
    /// Particles spawned per emission.
    pub emission_rate: u32,
    /// Seconds of accumulated `emit_timer` before emission starts.
    pub emit_delay: f32,
    pub emit_timer: f32,
    pub texture: String,
    pub shape: EmissionShape,
    pub radius: f32,
    pub box_size: Vec2,
    pub spiral_turns: f32,
    pub cone_angle: f32,
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: WHITE,
            size: 1.0,
            life: 1.0,
            active: false,
            emission_rate: 1,
            emit_delay: 0.0,
            emit_timer: 0.0,
            texture: String::new(),
            shape: EmissionShape::Circle,
            radius: 0.0,
            box_size: Vec2::ZERO,
            spiral_turns: 0.0,
            cone_angle: 0.0,
        }
    }
}

/// A fill bar (health, progress) drawn over a backing texture.
#[derive(Debug, Clone, PartialEq)]
pub struct UiBar {
    pub backing_texture: String,
    pub fill_texture: String,
    pub fill_percentage: f32,
    pub offset: Vec2,
    pub scale: Vec2,
    pub fill_offset: Vec2,
    pub fill_size: Vec2,
    pub fill_color: Color,
    pub fill_alpha: f32,
    pub bg_color: Color,
    pub bg_alpha: f32,
}

impl Default for UiBar {
    fn default() -> Self {
        Self {
            backing_texture: String::new(),
            fill_texture: String::new(),
            fill_percentage: 1.0,
            offset: Vec2::ZERO,
            scale: Vec2::ONE,
            fill_offset: Vec2::ZERO,
            fill_size: Vec2::ONE,
            fill_color: WHITE,
            fill_alpha: 1.0,
            bg_color: Color::ZERO,
            bg_alpha: 1.0,
        }
    }
}

/// Register every catalogue component with `world`.
pub fn register_all(world: &mut World) -> EngineResult<()> {
    world.register_component::<Transform>()?;
    world.register_component::<Render>()?;
    world.register_component::<Layer>()?;
    world.register_component::<Text>()?;
    world.register_component::<Player>()?;
    world.register_component::<Spawner>()?;
    world.register_component::<Movement>()?;
    world.register_component::<Collision>()?;
    world.register_component::<Enemy>()?;
    world.register_component::<Animation>()?;
    world.register_component::<Bullet>()?;
    world.register_component::<Button>()?;
    world.register_component::<Timeline>()?;
    world.register_component::<ParticleEmitter>()?;
    world.register_component::<UiBar>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_strings_round_trip() {
        for &shape in EmissionShape::ALL {
            let text = serde_json::to_value(shape).unwrap();
            assert_eq!(serde_json::from_value::<EmissionShape>(text).unwrap(), shape);
        }
        assert_eq!(serde_json::to_value(EmissionShape::Cone).unwrap(), "CONE");
        assert_eq!(serde_json::to_value(RenderType::PauseUi).unwrap(), "PauseUI");
        assert_eq!(serde_json::from_str::<EnemyType>("\"MC\"").unwrap(), EnemyType::Mc);
        assert!(serde_json::from_str::<EnemyType>("\"mc\"").is_err());
        assert_eq!(EnemyType::default(), EnemyType::Minion);
    }

    #[test]
    fn layer_index_bounds() {
        assert_eq!(LayerId::from_index(3), Some(LayerId::Ui));
        assert_eq!(LayerId::from_index(5), None);
        assert_eq!(LayerId::from_index(-1), None);
        assert_eq!(LayerId::Debug.index(), 4);
    }

    #[test]
    fn enemy_new_fills_all_health_fields() {
        let boss = Enemy::new(EnemyType::Boss, 100.0);
        assert_eq!(boss.health, 100.0);
        assert_eq!(boss.predicted_health, 100.0);
        assert_eq!(boss.max_health, 100.0);
    }

    #[test]
    fn register_all_assigns_distinct_bits() {
        let mut world = World::new();
        register_all(&mut world).unwrap();
        let t = world.component_id::<Transform>().unwrap();
        let u = world.component_id::<UiBar>().unwrap();
        assert_ne!(t, u);
        assert_eq!(world.component_counts().len(), 15);
    }
}
