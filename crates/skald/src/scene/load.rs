//! Scene document → entities.

use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value};

use super::reader::{self, FieldReader};
use crate::asset::{BULLET_KEY, StaticData, read_json_file};
use crate::callbacks::{Callback, CallbackRegistry};
use crate::components::{
    self, Animation, Bullet, Button, ButtonState, Collision, EmissionShape, Enemy, EnemyType,
    Layer, LayerId, Movement, ObjectType, ParticleEmitter, Player, PlayerKind, Render, RenderType,
    Spawner, Text, Timeline, Transform, UiBar,
};
use crate::ecs::{Component, Entity, World};
use crate::error::{EngineError, EngineResult};
use crate::math::{Color, Vec2, WHITE};

/// Prefix of the tag given to entities whose Transform carries none.
pub const DEFAULT_TAG_PREFIX: &str = "Entity_";

/// Builds entities from scene documents.
///
/// Callback names are resolved through `callbacks` once, while loading.
/// Animation and Bullet defaults come from `data`.
pub struct SceneLoader<'a> {
    callbacks: &'a CallbackRegistry,
    data: &'a StaticData,
}

impl<'a> SceneLoader<'a> {
    pub fn new(callbacks: &'a CallbackRegistry, data: &'a StaticData) -> Self {
        Self { callbacks, data }
    }

    /// Load a scene file into `world`. See [`load_value`](Self::load_value).
    pub fn load_file(
        &self,
        world: &mut World,
        path: impl AsRef<Path>,
        position: Option<Vec2>,
    ) -> EngineResult<Vec<Entity>> {
        let path = path.as_ref();
        let doc: Value = read_json_file(path)?;
        let entities = self.load_value(world, &doc, position)?;
        log::info!("Loaded {} entities from {}", entities.len(), path.display());
        Ok(entities)
    }

    pub fn load_str(
        &self,
        world: &mut World,
        json: &str,
        position: Option<Vec2>,
    ) -> EngineResult<Vec<Entity>> {
        let doc: Value = serde_json::from_str(json)?;
        self.load_value(world, &doc, position)
    }

    /// Create one entity per element of the document's `entities` array.
    ///
    /// A document without an `entities` array is rejected before anything is
    /// created. Past that point, problems with individual entities or fields
    /// are logged and defaulted. When `position` is given and both
    /// coordinates are non-negative, it replaces every loaded Transform
    /// position.
    pub fn load_value(
        &self,
        world: &mut World,
        doc: &Value,
        position: Option<Vec2>,
    ) -> EngineResult<Vec<Entity>> {
        let list = doc
            .get("entities")
            .and_then(Value::as_array)
            .ok_or_else(|| EngineError::MalformedScene("missing 'entities' array".into()))?;

        components::register_all(world)?;
        let position = position.filter(|p| p.x >= 0.0 && p.y >= 0.0);
        let mut reported = HashSet::new();
        let mut created = Vec::with_capacity(list.len());
        for (index, item) in list.iter().enumerate() {
            let entity = world.create_entity()?;
            created.push(entity);

            match item.get("type").and_then(Value::as_str) {
                Some(name) => world.set_entity_name(entity, name)?,
                None => log::warn!(
                    "{}; created entity {entity} without a name",
                    EngineError::MissingEntityType { index }
                ),
            }

            let empty = Map::new();
            let components = match item.get("components") {
                Some(Value::Object(map)) => map,
                Some(_) => {
                    log::warn!("Entity {entity}: 'components' is not an object");
                    &empty
                }
                None => &empty,
            };
            let mut ctx = EntityContext {
                world: &mut *world,
                entity,
                kind: item.get("type").and_then(Value::as_str).unwrap_or_default(),
                position,
                reported: &mut reported,
            };
            self.hydrate(&mut ctx, components)?;
        }
        Ok(created)
    }

    fn hydrate(&self, ctx: &mut EntityContext<'_>, components: &Map<String, Value>) -> EngineResult<()> {
        let entity = ctx.entity;

        let mut tagged = false;
        if let Some(r) = component(components, entity, "Transform") {
            let mut t = Transform {
                position: r.pair("x", "y", Vec2::ZERO),
                scale: r.pair("scaleX", "scaleY", Vec2::ZERO),
                rotation: r.f32("rotation", 0.0),
                tag: String::new(),
            };
            if let Some(p) = ctx.position {
                log::debug!("Entity {entity}: position overridden to {p}");
                t.position = p;
            }
            if let Some(raw) = r.opt_string("tag") {
                let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
                for tag in cleaned.split(',').filter(|s| !s.is_empty()) {
                    ctx.world.add_tag(entity, tag)?;
                    tagged = true;
                }
                t.tag = cleaned;
            }
            if !tagged {
                t.tag = default_tag(entity);
            }
            ctx.world.add_component(entity, t)?;
        }
        if !tagged {
            ctx.world.add_tag(entity, &default_tag(entity))?;
        }

        if let Some(r) = component(components, entity, "Render") {
            add(ctx, Render {
                texture: r.string("textureID", ""),
                color: r.color("color", Color::ZERO),
                alpha: r.f32("alpha", 1.0),
                render_type: r.named("renderType", RenderType::Sprite),
                active: r.bool("isActive", true),
            })?;
        }

        if let Some(r) = component(components, entity, "Layer") {
            let layer = match r.raw("LayerID") {
                None => LayerId::Background,
                Some(v @ Value::String(s)) => reader::variant(v).unwrap_or_else(|| {
                    r.warn("LayerID", &format!("unknown layer '{s}'"));
                    LayerId::Background
                }),
                Some(v) => v.as_i64().and_then(LayerId::from_index).unwrap_or_else(|| {
                    r.warn("LayerID", "expected a layer name or 0..=4");
                    LayerId::Background
                }),
            };
            add(ctx, Layer {
                layer,
                sort_id: r.u32("SortID", 0),
            })?;
        }

        if let Some(r) = component(components, entity, "Text") {
            add(ctx, Text {
                text: r.string("text", ""),
                font_size: r.f32("fontSize", 0.0),
                color: r.color("color", Color::ZERO),
                font_name: r.string("fontName", ""),
                offset: r.vec2("offset", Vec2::ZERO),
            })?;
        }

        if let Some(r) = component(components, entity, "Player") {
            add(ctx, Player {
                current_text: r.string("CurrentText", ""),
                kind: r.named("type", PlayerKind::Player),
                health: r.f32("health", 100.0),
            })?;
        }

        if let Some(r) = component(components, entity, "Spawner") {
            add(ctx, Spawner {
                accumulated_time: r.f32("accumulatedTime", 0.0),
                spawn_interval: r.f32("spawnInterval", 0.0),
            })?;
        }

        if let Some(r) = component(components, entity, "Movement") {
            add(ctx, Movement {
                velocity: r.pair("x", "y", Vec2::ZERO),
                base_velocity: r.pair("baseX", "baseY", Vec2::ZERO),
            })?;
        }

        if let Some(r) = component(components, entity, "Collision") {
            add(ctx, Collision {
                kind: r.named("type", ObjectType::CollidableObject),
                collided: r.bool("collided", false),
                radius: r.f32("radius", 0.0),
                scale: r.pair("collisionScaleX", "collisionScaleY", Vec2::ZERO),
            })?;
        }

        if let Some(r) = component(components, entity, "Enemy") {
            let health = r.f32("health", 0.0);
            let behavior = r.opt_string("UpdateFunctionName").map(|name| {
                let handle = self.callbacks.behavior(&name);
                ctx.report_unresolved(handle.is_some(), "behavior", &name);
                Callback::new(name, handle)
            });
            add(ctx, Enemy {
                kind: r.named("type", EnemyType::Minion),
                health,
                predicted_health: r.f32("predictedHealth", health),
                max_health: r.f32("maxHealth", health),
                behavior,
                spawned: r.bool("spawned", false),
                spawn_rate: r.f32("spawnRate", 0.0),
                spawn_timer: r.f32("spawnTimer", 0.0),
            })?;
        }

        if let Some(r) = component(components, entity, "Animation") {
            let base = r
                .opt_string("name")
                .and_then(|name| self.data.animation(&name))
                .or_else(|| self.data.animation(ctx.kind))
                .map(|a| Animation {
                    speed: a.animation_speed,
                    cols: a.cols,
                    rows: a.rows,
                })
                .unwrap_or_default();
            add(ctx, Animation {
                speed: r.f32("animationSpeed", base.speed),
                cols: r.u32("cols", base.cols),
                rows: r.u32("rows", base.rows),
            })?;
        }

        if let Some(r) = component(components, entity, "Bullet") {
            let multiplier = self
                .data
                .bullet(BULLET_KEY)
                .map_or(Bullet::default().damage_multiplier, |b| b.damage_multiplier);
            add(ctx, Bullet {
                target_id: r.u32("targetId", 0),
                damage_multiplier: r.i32("damageMultiplier", multiplier),
            })?;
        }

        if let Some(r) = component(components, entity, "Button") {
            let on_click = r.opt_string("onClick").map(|name| {
                let handle = self.callbacks.button(&name);
                ctx.report_unresolved(handle.is_some(), "button", &name);
                Callback::new(name, handle)
            });
            add(ctx, Button {
                label: r.string("label", "DefaultLabel"),
                idle_texture: r.string("idleTextureID", ""),
                hover_texture: r.string("hoverTextureID", ""),
                pressed_texture: r.string("pressedTextureID", ""),
                press_cooldown: r.f32("pressCooldown", 0.2),
                on_click,
                pressed_audio: r.string("PressedAudio", ""),
                hover_audio: r.string("HoverAudio", ""),
                first_hover: r.bool("FirstHover", true),
                press_time_remaining: r.f32("pressTimeRemaining", 0.0),
                state: r.named("state", ButtonState::Idle),
            })?;
        }

        if let Some(r) = component(components, entity, "Timeline") {
            let mut transition = |key: &str| {
                r.opt_string(key).map(|name| {
                    let handle = self.callbacks.transition(&name);
                    ctx.report_unresolved(handle.is_some(), "transition", &name);
                    Callback::new(name, handle)
                })
            };
            let transition_in = transition("TransitionInFunctionName");
            let transition_out = transition("TransitionOutFunctionName");
            add(ctx, Timeline {
                internal_timer: r.f32("InternalTimer", 0.0),
                transition_duration: r.f32("TransitionDuration", 1.0),
                transition_in_delay: r.f32("TransitionInDelay", 1.0),
                transition_out_delay: r.f32("TransitionOutDelay", 1.0),
                transition_in,
                transition_out,
                active: r.bool("Active", false),
                transitioning_in: r.bool("IsTransitioningIn", true),
                tag: r.string("TimelineTag", "DefaultTag"),
                start_position: r.f32("startPosition", 0.0),
                end_position: r.f32("endPosition", 0.0),
            })?;
        }

        if let Some(r) = component(components, entity, "Particle") {
            add(ctx, ParticleEmitter {
                position: r.pair("positionX", "positionY", Vec2::ZERO),
                velocity: r.pair("velocityX", "velocityY", Vec2::ZERO),
                color: Color::new(
                    r.f32("colorR", WHITE.x),
                    r.f32("colorG", WHITE.y),
                    r.f32("colorB", WHITE.z),
                ),
                size: r.f32("size", 1.0),
                life: r.f32("life", 1.0),
                active: r.bool("active", false),
                emission_rate: r.u32("emissionRate", 1),
                emit_delay: r.f32("emitDelay", 0.0),
                emit_timer: r.f32("emitTimer", 0.0),
                texture: r.string("textureName", ""),
                shape: r.named("shape", EmissionShape::Circle),
                radius: r.f32("radius", 0.0),
                box_size: r.pair("boxSizeX", "boxSizeY", Vec2::ZERO),
                spiral_turns: r.f32("spiralTurns", 0.0),
                cone_angle: r.f32("coneAngle", 0.0),
            })?;
        }

        if let Some(r) = component(components, entity, "UIBar") {
            add(ctx, UiBar {
                backing_texture: r.string("backingTextureID", ""),
                fill_texture: r.string("fillTextureID", ""),
                fill_percentage: r.f32("fillPercentage", 1.0),
                offset: r.pair("offsetX", "offsetY", Vec2::ZERO),
                scale: r.pair("scaleX", "scaleY", Vec2::ONE),
                fill_offset: r.pair("fillOffsetX", "fillOffsetY", Vec2::ZERO),
                fill_size: r.pair("fillSizeX", "fillSizeY", Vec2::ONE),
                fill_color: r.color("fillColor", WHITE),
                fill_alpha: r.f32("fillAlpha", 1.0),
                bg_color: r.color("bgColor", Color::ZERO),
                bg_alpha: r.f32("bgAlpha", 1.0),
            })?;
        }

        Ok(())
    }
}

/// Per-entity state threaded through hydration.
struct EntityContext<'w> {
    world: &'w mut World,
    entity: Entity,
    /// The entity's `type`, or `""`.
    kind: &'w str,
    position: Option<Vec2>,
    /// Callback names already warned about during this load.
    reported: &'w mut HashSet<String>,
}

impl EntityContext<'_> {
    fn report_unresolved(&mut self, resolved: bool, kind: &str, name: &str) {
        if !resolved && self.reported.insert(format!("{kind}:{name}")) {
            log::warn!("Entity {}: {kind} callback '{name}' is not registered", self.entity);
        }
    }
}

fn add<T: Component>(ctx: &mut EntityContext<'_>, value: T) -> EngineResult<()> {
    ctx.world.add_component(ctx.entity, value)
}

pub(crate) fn default_tag(entity: Entity) -> String {
    format!("{DEFAULT_TAG_PREFIX}{entity}")
}

/// The component object stored under `"<name>Component"` or `"<name>"`.
fn component<'v>(
    components: &'v Map<String, Value>,
    entity: Entity,
    name: &'static str,
) -> Option<FieldReader<'v>> {
    let value = components
        .get(&format!("{name}Component"))
        .or_else(|| components.get(name))?;
    match value {
        Value::Object(fields) => Some(FieldReader::new(fields, entity, name)),
        _ => {
            log::warn!("Entity {entity}: {name} is not an object; skipped");
            None
        }
    }
}
