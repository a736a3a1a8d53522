//! Entities → scene document.
//!
//! The inverse of [`SceneLoader`](super::SceneLoader): same keys, enums
//! written as their canonical strings, Layer written as its index. Component
//! keys always carry the `Component` suffix.

use std::path::Path;

use serde_json::{Map, Value, json};

use crate::asset::write_json_file;
use crate::callbacks::Callback;
use crate::components::{
    Animation, Bullet, Button, Collision, Enemy, Layer, Movement, ParticleEmitter, Player, Render,
    Spawner, Text, Timeline, Transform, UiBar,
};
use crate::ecs::{Entity, World};
use crate::error::EngineResult;
use crate::math::{Color, Vec2};

/// Serialize every live entity, in ascending id order.
pub fn save_value(world: &World) -> Value {
    let entities: Vec<Value> = world
        .living_entities()
        .into_iter()
        .map(|e| entity_value(world, e))
        .collect();
    json!({ "entities": entities })
}

pub fn save_to_string(world: &World) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(&save_value(world))?)
}

/// Write the scene to `path`, replacing it.
pub fn save_to_file(world: &World, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    write_json_file(path, &save_value(world))?;
    log::info!("Saved {} entities to {}", world.entity_count(), path.display());
    Ok(())
}

fn entity_value(world: &World, entity: Entity) -> Value {
    let mut c = Map::new();

    if let Some(t) = world.get::<Transform>(entity) {
        c.insert(
            "TransformComponent".into(),
            json!({
                "x": t.position.x,
                "y": t.position.y,
                "scaleX": t.scale.x,
                "scaleY": t.scale.y,
                "rotation": t.rotation,
                "tag": t.tag,
            }),
        );
    }
    if let Some(r) = world.get::<Render>(entity) {
        c.insert(
            "RenderComponent".into(),
            json!({
                "textureID": r.texture,
                "color": color(r.color),
                "alpha": r.alpha,
                "renderType": r.render_type,
                "isActive": r.active,
            }),
        );
    }
    if let Some(l) = world.get::<Layer>(entity) {
        c.insert(
            "LayerComponent".into(),
            json!({ "LayerID": l.layer.index(), "SortID": l.sort_id }),
        );
    }
    if let Some(t) = world.get::<Text>(entity) {
        c.insert(
            "TextComponent".into(),
            json!({
                "text": t.text,
                "fontSize": t.font_size,
                "color": color(t.color),
                "fontName": t.font_name,
                "offset": vec2(t.offset),
            }),
        );
    }
    if let Some(p) = world.get::<Player>(entity) {
        c.insert(
            "PlayerComponent".into(),
            json!({
                "CurrentText": p.current_text,
                "type": p.kind,
                "health": p.health,
            }),
        );
    }
    if let Some(s) = world.get::<Spawner>(entity) {
        c.insert(
            "SpawnerComponent".into(),
            json!({
                "accumulatedTime": s.accumulated_time,
                "spawnInterval": s.spawn_interval,
            }),
        );
    }
    if let Some(m) = world.get::<Movement>(entity) {
        c.insert(
            "MovementComponent".into(),
            json!({
                "x": m.velocity.x,
                "y": m.velocity.y,
                "baseX": m.base_velocity.x,
                "baseY": m.base_velocity.y,
            }),
        );
    }
    if let Some(col) = world.get::<Collision>(entity) {
        c.insert(
            "CollisionComponent".into(),
            json!({
                "type": col.kind,
                "collided": col.collided,
                "radius": col.radius,
                "collisionScaleX": col.scale.x,
                "collisionScaleY": col.scale.y,
            }),
        );
    }
    if let Some(e) = world.get::<Enemy>(entity) {
        let mut obj = json!({
            "type": e.kind,
            "health": e.health,
            "predictedHealth": e.predicted_health,
            "maxHealth": e.max_health,
            "spawned": e.spawned,
            "spawnRate": e.spawn_rate,
            "spawnTimer": e.spawn_timer,
        });
        put_callback(&mut obj, "UpdateFunctionName", &e.behavior);
        c.insert("EnemyComponent".into(), obj);
    }
    if let Some(a) = world.get::<Animation>(entity) {
        c.insert(
            "AnimationComponent".into(),
            json!({ "animationSpeed": a.speed, "rows": a.rows, "cols": a.cols }),
        );
    }
    if let Some(b) = world.get::<Bullet>(entity) {
        c.insert(
            "BulletComponent".into(),
            json!({ "targetId": b.target_id, "damageMultiplier": b.damage_multiplier }),
        );
    }
    if let Some(b) = world.get::<Button>(entity) {
        let mut obj = json!({
            "label": b.label,
            "idleTextureID": b.idle_texture,
            "hoverTextureID": b.hover_texture,
            "pressedTextureID": b.pressed_texture,
            "pressCooldown": b.press_cooldown,
            "PressedAudio": b.pressed_audio,
            "HoverAudio": b.hover_audio,
            "FirstHover": b.first_hover,
            "pressTimeRemaining": b.press_time_remaining,
            "state": b.state,
        });
        put_callback(&mut obj, "onClick", &b.on_click);
        c.insert("ButtonComponent".into(), obj);
    }
    if let Some(t) = world.get::<Timeline>(entity) {
        let mut obj = json!({
            "InternalTimer": t.internal_timer,
            "TransitionDuration": t.transition_duration,
            "TransitionInDelay": t.transition_in_delay,
            "TransitionOutDelay": t.transition_out_delay,
            "Active": t.active,
            "IsTransitioningIn": t.transitioning_in,
            "TimelineTag": t.tag,
            "startPosition": t.start_position,
            "endPosition": t.end_position,
        });
        put_callback(&mut obj, "TransitionInFunctionName", &t.transition_in);
        put_callback(&mut obj, "TransitionOutFunctionName", &t.transition_out);
        c.insert("TimelineComponent".into(), obj);
    }
    if let Some(p) = world.get::<ParticleEmitter>(entity) {
        c.insert(
            "ParticleComponent".into(),
            json!({
                "positionX": p.position.x,
                "positionY": p.position.y,
                "velocityX": p.velocity.x,
                "velocityY": p.velocity.y,
                "colorR": p.color.x,
                "colorG": p.color.y,
                "colorB": p.color.z,
                "size": p.size,
                "life": p.life,
                "active": p.active,
                "emissionRate": p.emission_rate,
                "emitDelay": p.emit_delay,
                "emitTimer": p.emit_timer,
                "textureName": p.texture,
                "shape": p.shape,
                "radius": p.radius,
                "boxSizeX": p.box_size.x,
                "boxSizeY": p.box_size.y,
                "spiralTurns": p.spiral_turns,
                "coneAngle": p.cone_angle,
            }),
        );
    }
    if let Some(u) = world.get::<UiBar>(entity) {
        c.insert(
            "UIBarComponent".into(),
            json!({
                "backingTextureID": u.backing_texture,
                "fillTextureID": u.fill_texture,
                "fillPercentage": u.fill_percentage,
                "offsetX": u.offset.x,
                "offsetY": u.offset.y,
                "scaleX": u.scale.x,
                "scaleY": u.scale.y,
                "fillOffsetX": u.fill_offset.x,
                "fillOffsetY": u.fill_offset.y,
                "fillSizeX": u.fill_size.x,
                "fillSizeY": u.fill_size.y,
                "fillColor": color(u.fill_color),
                "fillAlpha": u.fill_alpha,
                "bgColor": color(u.bg_color),
                "bgAlpha": u.bg_alpha,
            }),
        );
    }

    json!({
        "type": world.entity_name(entity).unwrap_or_default(),
        "components": c,
    })
}

fn color(c: Color) -> Value {
    json!([c.x, c.y, c.z])
}

fn vec2(v: Vec2) -> Value {
    json!([v.x, v.y])
}

/// Unset callbacks are omitted rather than written as empty names.
fn put_callback<F>(obj: &mut Value, key: &str, callback: &Option<Callback<F>>) {
    if let (Some(cb), Value::Object(map)) = (callback, obj) {
        map.insert(key.into(), Value::String(cb.name.clone()));
    }
}
