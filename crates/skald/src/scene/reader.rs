//! Typed, defaulting field access over one component object.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ecs::Entity;
use crate::math::{Color, Vec2};

/// Reads fields of a single component object in a scene document.
///
/// Every getter takes the field's default. A missing field yields the default
/// quietly; a field that is present with the wrong type yields the default
/// and logs a warning naming the entity, component, and field.
pub(crate) struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    entity: Entity,
    component: &'static str,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Map<String, Value>, entity: Entity, component: &'static str) -> Self {
        Self {
            fields,
            entity,
            component,
        }
    }

    pub fn f32(&self, key: &str, default: f32) -> f32 {
        self.read(key, default, |v| v.as_f64().map(|n| n as f32), "a number")
    }

    pub fn u32(&self, key: &str, default: u32) -> u32 {
        self.read(key, default, as_u32, "a non-negative integer")
    }

    pub fn i32(&self, key: &str, default: i32) -> i32 {
        self.read(
            key,
            default,
            |v| {
                v.as_i64()
                    .or_else(|| v.as_f64().filter(|n| n.fract() == 0.0).map(|n| n as i64))
                    .and_then(|n| i32::try_from(n).ok())
            },
            "an integer",
        )
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        self.read(key, default, Value::as_bool, "a boolean")
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.read(
            key,
            default.to_string(),
            |v| v.as_str().map(str::to_string),
            "a string",
        )
    }

    /// A string field that is absent or empty reads as `None`.
    pub fn opt_string(&self, key: &str) -> Option<String> {
        Some(self.string(key, "")).filter(|s| !s.is_empty())
    }

    /// `[x, y]`.
    pub fn vec2(&self, key: &str, default: Vec2) -> Vec2 {
        self.read(
            key,
            default,
            |v| numbers::<2>(v).map(|[x, y]| Vec2::new(x, y)),
            "an [x, y] array",
        )
    }

    /// `[r, g, b]`.
    pub fn color(&self, key: &str, default: Color) -> Color {
        self.read(
            key,
            default,
            |v| numbers::<3>(v).map(|[r, g, b]| Color::new(r, g, b)),
            "an [r, g, b] array",
        )
    }

    /// Two scalar fields, e.g. `x` and `y`.
    pub fn pair(&self, x: &str, y: &str, default: Vec2) -> Vec2 {
        Vec2::new(self.f32(x, default.x), self.f32(y, default.y))
    }

    /// A string naming an enum variant by its serde name.
    pub fn named<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.fields.get(key) else {
            return default;
        };
        match value.as_str() {
            Some(s) => variant(value).unwrap_or_else(|| {
                self.warn(key, &format!("unknown value '{s}'"));
                default
            }),
            None => {
                self.warn(key, "expected a string");
                default
            }
        }
    }

    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }

    pub fn warn(&self, key: &str, problem: &str) {
        log::warn!(
            "Entity {}: {}.{key}: {problem}, using default",
            self.entity,
            self.component
        );
    }

    fn read<T>(&self, key: &str, default: T, get: impl FnOnce(&Value) -> Option<T>, expected: &str) -> T {
        let Some(value) = self.fields.get(key) else {
            return default;
        };
        match get(value) {
            Some(v) => v,
            None => {
                self.warn(key, &format!("expected {expected}"));
                default
            }
        }
    }
}

/// The enum variant whose serde name is the string in `value`.
pub(crate) fn variant<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

fn as_u32(v: &Value) -> Option<u32> {
    v.as_u64()
        .or_else(|| {
            v.as_f64()
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u64)
        })
        .and_then(|n| u32::try_from(n).ok())
}

fn numbers<const N: usize>(v: &Value) -> Option<[f32; N]> {
    let items = v.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64()? as f32;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::components::{ButtonState, EmissionShape};

    fn fields(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn numbers_accept_ints_and_floats() {
        let m = fields(json!({"a": 5, "b": 2.5, "c": "nope"}));
        let r = FieldReader::new(&m, Entity::from_raw(0), "Test");
        assert_eq!(r.f32("a", 0.0), 5.0);
        assert_eq!(r.f32("b", 0.0), 2.5);
        assert_eq!(r.f32("c", 7.0), 7.0);
        assert_eq!(r.f32("missing", 1.5), 1.5);
    }

    #[test]
    fn unsigned_rejects_negative_and_fractional() {
        let m = fields(json!({"a": 3, "b": -1, "c": 2.5, "d": 4.0}));
        let r = FieldReader::new(&m, Entity::from_raw(0), "Test");
        assert_eq!(r.u32("a", 0), 3);
        assert_eq!(r.u32("b", 9), 9);
        assert_eq!(r.u32("c", 9), 9);
        assert_eq!(r.u32("d", 0), 4);
    }

    #[test]
    fn arrays_need_exact_length() {
        let m = fields(json!({"c": [1, 0.5, 0], "short": [1, 2], "v": [3, 4]}));
        let r = FieldReader::new(&m, Entity::from_raw(0), "Test");
        assert_eq!(r.color("c", Color::ZERO), Color::new(1.0, 0.5, 0.0));
        assert_eq!(r.color("short", Color::ONE), Color::ONE);
        assert_eq!(r.vec2("v", Vec2::ZERO), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn named_falls_back_on_unknown() {
        let m = fields(json!({"k": "Hover", "bad": "Sideways", "num": 3, "shape": "SPIRAL"}));
        let r = FieldReader::new(&m, Entity::from_raw(0), "Test");
        assert_eq!(r.named("k", ButtonState::Idle), ButtonState::Hover);
        assert_eq!(r.named("bad", ButtonState::Idle), ButtonState::Idle);
        assert_eq!(r.named("num", ButtonState::Pressed), ButtonState::Pressed);
        assert_eq!(r.named("shape", EmissionShape::Circle), EmissionShape::Spiral);
    }

    #[test]
    fn empty_string_is_none() {
        let m = fields(json!({"a": "", "b": "Chase"}));
        let r = FieldReader::new(&m, Entity::from_raw(0), "Test");
        assert_eq!(r.opt_string("a"), None);
        assert_eq!(r.opt_string("b").as_deref(), Some("Chase"));
        assert_eq!(r.opt_string("c"), None);
    }
}
