use crate::{Entity, Verb};
use chrono::{DateTime, FixedOffset};
use serde_json::Number;
use std::sync::Arc;

/// A property value inside an [`Entity`].
///
/// Key absence and an explicit [`Value::Null`] are different things: the
/// former is simply not in the property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Keeps the integral/float distinction of the JSON it came from.
    Number(Number),
    String(String),
    DateTime(DateTime<FixedOffset>),
    Verb(Verb),
    /// A scalar of an application-registered value type.
    Typed(TypedValue),
    Entity(Entity),
    Seq(Vec<Value>),
}

/// A scalar whose meaning belongs to a registered value type.
///
/// The codec does not interpret `payload`; the registered parser decides what
/// to keep and the registered serializer (if any) decides how to emit it.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    type_name: Arc<str>,
    payload: serde_json::Value,
}

impl TypedValue {
    pub fn new(type_name: impl Into<Arc<str>>, payload: serde_json::Value) -> Self {
        Self {
            type_name: type_name.into(),
            payload,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn into_payload(self) -> serde_json::Value {
        self.payload
    }
}

impl Value {
    /// Creates a typed scalar value.
    pub fn typed(type_name: impl Into<Arc<str>>, payload: serde_json::Value) -> Self {
        Value::Typed(TypedValue::new(type_name, payload))
    }

    /// The runtime kind name used to look up custom serializers.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Verb(_) => "verb",
            Value::Typed(typed) => typed.type_name(),
            Value::Entity(_) => "entity",
            Value::Seq(_) => "sequence",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_verb(&self) -> Option<&Verb> {
        match self {
            Value::Verb(verb) => Some(verb),
            _ => None,
        }
    }

    pub fn as_typed(&self) -> Option<&TypedValue> {
        match self {
            Value::Typed(typed) => Some(typed),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

/// Non-finite floats have no JSON form and become [`Value::Null`].
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Verb> for Value {
    fn from(verb: Verb) -> Self {
        Value::Verb(verb)
    }
}

impl From<TypedValue> for Value {
    fn from(typed: TypedValue) -> Self {
        Value::Typed(typed)
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        Value::Entity(entity)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
