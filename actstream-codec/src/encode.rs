//! Encoder: entities to JSON values.

use crate::error::{CodecError, CodecResult};
use crate::registry::Tables;
use actstream_model::{Entity, Value, OBJECT_TYPE};
use chrono::SecondsFormat;
use serde_json::{Map, Value as JsonValue};

pub(crate) struct Encoder<'a> {
    tables: &'a Tables,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Encodes an entity as a JSON object. The discriminator, when the entity
    /// carries one, comes first; properties follow in insertion order.
    pub(crate) fn encode_entity(&self, entity: &Entity) -> CodecResult<Map<String, JsonValue>> {
        self.encode_entity_except(entity, None)
    }

    /// Like [`Encoder::encode_entity`] but leaves out one property.
    pub(crate) fn encode_entity_except(
        &self,
        entity: &Entity,
        skip: Option<&str>,
    ) -> CodecResult<Map<String, JsonValue>> {
        let mut object = Map::with_capacity(entity.len() + 1);
        if let Some(object_type) = entity.object_type() {
            object.insert(OBJECT_TYPE.to_string(), JsonValue::String(object_type.to_string()));
        }
        for (name, value) in entity.iter() {
            if skip == Some(name) {
                continue;
            }
            object.insert(name.to_string(), self.encode_value(value)?);
        }
        Ok(object)
    }

    pub(crate) fn encode_value(&self, value: &Value) -> CodecResult<JsonValue> {
        // Verbs always take their canonical token, whatever is registered.
        if let Value::Verb(verb) = value {
            return Ok(JsonValue::String(verb.as_token().to_string()));
        }
        if let Some(serializer) = self.tables.serializer(value.type_name()) {
            return serializer(value).map_err(|reason| CodecError::Serializer {
                type_name: value.type_name().to_string(),
                reason,
            });
        }

        let json = match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::DateTime(dt) => JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Verb(verb) => JsonValue::String(verb.as_token().to_string()),
            Value::Typed(typed) => typed.payload().clone(),
            Value::Entity(entity) => JsonValue::Object(self.encode_entity(entity)?),
            Value::Seq(items) => JsonValue::Array(
                items
                    .iter()
                    .map(|item| self.encode_value(item))
                    .collect::<CodecResult<Vec<_>>>()?,
            ),
        };
        Ok(json)
    }
}
