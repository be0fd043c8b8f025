//! Structural decoder: JSON objects to entities.
//!
//! Walks an object's fields, looks each one up in the property-type table,
//! and recurses through arrays and nested objects without a depth limit.
//! Every call gets its own `Decoder`; the only shared state is the registry
//! snapshot it reads from.

use crate::coerce::{coerce, default_scalar};
use crate::config::{CodecConfig, CoercionPolicy};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{CodecError, CodecResult};
use crate::registry::{Tables, ValueType};
use actstream_model::{is_discriminator, Entity, EntityKind, Value};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

pub(crate) type JsonObject = Map<String, JsonValue>;

pub(crate) struct Decoder<'a> {
    pub(crate) tables: &'a Tables,
    pub(crate) config: &'a CodecConfig,
    pub(crate) diagnostics: Vec<Diagnostic>,
    path: Vec<String>,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(tables: &'a Tables, config: &'a CodecConfig) -> Self {
        Self {
            tables,
            config,
            diagnostics: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Decodes one JSON object into an entity.
    pub(crate) fn decode_object(
        &mut self,
        object: &JsonObject,
        hint: Option<&EntityKind>,
    ) -> CodecResult<Entity> {
        let tables = self.tables;
        let mut builder = self.resolve(object, hint)?;

        for (name, raw) in object {
            if is_discriminator(name) {
                continue;
            }
            let declared = tables.property_type(name);
            self.path.push(escape_pointer(name));
            let value = self.decode_value(raw, declared);
            self.path.pop();
            builder.insert(name.as_str(), value?);
        }

        Ok(builder.build())
    }

    /// Decodes a property value. Array elements share the declared type of
    /// the property that holds them.
    fn decode_value(
        &mut self,
        raw: &JsonValue,
        declared: Option<&ValueType>,
    ) -> CodecResult<Value> {
        match raw {
            JsonValue::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    self.path.push(index.to_string());
                    let item = self.decode_value(element, declared);
                    self.path.pop();
                    items.push(item?);
                }
                Ok(Value::Seq(items))
            }
            JsonValue::Object(object) => {
                let hint = declared.and_then(ValueType::as_kind);
                self.decode_object(object, hint).map(Value::Entity)
            }
            scalar => self.coerce_scalar(scalar, declared),
        }
    }

    fn coerce_scalar(&mut self, raw: &JsonValue, declared: Option<&ValueType>) -> CodecResult<Value> {
        match coerce(raw, declared) {
            Ok(value) => Ok(value),
            Err(reason) => {
                let type_name = declared.map(ValueType::name).unwrap_or("untyped").to_string();
                match self.config.coercion {
                    CoercionPolicy::Strict => Err(CodecError::Coercion {
                        property: self.pointer(),
                        type_name,
                        reason,
                    }),
                    CoercionPolicy::Lenient => {
                        let message = format!("kept untyped value, not a valid {type_name}: {reason}");
                        self.report(DiagnosticKind::CoercionFallback, message);
                        Ok(default_scalar(raw))
                    }
                }
            }
        }
    }

    /// Records a recovered failure and logs it.
    pub(crate) fn report(&mut self, kind: DiagnosticKind, message: String) {
        let path = self.pointer();
        warn!(path = %path, kind = ?kind, "{}", message);
        self.diagnostics.push(Diagnostic { kind, path, message });
    }

    /// JSON pointer to the value currently being decoded.
    pub(crate) fn pointer(&self) -> String {
        self.path.iter().map(|segment| format!("/{segment}")).collect()
    }
}

/// Escapes a key for use as a JSON pointer segment (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
