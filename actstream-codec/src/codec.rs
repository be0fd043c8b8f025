use crate::coerce::json_kind;
use crate::config::CodecConfig;
use crate::decode::Decoder;
use crate::diagnostics::Decoded;
use crate::encode::Encoder;
use crate::error::{CodecError, CodecResult};
use crate::registry::{TypeRegistry, ValueType};
use crate::stream::CollectionWriter;
use actstream_model::{Builder, Entity, EntityKind, Value};
use serde_json::Value as JsonValue;
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::debug;

/// Reads and writes Activity Streams JSON documents.
///
/// A codec pairs a [`TypeRegistry`] with a [`CodecConfig`]. It holds no
/// per-call state, so one codec can serve many threads at once, and several
/// codecs can share a registry.
///
/// # Example
///
/// ```
/// use actstream_codec::Codec;
/// use actstream_model::{EntityKind, Verb};
///
/// let codec = Codec::new();
/// let activity = codec
///     .read(r#"{"verb":"post","actor":{"objectType":"person","displayName":"James"}}"#)
///     .unwrap();
///
/// assert_eq!(activity.kind(), &EntityKind::Activity);
/// assert_eq!(activity.verb(), Some(&Verb::Post));
/// assert_eq!(activity.actor().and_then(|a| a.display_name()), Some("James"));
/// ```
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
    config: CodecConfig,
}

impl Codec {
    /// A codec with the built-in registry and default configuration.
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// A codec with the built-in registry.
    pub fn with_config(config: CodecConfig) -> Self {
        Self::with_registry(Arc::new(TypeRegistry::new()), config)
    }

    /// A codec over a registry that may be shared with other codecs.
    pub fn with_registry(registry: Arc<TypeRegistry>, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // ── Registration ────────────────────────────────────────────────

    pub fn register_entity_kind<F>(&self, discriminator: &str, factory: F)
    where
        F: Fn(&str) -> actstream_model::Result<Builder> + Send + Sync + 'static,
    {
        self.registry.register_entity_kind(discriminator, factory);
    }

    pub fn register_property_type(&self, name: &str, value_type: ValueType) {
        self.registry.register_property_type(name, value_type);
    }

    pub fn register_serializer<F>(&self, type_name: &str, serializer: F)
    where
        F: Fn(&Value) -> Result<JsonValue, String> + Send + Sync + 'static,
    {
        self.registry.register_serializer(type_name, serializer);
    }

    // ── Reading ─────────────────────────────────────────────────────

    /// Parses a document whose root must be a JSON object.
    pub fn read(&self, text: &str) -> CodecResult<Entity> {
        self.read_reported(text).map(|decoded| decoded.entity)
    }

    pub fn read_slice(&self, bytes: &[u8]) -> CodecResult<Entity> {
        let json: JsonValue = serde_json::from_slice(bytes)?;
        self.read_value(&json)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> CodecResult<Entity> {
        let json: JsonValue = serde_json::from_reader(reader)?;
        self.read_value(&json)
    }

    /// Decodes an already parsed JSON value.
    pub fn read_value(&self, json: &JsonValue) -> CodecResult<Entity> {
        self.decode(json, None).map(|decoded| decoded.entity)
    }

    /// Parses a document whose kind the caller already knows.
    pub fn read_as(&self, text: &str, kind: EntityKind) -> CodecResult<Entity> {
        let json: JsonValue = serde_json::from_str(text)?;
        self.decode(&json, Some(&kind)).map(|decoded| decoded.entity)
    }

    pub fn read_activity(&self, text: &str) -> CodecResult<Entity> {
        self.read_as(text, EntityKind::Activity)
    }

    pub fn read_collection(&self, text: &str) -> CodecResult<Entity> {
        self.read_as(text, EntityKind::Collection)
    }

    /// Parses a document and returns every failure the decoder recovered from
    /// alongside the entity.
    pub fn read_reported(&self, text: &str) -> CodecResult<Decoded> {
        let json: JsonValue = serde_json::from_str(text)?;
        self.decode(&json, None)
    }

    fn decode(&self, json: &JsonValue, hint: Option<&EntityKind>) -> CodecResult<Decoded> {
        let JsonValue::Object(object) = json else {
            return Err(CodecError::MalformedDocument(format!(
                "expected a JSON object at the document root, found {}",
                json_kind(json)
            )));
        };

        let tables = self.registry.snapshot();
        let mut decoder = Decoder::new(&tables, &self.config);
        let entity = decoder.decode_object(object, hint)?;
        debug!(
            kind = %entity.kind(),
            properties = entity.len(),
            diagnostics = decoder.diagnostics.len(),
            "Decoded document"
        );
        Ok(Decoded {
            entity,
            diagnostics: decoder.diagnostics,
        })
    }

    // ── Writing ─────────────────────────────────────────────────────

    pub fn to_value(&self, entity: &Entity) -> CodecResult<JsonValue> {
        let tables = self.registry.snapshot();
        let object = Encoder::new(&tables).encode_entity(entity)?;
        Ok(JsonValue::Object(object))
    }

    /// Serializes an entity, pretty-printed if the config asks for it.
    pub fn write(&self, entity: &Entity) -> CodecResult<String> {
        let json = self.to_value(entity)?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        Ok(text)
    }

    pub fn write_to<W: Write>(&self, entity: &Entity, mut writer: W) -> CodecResult<()> {
        let json = self.to_value(entity)?;
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut writer, &json)?;
        } else {
            serde_json::to_writer(&mut writer, &json)?;
        }
        writer.flush()?;
        Ok(())
    }

    // ── Streaming ───────────────────────────────────────────────────

    /// Starts a collection writer over `sink`. The writer uses the registry
    /// as it is now; later registrations do not affect it.
    pub fn collection_writer<W: Write>(&self, sink: W) -> CollectionWriter<W> {
        CollectionWriter::new(sink, self.registry.snapshot(), self.config.close_sink)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}
