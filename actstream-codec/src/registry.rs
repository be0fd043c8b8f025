//! Open type registry: property types, entity kinds and custom serializers.
//!
//! The tables are read on every decode and encode but written only while an
//! application registers its extensions, so they are kept copy-on-write. A
//! call takes one [`Arc`] snapshot up front and never locks; registration
//! clones the tables, applies the change and swaps the new copy in.

use actstream_model::{Builder, EntityKind, Value};
use arc_swap::ArcSwap;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Constructs a builder for a discriminator. Receives the raw discriminator
/// string so one factory can serve several spellings or subtypes.
pub type BuilderFactory = Arc<dyn Fn(&str) -> actstream_model::Result<Builder> + Send + Sync>;

/// Emits a value whose runtime type name it was registered for.
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<JsonValue, String> + Send + Sync>;

type ParseFn = dyn Fn(&JsonValue) -> Result<Value, String> + Send + Sync;

/// An application-defined scalar type with its own parser.
#[derive(Clone)]
pub struct ScalarType {
    name: Arc<str>,
    parse: Arc<ParseFn>,
}

impl ScalarType {
    pub fn new<F>(name: impl Into<Arc<str>>, parse: F) -> Self
    where
        F: Fn(&JsonValue) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parse: Arc::new(parse),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse(&self, raw: &JsonValue) -> Result<Value, String> {
        (self.parse)(raw)
    }
}

impl fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarType").field("name", &self.name).finish()
    }
}

/// The declared type of a property.
#[derive(Debug, Clone)]
pub enum ValueType {
    /// ISO 8601 / RFC 3339 timestamp.
    DateTime,
    /// Activity verb token.
    Verb,
    /// Nested objects under this property are decoded as this kind.
    Kind(EntityKind),
    /// An application-registered scalar type.
    Scalar(ScalarType),
}

impl ValueType {
    /// Shorthand for registering a custom scalar type.
    pub fn scalar<F>(name: impl Into<Arc<str>>, parse: F) -> Self
    where
        F: Fn(&JsonValue) -> Result<Value, String> + Send + Sync + 'static,
    {
        ValueType::Scalar(ScalarType::new(name, parse))
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::DateTime => "datetime",
            ValueType::Verb => "verb",
            ValueType::Kind(kind) => kind.as_token().unwrap_or("object"),
            ValueType::Scalar(scalar) => scalar.name(),
        }
    }

    /// The entity hint this type carries for nested objects.
    pub fn as_kind(&self) -> Option<&EntityKind> {
        match self {
            ValueType::Kind(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Properties with a well-known type.
fn well_known_properties() -> Vec<(&'static str, ValueType)> {
    vec![
        ("published", ValueType::DateTime),
        ("updated", ValueType::DateTime),
        ("startTime", ValueType::DateTime),
        ("endTime", ValueType::DateTime),
        ("verb", ValueType::Verb),
        ("location", ValueType::Kind(EntityKind::Place)),
        ("mood", ValueType::Kind(EntityKind::Mood)),
        ("address", ValueType::Kind(EntityKind::Address)),
        ("image", ValueType::Kind(EntityKind::MediaLink)),
        ("fullImage", ValueType::Kind(EntityKind::MediaLink)),
        ("stream", ValueType::Kind(EntityKind::MediaLink)),
        ("icon", ValueType::Kind(EntityKind::MediaLink)),
        ("replies", ValueType::Kind(EntityKind::Collection)),
    ]
}

#[derive(Clone, Default)]
pub(crate) struct Tables {
    pub(crate) properties: HashMap<String, ValueType>,
    pub(crate) kinds: HashMap<String, BuilderFactory>,
    pub(crate) serializers: HashMap<String, SerializeFn>,
}

impl Tables {
    pub(crate) fn property_type(&self, name: &str) -> Option<&ValueType> {
        self.properties.get(name)
    }

    /// Discriminators match ignoring ASCII case.
    pub(crate) fn factory(&self, discriminator: &str) -> Option<&BuilderFactory> {
        self.kinds
            .get(discriminator)
            .or_else(|| self.kinds.get(&discriminator.to_ascii_lowercase()))
    }

    pub(crate) fn serializer(&self, type_name: &str) -> Option<&SerializeFn> {
        self.serializers.get(type_name)
    }

    fn with_built_ins() -> Self {
        let mut tables = Tables::default();
        for kind in EntityKind::BUILT_IN {
            if let Some(token) = kind.as_token() {
                tables
                    .kinds
                    .insert(token.to_string(), kind_factory(kind.clone()));
            }
        }
        for (name, value_type) in well_known_properties() {
            tables.properties.insert(name.to_string(), value_type);
        }
        tables
    }
}

/// A factory building `kind` and keeping the discriminator as received.
fn kind_factory(kind: EntityKind) -> BuilderFactory {
    Arc::new(move |discriminator: &str| -> actstream_model::Result<Builder> {
        Ok(Builder::new(kind.clone()).with_object_type(Some(discriminator.to_string())))
    })
}

/// The registry of property types, entity kinds and custom serializers.
///
/// Registration takes `&self`, so one registry can be shared behind an
/// [`Arc`] by several codecs and threads. Every registration overwrites an
/// earlier one for the same key.
pub struct TypeRegistry {
    tables: ArcSwap<Tables>,
}

impl TypeRegistry {
    /// A registry pre-populated with the built-in kinds and well-known
    /// property types.
    pub fn new() -> Self {
        Self {
            tables: ArcSwap::from_pointee(Tables::with_built_ins()),
        }
    }

    /// A registry with no entries at all.
    pub fn empty() -> Self {
        Self {
            tables: ArcSwap::from_pointee(Tables::default()),
        }
    }

    /// Registers (or replaces) the factory for a discriminator.
    pub fn register_entity_kind<F>(&self, discriminator: &str, factory: F)
    where
        F: Fn(&str) -> actstream_model::Result<Builder> + Send + Sync + 'static,
    {
        let key = discriminator.to_ascii_lowercase();
        let factory: BuilderFactory = Arc::new(factory);
        debug!(discriminator = %key, "Registering entity kind");
        self.update(|tables| {
            tables.kinds.insert(key.clone(), factory.clone());
        });
    }

    /// Registers a discriminator whose entities are carried as
    /// [`EntityKind::External`].
    pub fn register_external_kind(&self, discriminator: &str) {
        self.register_entity_kind(discriminator, |raw| Ok(Builder::external(raw)));
    }

    /// Registers (or replaces) the declared type of a property.
    pub fn register_property_type(&self, name: &str, value_type: ValueType) {
        debug!(property = %name, value_type = %value_type.name(), "Registering property type");
        let name = name.to_string();
        self.update(|tables| {
            tables.properties.insert(name.clone(), value_type.clone());
        });
    }

    /// Registers (or replaces) the serializer for a runtime value type name.
    ///
    /// Verbs always use their canonical token, so a serializer registered for
    /// `verb` is never consulted.
    pub fn register_serializer<F>(&self, type_name: &str, serializer: F)
    where
        F: Fn(&Value) -> Result<JsonValue, String> + Send + Sync + 'static,
    {
        debug!(type_name = %type_name, "Registering serializer");
        let type_name = type_name.to_string();
        let serializer: SerializeFn = Arc::new(serializer);
        self.update(|tables| {
            tables
                .serializers
                .insert(type_name.clone(), serializer.clone());
        });
    }

    /// The declared type of a property, if any.
    pub fn property_type(&self, name: &str) -> Option<ValueType> {
        self.tables.load().property_type(name).cloned()
    }

    /// True if a factory is registered for the discriminator.
    pub fn has_entity_kind(&self, discriminator: &str) -> bool {
        self.tables.load().factory(discriminator).is_some()
    }

    /// True if a serializer is registered for the type name.
    pub fn has_serializer(&self, type_name: &str) -> bool {
        self.tables.load().serializer(type_name).is_some()
    }

    pub(crate) fn snapshot(&self) -> Arc<Tables> {
        self.tables.load_full()
    }

    fn update(&self, apply: impl Fn(&mut Tables)) {
        self.tables.rcu(|current| {
            let mut next = Tables::clone(current);
            apply(&mut next);
            next
        });
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.load();
        f.debug_struct("TypeRegistry")
            .field("properties", &tables.properties.len())
            .field("kinds", &tables.kinds.len())
            .field("serializers", &tables.serializers.len())
            .finish()
    }
}
