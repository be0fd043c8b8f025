use crate::{EntityKind, Value, Verb};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

/// The reserved property naming an entity's kind.
pub const OBJECT_TYPE: &str = "objectType";

/// Keys that, together with `verb`, make an object an activity.
pub const ACTIVITY_ROLES: [&str; 3] = ["actor", "object", "target"];

/// Returns true if `key` names the discriminator, ignoring ASCII case.
pub fn is_discriminator(key: &str) -> bool {
    key.eq_ignore_ascii_case(OBJECT_TYPE)
}

/// An immutable property bag representing one Activity Streams object.
///
/// Properties keep their insertion order for serialization. Equality ignores
/// that order: two entities are equal when they have the same kind, the same
/// discriminator and the same key/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    object_type: Option<String>,
    properties: IndexMap<String, Value>,
}

impl Entity {
    /// Starts a builder for the given kind.
    pub fn builder(kind: EntityKind) -> Builder {
        Builder::new(kind)
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// The discriminator exactly as it was received or set.
    pub fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Property names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Reopens this entity as a builder carrying the same kind and properties.
    pub fn into_builder(self) -> Builder {
        Builder {
            kind: self.kind,
            object_type: self.object_type,
            implied_object_type: false,
            properties: self.properties,
        }
    }

    // ── Typed helpers ───────────────────────────────────────────────

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.get(name).and_then(Value::as_entity)
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get_str("displayName")
    }

    pub fn content(&self) -> Option<&str> {
        self.get_str("content")
    }

    pub fn published(&self) -> Option<&DateTime<FixedOffset>> {
        self.get("published").and_then(Value::as_datetime)
    }

    pub fn updated(&self) -> Option<&DateTime<FixedOffset>> {
        self.get("updated").and_then(Value::as_datetime)
    }

    pub fn verb(&self) -> Option<&Verb> {
        self.get("verb").and_then(Value::as_verb)
    }

    pub fn actor(&self) -> Option<&Entity> {
        self.get_entity("actor")
    }

    pub fn object(&self) -> Option<&Entity> {
        self.get_entity("object")
    }

    pub fn target(&self) -> Option<&Entity> {
        self.get_entity("target")
    }

    /// The `items` sequence of a collection.
    pub fn items(&self) -> Option<&[Value]> {
        self.get("items").and_then(Value::as_seq)
    }
}

/// Staging area for an [`Entity`].
///
/// A builder is used linearly: every `set` consumes and returns it, and
/// [`Builder::build`] consumes it for good, so a finished entity can never be
/// mutated through a stale builder.
#[derive(Debug, Clone)]
pub struct Builder {
    kind: EntityKind,
    object_type: Option<String>,
    /// The discriminator came from the kind rather than from a caller.
    implied_object_type: bool,
    properties: IndexMap<String, Value>,
}

impl Builder {
    /// A builder for `kind`, starting with the kind's own token as
    /// `objectType`.
    ///
    /// For activities and collections that token is dropped at
    /// [`Builder::build`] when the properties already identify the kind: a
    /// `verb` with an `actor`, `object` or `target` for an activity, an `items`
    /// sequence for a collection. Any other entity keeps it, so a reader can
    /// tell the kind apart wherever the entity is placed.
    pub fn new(kind: EntityKind) -> Self {
        let object_type = kind.default_object_type();
        Self {
            kind,
            object_type,
            implied_object_type: true,
            properties: IndexMap::new(),
        }
    }

    /// The generic entity builder. Accepts any key.
    pub fn generic(object_type: Option<String>) -> Self {
        Self {
            kind: EntityKind::Object,
            object_type,
            implied_object_type: false,
            properties: IndexMap::new(),
        }
    }

    /// A builder for an application-registered kind.
    pub fn external(discriminator: impl Into<String>) -> Self {
        let discriminator = discriminator.into();
        Self {
            kind: EntityKind::External(discriminator.clone()),
            object_type: Some(discriminator),
            implied_object_type: false,
            properties: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// The discriminator so far. [`Builder::build`] may still drop one that
    /// came from the kind.
    pub fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    /// Replaces the discriminator carried by the finished entity.
    pub fn with_object_type(mut self, object_type: Option<String>) -> Self {
        self.object_type = object_type;
        self.implied_object_type = false;
        self
    }

    /// Sets a property and returns the builder for chaining.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a property in place.
    ///
    /// A key equal to `objectType` (any case) sets the discriminator when the
    /// value is a string and is dropped otherwise. Re-setting a key keeps its
    /// original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if is_discriminator(&key) {
            if let Value::String(object_type) = value {
                self.object_type = Some(object_type);
                self.implied_object_type = false;
            }
            return;
        }
        self.properties.insert(key, value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Freezes the property bag.
    #[must_use]
    pub fn build(self) -> Entity {
        let object_type = if self.implied_object_type && self.recognizable_by_shape() {
            None
        } else {
            self.object_type
        };
        Entity {
            kind: self.kind,
            object_type,
            properties: self.properties,
        }
    }

    /// True if the properties alone identify an activity or a collection.
    fn recognizable_by_shape(&self) -> bool {
        let activity = self.properties.contains_key("verb")
            && ACTIVITY_ROLES
                .iter()
                .any(|role| self.properties.contains_key(*role));
        match self.kind {
            EntityKind::Activity => activity,
            EntityKind::Collection => {
                !activity && matches!(self.properties.get("items"), Some(Value::Seq(_)))
            }
            _ => false,
        }
    }
}
