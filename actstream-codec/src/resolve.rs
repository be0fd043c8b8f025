//! Entity resolution: which builder a JSON object is decoded with.
//!
//! First match wins:
//! 1. a structural hint from the enclosing property (collection, activity,
//!    media link, place, mood, address);
//! 2. a registered factory for the object's `objectType`;
//! 3. the object's shape: `verb` with an `actor`, `object` or `target` is an
//!    activity, an `items` array is a collection;
//! 4. any other hint from the enclosing property;
//! 5. the generic entity.
//!
//! A factory that rejects its object never falls through to shape checks:
//! the discriminator was explicit, so the object becomes a generic entity
//! that keeps it (or the decode fails under `ResolutionPolicy::FailFast`).

use crate::config::ResolutionPolicy;
use crate::decode::{Decoder, JsonObject};
use crate::diagnostics::DiagnosticKind;
use crate::error::{CodecError, CodecResult};
use actstream_model::{is_discriminator, Builder, EntityKind, ACTIVITY_ROLES, OBJECT_TYPE};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

/// True if the object looks like an activity.
pub fn is_activity_shape(object: &Map<String, JsonValue>) -> bool {
    object.contains_key("verb") && ACTIVITY_ROLES.iter().any(|role| object.contains_key(*role))
}

/// True if the object looks like a collection.
pub fn is_collection_shape(object: &Map<String, JsonValue>) -> bool {
    matches!(object.get("items"), Some(JsonValue::Array(_)))
}

impl Decoder<'_> {
    pub(crate) fn resolve(
        &mut self,
        object: &JsonObject,
        hint: Option<&EntityKind>,
    ) -> CodecResult<Builder> {
        let tables = self.tables;
        let discriminator = self.discriminator(object);

        if let Some(kind) = hint.filter(|kind| kind.is_structural()) {
            return Ok(Builder::new(kind.clone()).with_object_type(discriminator));
        }

        if let Some(raw) = discriminator.as_deref() {
            if let Some(factory) = tables.factory(raw) {
                return match factory(raw) {
                    Ok(builder) => Ok(builder),
                    Err(err) => self.factory_failed(raw, err),
                };
            }
            debug!(discriminator = %raw, "No factory registered for discriminator");
        }

        let builder = if is_activity_shape(object) {
            Builder::new(EntityKind::Activity).with_object_type(discriminator)
        } else if is_collection_shape(object) {
            Builder::new(EntityKind::Collection).with_object_type(discriminator)
        } else if let Some(kind) = hint {
            let builder = Builder::new(kind.clone());
            match discriminator {
                Some(raw) => builder.with_object_type(Some(raw)),
                None => builder,
            }
        } else {
            Builder::generic(discriminator)
        };
        Ok(builder)
    }

    fn factory_failed(
        &mut self,
        discriminator: &str,
        err: actstream_model::Error,
    ) -> CodecResult<Builder> {
        match self.config.resolution {
            ResolutionPolicy::FailFast => Err(CodecError::UnresolvableEntity {
                discriminator: discriminator.to_string(),
                reason: err.to_string(),
            }),
            ResolutionPolicy::Fallback => {
                self.report(
                    DiagnosticKind::FactoryRejected,
                    format!("factory for {discriminator:?} failed, using generic entity: {err}"),
                );
                Ok(Builder::generic(Some(discriminator.to_string())))
            }
        }
    }

    /// The object's discriminator, if it carries a string one. The exact key
    /// is preferred over case variants.
    fn discriminator(&mut self, object: &JsonObject) -> Option<String> {
        let raw = object.get(OBJECT_TYPE).or_else(|| {
            object
                .iter()
                .find(|(key, _)| is_discriminator(key))
                .map(|(_, value)| value)
        })?;
        match raw {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Null => None,
            other => {
                self.report(
                    DiagnosticKind::IgnoredDiscriminator,
                    format!("ignored non-string objectType {other}"),
                );
                None
            }
        }
    }
}
