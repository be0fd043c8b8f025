//! Entity object model for Activity Streams documents.
//!
//! Defines the in-memory shape every decoded document takes:
//! - [`Entity`]: an immutable, ordered property bag with a kind and an
//!   optional `objectType` discriminator
//! - [`Builder`]: the linear staging value that produces an entity
//! - [`Value`]: scalars, timestamps, verbs, typed extension scalars, nested
//!   entities and sequences
//! - [`EntityKind`]: the closed set of built-in kinds plus an open
//!   `External` variant for application-registered kinds
//! - [`Verb`]: well-known activity verbs with canonical lowercase tokens
//!
//! This crate knows nothing about JSON text or type registration; that is the
//! job of `actstream-codec`.

mod entity;
mod kind;
mod value;
mod verb;

pub use entity::{is_discriminator, Builder, Entity, ACTIVITY_ROLES, OBJECT_TYPE};
pub use kind::EntityKind;
pub use value::{TypedValue, Value};
pub use verb::Verb;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the entity model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid verb token: {0:?}")]
    InvalidVerb(String),

    /// A builder factory refused to construct an entity.
    #[error("builder rejected {discriminator:?}: {reason}")]
    Rejected {
        discriminator: String,
        reason: String,
    },
}

impl Error {
    /// Shorthand for a factory rejecting its discriminator.
    pub fn rejected(discriminator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            discriminator: discriminator.into(),
            reason: reason.into(),
        }
    }
}
