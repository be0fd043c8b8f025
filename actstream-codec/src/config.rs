use serde::{Deserialize, Serialize};

/// What to do when a registered factory rejects an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Build the object with the generic entity builder and record a diagnostic.
    #[default]
    Fallback,
    /// Abort the decode with `CodecError::UnresolvableEntity`.
    FailFast,
}

/// What to do when a scalar does not parse as its declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Abort the decode with `CodecError::Coercion`.
    ///
    /// This applies at any depth: a bad `published` inside `actor` fails the
    /// whole document, and no partially decoded entity is returned.
    #[default]
    Strict,
    /// Keep the raw scalar with its default mapping and record a diagnostic.
    /// Decoding carries on with the sibling fields, nested or not.
    Lenient,
}

/// Configuration for a [`Codec`](crate::Codec).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub resolution: ResolutionPolicy,
    pub coercion: CoercionPolicy,
    /// Pretty-print documents produced by `write`. Streamed collections are
    /// always compact.
    pub pretty: bool,
    /// Release the sink once a collection writer is closed.
    pub close_sink: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            resolution: ResolutionPolicy::Fallback,
            coercion: CoercionPolicy::Strict,
            pretty: false,
            close_sink: true,
        }
    }
}
