//! Error types for the codec.

use crate::stream::StreamState;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A scalar could not be converted to the type declared for its property.
    #[error("cannot coerce {property} to {type_name}: {reason}")]
    Coercion {
        property: String,
        type_name: String,
        reason: String,
    },

    /// A registered factory refused to build an entity and the resolution
    /// policy is fail-fast.
    #[error("cannot resolve entity kind {discriminator:?}: {reason}")]
    UnresolvableEntity {
        discriminator: String,
        reason: String,
    },

    /// The document is not shaped the way the operation requires.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A collection writer was driven out of sequence.
    #[error("cannot {operation} while the collection writer is {state}")]
    StreamState {
        state: StreamState,
        operation: &'static str,
    },

    /// A registered serializer failed.
    #[error("serializer for {type_name} failed: {reason}")]
    Serializer { type_name: String, reason: String },

    /// JSON syntax or encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the underlying sink or source.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
