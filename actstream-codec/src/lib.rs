//! Polymorphic JSON codec for Activity Streams documents.
//!
//! Converts between wire JSON and the [`actstream_model`] object graph when
//! the concrete shape of each object is only known at run time.
//!
//! # Architecture
//!
//! - **Registry**: open tables mapping property names to value types,
//!   discriminators to builder factories, and value type names to custom
//!   serializers. Copy-on-write, so readers never lock.
//! - **Coercion**: raw JSON scalars to typed values.
//! - **Resolution**: picks the builder for an object from a static hint, its
//!   `objectType`, or its shape.
//! - **Decoding**: walks objects, arrays and scalars into entities.
//! - **Encoding**: walks entities back into JSON.
//! - **Streaming**: writes a collection header followed by any number of
//!   items without buffering the collection.
//!
//! # Decoding rules
//!
//! 1. Fields named `objectType` (any case) are the discriminator and never
//!    become properties.
//! 2. Arrays decode element-wise with the declared type of their property,
//!    at any depth.
//! 3. Nested objects take the declared type of their property as a hint.
//! 4. `null` is kept as an explicit null, distinct from a missing key.
//!
//! # Example
//!
//! ```
//! use actstream_codec::{Codec, ValueType};
//! use actstream_model::Value;
//!
//! let codec = Codec::new();
//! codec.register_property_type(
//!     "rating",
//!     ValueType::scalar("stars", |raw| Ok(Value::typed("stars", raw.clone()))),
//! );
//!
//! let review = codec.read(r#"{"objectType":"review","rating":4}"#).unwrap();
//! assert_eq!(review.get("rating").map(Value::type_name), Some("stars"));
//! assert_eq!(codec.write(&review).unwrap(), r#"{"objectType":"review","rating":4}"#);
//! ```

mod codec;
pub mod coerce;
mod config;
mod decode;
mod diagnostics;
mod encode;
mod error;
pub mod registry;
pub mod resolve;
pub mod stream;

pub use codec::Codec;
pub use config::{CodecConfig, CoercionPolicy, ResolutionPolicy};
pub use diagnostics::{Decoded, Diagnostic, DiagnosticKind};
pub use error::{CodecError, CodecResult};
pub use registry::{BuilderFactory, ScalarType, SerializeFn, TypeRegistry, ValueType};
pub use stream::{CollectionWriter, StreamState};
