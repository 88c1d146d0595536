//! Registry-aware value codecs.
//!
//! A serializer derives the artifact id, resolves the schema global id with
//! the configured strategy, encodes the payload and tags it with the id. A
//! deserializer reads the id back and decodes each record with exactly that
//! schema version.

pub mod avro;
pub mod config;
pub mod error;
pub mod json_schema;
pub mod schema_cache;
pub mod traits;
pub mod wire;

pub use avro::{AvroDeserializer, AvroSerializer, GenericRecord};
pub use config::SerdeConfig;
pub use error::SerializationError;
pub use json_schema::{JsonSchemaDeserializer, JsonSchemaSerializer};
pub use schema_cache::SchemaCache;
pub use traits::{ValueDeserializer, ValueSerializer};
pub use wire::{EncodedValue, IdHandler};
