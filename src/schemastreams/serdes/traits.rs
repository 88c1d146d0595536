use async_trait::async_trait;

use super::error::SerializationError;
use super::wire::EncodedValue;
use crate::schemastreams::kafka::Headers;

/// Registry-aware value encoder.
///
/// Resolving the global id may call the registry, so encoding is async.
/// The returned headers are merged into the outgoing record.
#[async_trait]
pub trait ValueSerializer<T: Sync>: Send + Sync {
    async fn serialize(&self, topic: &str, value: &T) -> Result<EncodedValue, SerializationError>;
}

/// Registry-aware value decoder.
///
/// Every record is decoded with the schema its own global id points at.
#[async_trait]
pub trait ValueDeserializer<T>: Send + Sync {
    async fn deserialize(
        &self,
        topic: &str,
        headers: &Headers,
        payload: &[u8],
    ) -> Result<T, SerializationError>;
}
