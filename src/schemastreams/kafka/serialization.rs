//! Plain, registry-free codecs used for record keys.

pub use crate::schemastreams::serdes::SerializationError;

/// Trait for serializers that can convert between objects and bytes
pub trait Serializer<T>: Send + Sync {
    /// Serialize an object to bytes
    fn serialize(&self, value: &T) -> Result<Vec<u8>, SerializationError>;

    /// Deserialize bytes to an object
    fn deserialize(&self, bytes: &[u8]) -> Result<T, SerializationError>;
}

/// UTF-8 string keys
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl Serializer<String> for StringSerializer {
    fn serialize(&self, value: &String) -> Result<Vec<u8>, SerializationError> {
        Ok(value.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<String, SerializationError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| SerializationError::DeserializationFailed(format!("key is not UTF-8: {}", e)))
    }
}
