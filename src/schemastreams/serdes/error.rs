//! Error types for the registry-aware codecs

use crate::schemastreams::schema::SchemaError;

/// Serialization error type
#[derive(Debug)]
pub enum SerializationError {
    SerializationFailed(String),
    DeserializationFailed(String),
    /// Payload does not conform to the resolved schema
    Validation(String),
    /// Missing magic byte, truncated id or missing id header
    InvalidEnvelope(String),
    /// Registry lookup or registration failed
    Registry(SchemaError),
    Json(serde_json::Error),
    Avro(apache_avro::Error),
    SchemaError(String),
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::SerializationFailed(msg) => {
                write!(f, "Serialization failed: {}", msg)
            }
            SerializationError::DeserializationFailed(msg) => {
                write!(f, "Deserialization failed: {}", msg)
            }
            SerializationError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            SerializationError::InvalidEnvelope(msg) => write!(f, "Invalid envelope: {}", msg),
            SerializationError::Registry(e) => write!(f, "Registry error: {}", e),
            SerializationError::Json(e) => write!(f, "JSON error: {}", e),
            SerializationError::Avro(e) => write!(f, "Avro error: {}", e),
            SerializationError::SchemaError(msg) => write!(f, "Schema error: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializationError::Registry(e) => Some(e),
            SerializationError::Json(e) => Some(e),
            SerializationError::Avro(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for SerializationError {
    fn from(err: SchemaError) -> Self {
        SerializationError::Registry(err)
    }
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::Json(err)
    }
}

impl From<apache_avro::Error> for SerializationError {
    fn from(err: apache_avro::Error) -> Self {
        SerializationError::Avro(err)
    }
}
