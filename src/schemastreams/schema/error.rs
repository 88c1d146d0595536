//! Schema Error Types
//!
//! Errors raised while talking to the schema registry or resolving artifact
//! and global ids.

/// Error types for schema registry operations
#[derive(Debug)]
pub enum SchemaError {
    /// The registry answered 404 for the artifact, version or global id
    NotFound {
        source: String,
    },
    /// The registry answered with a non-success status
    Registry {
        status: u16,
        error_code: Option<i64>,
        message: String,
    },
    /// Transport-level failure (connection refused, timeout, bad body)
    Provider {
        source: String,
        message: String,
    },
    InvalidArtifactId {
        reason: String,
    },
    Configuration {
        message: String,
    },
}

impl SchemaError {
    /// True when the registry reported that the looked-up entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchemaError::NotFound { .. } | SchemaError::Registry { status: 404, .. }
        )
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::NotFound { source } => write!(f, "Schema not found: {}", source),
            SchemaError::Registry {
                status,
                error_code,
                message,
            } => match error_code {
                Some(code) => write!(
                    f,
                    "Schema registry error (status {}, code {}): {}",
                    status, code, message
                ),
                None => write!(f, "Schema registry error (status {}): {}", status, message),
            },
            SchemaError::Provider { source, message } => {
                write!(f, "Schema provider error: {} - {}", source, message)
            }
            SchemaError::InvalidArtifactId { reason } => {
                write!(f, "Invalid artifact id: {}", reason)
            }
            SchemaError::Configuration { message } => {
                write!(f, "Schema configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

pub type SchemaResult<T> = Result<T, SchemaError>;
