/*!
# Error Types for schemastreams

Top-level error returned by the example drivers and binaries.
*/

use thiserror::Error;

use crate::schemastreams::driver::Stage;
use crate::schemastreams::kafka::KafkaClientError;
use crate::schemastreams::schema::SchemaError;
use crate::schemastreams::serdes::SerializationError;

#[derive(Debug, Error)]
pub enum SchemaStreamsError {
    /// Kafka-related errors with context
    #[error("Kafka operation failed: {message}: {source}")]
    Kafka {
        #[source]
        source: KafkaClientError,
        message: String,
    },

    /// Registry registration or lookup errors
    #[error("Schema registry operation failed: {0}")]
    Schema(#[from] SchemaError),

    /// Codec errors outside a Kafka call
    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The consumer went quiet before the expected number of records arrived
    #[error(
        "Consumed {received} of {expected} records before giving up after {empty_polls} consecutive empty polls"
    )]
    ConsumeBudgetExhausted {
        expected: usize,
        received: usize,
        empty_polls: u32,
    },

    #[error("Stage {to} cannot follow {from}")]
    StageOrder { from: Stage, to: Stage },
}

impl SchemaStreamsError {
    pub fn kafka(source: impl Into<KafkaClientError>, message: impl Into<String>) -> Self {
        Self::Kafka {
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type SchemaStreamsResult<T> = Result<T, SchemaStreamsError>;
