use rdkafka::error::KafkaError;
use thiserror::Error;

use crate::schemastreams::serdes::SerializationError;

/// Failure of a typed producer or consumer operation
#[derive(Debug, Error)]
pub enum KafkaClientError {
    /// Key or value codec rejected the record
    #[error("Codec error: {0}")]
    Codec(#[from] SerializationError),

    /// The broker did not acknowledge a record
    #[error("Delivery to topic '{topic}' failed: {source}")]
    Delivery {
        topic: String,
        #[source]
        source: KafkaError,
    },

    /// librdkafka error outside a single delivery (flush, poll, subscribe)
    #[error("Broker error: {0}")]
    Broker(#[from] KafkaError),
}

pub type ProducerError = KafkaClientError;
pub type ConsumerError = KafkaClientError;
