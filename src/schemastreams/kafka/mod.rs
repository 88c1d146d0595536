//! Typed Kafka producer and consumer on top of rdkafka.

pub mod client_config_builder;
pub mod client_context;
pub mod common_config;
pub mod consumer_config;
pub mod headers;
pub mod kafka_consumer;
pub mod kafka_error;
pub mod kafka_producer;
pub mod message;
pub mod producer_config;
pub mod serialization;
pub mod transport;
pub mod utils;

pub use client_context::LoggingClientContext;
pub use common_config::CommonKafkaConfig;
pub use consumer_config::{ConsumerConfig, OffsetReset};
pub use headers::Headers;
pub use kafka_consumer::KafkaConsumer;
pub use kafka_error::{ConsumerError, KafkaClientError, ProducerError};
pub use kafka_producer::{DeliveryReport, KafkaProducer};
pub use message::{Message, RecordMetadata};
pub use producer_config::{AckMode, ProducerConfig};
pub use serialization::{Serializer, StringSerializer};
pub use transport::{MessageSink, MessageSource};
pub use utils::convert_kafka_log_level;
