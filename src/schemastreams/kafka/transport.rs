//! Seams between the example driver and the broker.
//!
//! The driver only needs "send one typed record" and "give me what has
//! arrived"; the Kafka clients implement both, and tests can plug in an
//! in-memory topic.

use async_trait::async_trait;
use std::time::Duration;

use super::headers::Headers;
use super::kafka_consumer::KafkaConsumer;
use super::kafka_error::{ConsumerError, ProducerError};
use super::kafka_producer::{DeliveryReport, KafkaProducer};
use super::message::Message;
use super::serialization::Serializer;
use crate::schemastreams::serdes::{ValueDeserializer, ValueSerializer};

#[async_trait]
pub trait MessageSink<K, V>: Send + Sync
where
    K: Sync,
    V: Sync,
{
    async fn send(
        &self,
        topic: &str,
        key: Option<&K>,
        value: &V,
    ) -> Result<DeliveryReport, ProducerError>;

    /// Block until every record handed to `send` is delivered or `timeout` expires
    async fn flush(&self, timeout: Duration) -> Result<(), ProducerError>;
}

#[async_trait]
pub trait MessageSource<K, V>: Send + Sync {
    /// Records that arrived within `timeout`; empty when none did
    async fn poll_batch(&self, timeout: Duration) -> Result<Vec<Message<K, V>>, ConsumerError>;
}

#[async_trait]
impl<K, V, KS, VS> MessageSink<K, V> for KafkaProducer<K, V, KS, VS>
where
    K: Sync,
    V: Sync,
    KS: Serializer<K>,
    VS: ValueSerializer<V>,
{
    async fn send(
        &self,
        topic: &str,
        key: Option<&K>,
        value: &V,
    ) -> Result<DeliveryReport, ProducerError> {
        KafkaProducer::send(self, Some(topic), key, value, Headers::new()).await
    }

    async fn flush(&self, timeout: Duration) -> Result<(), ProducerError> {
        KafkaProducer::flush(self, timeout).map_err(ProducerError::Broker)
    }
}

#[async_trait]
impl<K, V, KS, VS> MessageSource<K, V> for KafkaConsumer<K, V, KS, VS>
where
    K: Send,
    V: Send,
    KS: Serializer<K>,
    VS: ValueDeserializer<V>,
{
    async fn poll_batch(&self, timeout: Duration) -> Result<Vec<Message<K, V>>, ConsumerError> {
        KafkaConsumer::poll_batch(self, timeout).await
    }
}
