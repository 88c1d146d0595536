use futures::StreamExt;
use log::{debug, error, info};
use rdkafka::Timestamp;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::{Message as KafkaMessage, OwnedMessage};
use std::marker::PhantomData;
use std::time::Duration;

use super::client_context::LoggingClientContext;
use super::consumer_config::ConsumerConfig;
use super::headers::Headers;
use super::kafka_error::ConsumerError;
use super::message::{Message, RecordMetadata};
use super::serialization::Serializer;
use crate::schemastreams::serdes::ValueDeserializer;

/// Typed consumer: keys go through a plain [`Serializer`], values through a
/// registry-aware [`ValueDeserializer`] that picks the schema per record.
///
/// The underlying client leaves the group when the consumer is dropped.
pub struct KafkaConsumer<K, V, KS, VS>
where
    KS: Serializer<K>,
    VS: ValueDeserializer<V>,
{
    consumer: StreamConsumer<LoggingClientContext>,
    key_serializer: KS,
    value_deserializer: VS,
    config: ConsumerConfig,
    _phantom: PhantomData<fn() -> (K, V)>,
}

impl<K, V, KS, VS> KafkaConsumer<K, V, KS, VS>
where
    KS: Serializer<K>,
    VS: ValueDeserializer<V>,
{
    /// Creates a consumer from a full configuration
    pub fn with_config(
        config: ConsumerConfig,
        key_serializer: KS,
        value_deserializer: VS,
    ) -> Result<Self, KafkaError> {
        let consumer: StreamConsumer<LoggingClientContext> = config
            .to_client_config()
            .create_with_context(LoggingClientContext)?;

        info!(
            "Created KafkaConsumer connected to {} in group {}",
            config.common.brokers, config.group_id
        );

        Ok(Self {
            consumer,
            key_serializer,
            value_deserializer,
            config,
            _phantom: PhantomData,
        })
    }

    /// Subscribe to topics
    pub fn subscribe(&self, topics: &[&str]) -> Result<(), KafkaError> {
        info!("Subscribing group {} to {:?}", self.config.group_id, topics);
        self.consumer.subscribe(topics)
    }

    /// Wait up to `timeout` for records and return what arrived.
    ///
    /// An empty batch means nothing was available within the timeout. Once
    /// the first record arrives, records already buffered locally are
    /// drained without further waiting, up to `max_poll_records`.
    pub async fn poll_batch(&self, timeout: Duration) -> Result<Vec<Message<K, V>>, ConsumerError> {
        let mut stream = self.consumer.stream();
        let mut raw = Vec::new();

        match tokio::time::timeout(timeout, stream.next()).await {
            Ok(Some(Ok(msg))) => raw.push(msg.detach()),
            Ok(Some(Err(e))) => return Err(ConsumerError::Broker(e)),
            Ok(None) | Err(_) => return Ok(Vec::new()),
        }

        while raw.len() < self.config.max_poll_records {
            match tokio::time::timeout(Duration::ZERO, stream.next()).await {
                Ok(Some(Ok(msg))) => raw.push(msg.detach()),
                Ok(Some(Err(e))) => return Err(ConsumerError::Broker(e)),
                Ok(None) | Err(_) => break,
            }
        }
        drop(stream);

        let mut batch = Vec::with_capacity(raw.len());
        for msg in raw {
            batch.push(self.decode(msg).await?);
        }
        debug!("Polled batch of {} records", batch.len());
        Ok(batch)
    }

    async fn decode(&self, msg: OwnedMessage) -> Result<Message<K, V>, ConsumerError> {
        let headers = msg
            .headers()
            .map(Headers::from_rdkafka_headers)
            .unwrap_or_default();
        let payload = msg.payload().unwrap_or_default();

        let value = match self
            .value_deserializer
            .deserialize(msg.topic(), &headers, payload)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                error!(
                    "Failed to deserialize message value: topic={} partition={} offset={} payload_size={} error={}",
                    msg.topic(),
                    msg.partition(),
                    msg.offset(),
                    payload.len(),
                    e
                );
                return Err(ConsumerError::Codec(e));
            }
        };

        let key = msg
            .key()
            .map(|k| self.key_serializer.deserialize(k))
            .transpose()?;

        let metadata = RecordMetadata {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            timestamp: match msg.timestamp() {
                Timestamp::NotAvailable => None,
                Timestamp::CreateTime(t) | Timestamp::LogAppendTime(t) => Some(t),
            },
        };

        Ok(Message::new(key, value, headers, metadata))
    }

    /// Leave the subscription and release the client
    pub fn close(self) {
        info!("Closing consumer for group {}", self.config.group_id);
        self.consumer.unsubscribe();
    }
}
