use log::{debug, error, info, warn};
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::marker::PhantomData;
use std::time::Duration;

use super::client_context::LoggingClientContext;
use super::headers::Headers;
use super::kafka_error::ProducerError;
use super::producer_config::ProducerConfig;
use super::serialization::Serializer;
use crate::schemastreams::serdes::ValueSerializer;

/// Where the broker stored a produced record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

/// Typed producer: keys go through a plain [`Serializer`], values through a
/// registry-aware [`ValueSerializer`] that tags each record with its schema id.
///
/// Pending records are flushed by [`KafkaProducer::close`]; a producer that
/// is dropped without being closed still makes a best-effort flush.
pub struct KafkaProducer<K, V, KS, VS>
where
    KS: Serializer<K>,
    VS: ValueSerializer<V>,
    V: Sync,
{
    producer: FutureProducer<LoggingClientContext>,
    key_serializer: KS,
    value_serializer: VS,
    config: ProducerConfig,
    closed: bool,
    _phantom: PhantomData<fn(&K, &V)>,
}

impl<K, V, KS, VS> KafkaProducer<K, V, KS, VS>
where
    KS: Serializer<K>,
    VS: ValueSerializer<V>,
    V: Sync,
{
    /// Creates a producer from a full configuration
    pub fn with_config(
        config: ProducerConfig,
        key_serializer: KS,
        value_serializer: VS,
    ) -> Result<Self, KafkaError> {
        let producer: FutureProducer<LoggingClientContext> = config
            .to_client_config()
            .create_with_context(LoggingClientContext)?;

        info!(
            "Created KafkaProducer connected to {} with default topic {}",
            config.common.brokers, config.default_topic
        );

        Ok(Self {
            producer,
            key_serializer,
            value_serializer,
            config,
            closed: false,
            _phantom: PhantomData,
        })
    }

    /// Creates a producer with default settings
    pub fn new(
        brokers: &str,
        default_topic: &str,
        key_serializer: KS,
        value_serializer: VS,
    ) -> Result<Self, KafkaError> {
        Self::with_config(
            ProducerConfig::new(brokers, default_topic),
            key_serializer,
            value_serializer,
        )
    }

    pub fn default_topic(&self) -> &str {
        &self.config.default_topic
    }

    /// Encode and send one record, waiting for the broker acknowledgment.
    ///
    /// `topic` defaults to the configured default topic. Headers returned by
    /// the value codec are merged over `headers`.
    pub async fn send(
        &self,
        topic: Option<&str>,
        key: Option<&K>,
        value: &V,
        headers: Headers,
    ) -> Result<DeliveryReport, ProducerError> {
        let topic = topic.unwrap_or(&self.config.default_topic);

        let key_bytes = key
            .map(|k| self.key_serializer.serialize(k))
            .transpose()?;
        let encoded = self.value_serializer.serialize(topic, value).await?;

        let mut headers = headers;
        headers.merge(encoded.headers);

        let mut record: FutureRecord<'_, [u8], [u8]> =
            FutureRecord::to(topic).payload(encoded.payload.as_slice());
        if let Some(key) = key_bytes.as_deref() {
            record = record.key(key);
        }
        if !headers.is_empty() {
            record = record.headers(headers.to_rdkafka_headers());
        }

        match self
            .producer
            .send(record, Timeout::After(self.config.enqueue_timeout))
            .await
        {
            Ok((partition, offset)) => {
                debug!(
                    "Message sent to topic '{}' partition {} offset {}",
                    topic, partition, offset
                );
                Ok(DeliveryReport {
                    topic: topic.to_string(),
                    partition,
                    offset,
                })
            }
            Err((err, _)) => {
                error!("Failed to send message to topic '{}': {}", topic, err);
                Err(ProducerError::Delivery {
                    topic: topic.to_string(),
                    source: err,
                })
            }
        }
    }

    /// Flushes any pending messages
    pub fn flush(&self, timeout: Duration) -> Result<(), KafkaError> {
        self.producer.flush(Timeout::After(timeout))
    }

    /// Flush pending records and release the client
    pub fn close(mut self) -> Result<(), ProducerError> {
        self.closed = true;
        info!("Closing producer for {}", self.config.default_topic);
        self.flush(self.config.flush_timeout)?;
        Ok(())
    }
}

impl<K, V, KS, VS> Drop for KafkaProducer<K, V, KS, VS>
where
    KS: Serializer<K>,
    VS: ValueSerializer<V>,
    V: Sync,
{
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush(self.config.flush_timeout) {
            warn!(
                "Producer for {} dropped with {} undelivered records: {}",
                self.config.default_topic,
                self.producer.in_flight_count(),
                e
            );
        }
    }
}
