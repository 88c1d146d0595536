use rdkafka::config::ClientConfig;
use std::time::Duration;

use super::client_config_builder::ClientConfigBuilder;
use super::common_config::CommonKafkaConfig;

/// Configuration for the typed producer
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Common configuration shared with consumer
    pub common: CommonKafkaConfig,
    /// Topic used when a send does not name one
    pub default_topic: String,
    /// How long librdkafka may keep trying to deliver a record
    pub message_timeout: Duration,
    /// How long `send` waits for room in the local queue
    pub enqueue_timeout: Duration,
    /// Upper bound for the flush performed on close
    pub flush_timeout: Duration,
    pub acks: AckMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    /// Don't wait for acknowledgment
    None,
    /// Wait for leader acknowledgment only
    Leader,
    /// Wait for all in-sync replicas
    All,
}

impl AckMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AckMode::None => "0",
            AckMode::Leader => "1",
            AckMode::All => "all",
        }
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            common: CommonKafkaConfig::default(),
            default_topic: "default-topic".to_string(),
            message_timeout: Duration::from_secs(30),
            enqueue_timeout: Duration::from_secs(30),
            flush_timeout: Duration::from_secs(10),
            acks: AckMode::All,
        }
    }
}

impl ProducerConfig {
    pub fn new(brokers: impl Into<String>, default_topic: impl Into<String>) -> Self {
        Self {
            common: CommonKafkaConfig::new(brokers),
            default_topic: default_topic.into(),
            ..Default::default()
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.common = self.common.client_id(client_id);
        self
    }

    pub fn acks(mut self, acks: AckMode) -> Self {
        self.acks = acks;
        self
    }

    pub fn message_timeout(mut self, timeout: Duration) -> Self {
        self.message_timeout = timeout;
        self
    }

    pub fn flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    pub fn custom_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common = self.common.custom_property(key, value);
        self
    }

    /// librdkafka configuration for this producer
    pub fn to_client_config(&self) -> ClientConfig {
        let mut config = ClientConfigBuilder::new()
            .property("acks", self.acks.as_str())
            .property(
                "message.timeout.ms",
                self.message_timeout.as_millis().to_string(),
            )
            .common(&self.common)
            .build();
        config.set_log_level(rdkafka::config::RDKafkaLogLevel::Info);
        config
    }
}
