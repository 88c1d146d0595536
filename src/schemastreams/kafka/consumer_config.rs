use rdkafka::config::ClientConfig;
use std::time::Duration;

use super::client_config_builder::ClientConfigBuilder;
use super::common_config::CommonKafkaConfig;

/// Configuration for the typed consumer
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Common configuration shared with producer
    pub common: CommonKafkaConfig,
    pub group_id: String,
    pub auto_offset_reset: OffsetReset,
    pub enable_auto_commit: bool,
    pub auto_commit_interval: Duration,
    pub session_timeout: Duration,
    /// Most records returned by one `poll_batch`
    pub max_poll_records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetReset {
    /// Reset to earliest available offset
    Earliest,
    /// Reset to latest offset
    Latest,
    /// Fail if no initial offset
    None,
}

impl OffsetReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
            OffsetReset::None => "error",
        }
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            common: CommonKafkaConfig::default(),
            group_id: "default-group".to_string(),
            auto_offset_reset: OffsetReset::Earliest,
            enable_auto_commit: true,
            auto_commit_interval: Duration::from_millis(1000),
            session_timeout: Duration::from_secs(30),
            max_poll_records: 500,
        }
    }
}

impl ConsumerConfig {
    pub fn new(brokers: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            common: CommonKafkaConfig::new(brokers),
            group_id: group_id.into(),
            ..Default::default()
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.common = self.common.client_id(client_id);
        self
    }

    pub fn auto_offset_reset(mut self, reset: OffsetReset) -> Self {
        self.auto_offset_reset = reset;
        self
    }

    pub fn auto_commit(mut self, enable: bool, interval: Duration) -> Self {
        self.enable_auto_commit = enable;
        self.auto_commit_interval = interval;
        self
    }

    pub fn max_poll_records(mut self, max_records: usize) -> Self {
        self.max_poll_records = max_records.max(1);
        self
    }

    pub fn custom_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common = self.common.custom_property(key, value);
        self
    }

    /// librdkafka configuration for this consumer
    pub fn to_client_config(&self) -> ClientConfig {
        let mut config = ClientConfigBuilder::new()
            .property("group.id", self.group_id.as_str())
            .property("auto.offset.reset", self.auto_offset_reset.as_str())
            .property("enable.auto.commit", self.enable_auto_commit.to_string())
            .property(
                "auto.commit.interval.ms",
                self.auto_commit_interval.as_millis().to_string(),
            )
            .property(
                "session.timeout.ms",
                self.session_timeout.as_millis().to_string(),
            )
            .common(&self.common)
            .build();
        config.set_log_level(rdkafka::config::RDKafkaLogLevel::Info);
        config
    }
}
