use rdkafka::config::ClientConfig;
use std::collections::HashMap;
use std::time::Duration;

use super::common_config::CommonKafkaConfig;

/// Shared builder turning our config structs into an rdkafka `ClientConfig`
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::new(),
        }
    }

    /// Apply every field of a [`CommonKafkaConfig`]; custom properties go last
    pub fn common(self, common: &CommonKafkaConfig) -> Self {
        self.bootstrap_servers(&common.brokers)
            .client_id(common.client_id.as_deref())
            .request_timeout(common.request_timeout)
            .retry_backoff(common.retry_backoff)
            .custom_properties(&common.custom_config)
    }

    pub fn bootstrap_servers(mut self, brokers: &str) -> Self {
        self.config.set("bootstrap.servers", brokers);
        self
    }

    pub fn client_id(mut self, client_id: Option<&str>) -> Self {
        if let Some(id) = client_id {
            self.config.set("client.id", id);
        }
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config
            .set("request.timeout.ms", timeout.as_millis().to_string());
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.config
            .set("retry.backoff.ms", backoff.as_millis().to_string());
        self
    }

    pub fn custom_properties(mut self, custom_config: &HashMap<String, String>) -> Self {
        for (key, value) in custom_config {
            self.config.set(key, value);
        }
        self
    }

    pub fn property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.config.set(key, value);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
