//! Environment-driven settings for the example programs.
//!
//! Every value has a default matching a local development setup (registry on
//! port 8080, broker on 9092) and can be overridden through the environment:
//!
//! | variable                          | default                      |
//! |-----------------------------------|------------------------------|
//! | `SCHEMASTREAMS_REGISTRY_URL`      | `http://localhost:8080/api`  |
//! | `SCHEMASTREAMS_KAFKA_BROKERS`     | `localhost:9092`             |
//! | `SCHEMASTREAMS_TOPIC`             | the example's name           |
//! | `SCHEMASTREAMS_POLL_TIMEOUT_MS`   | `1000`                       |
//! | `SCHEMASTREAMS_SEND_PACING_MS`    | `100`                        |
//! | `SCHEMASTREAMS_MAX_EMPTY_POLLS`   | `60`                         |

use std::env;
use std::time::Duration;

use crate::schemastreams::error::SchemaStreamsError;
use crate::schemastreams::kafka::{AckMode, ConsumerConfig, OffsetReset, ProducerConfig};
use crate::schemastreams::serdes::config::DEFAULT_REGISTRY_URL;

pub const DEFAULT_BROKERS: &str = "localhost:9092";

#[derive(Debug, Clone, PartialEq)]
pub struct ExampleConfig {
    pub registry_url: String,
    pub brokers: String,
    pub topic: String,
    /// Bounded wait of a single poll
    pub poll_timeout: Duration,
    /// Pause between two sends, only to keep console output readable
    pub send_pacing: Duration,
    /// Consecutive empty polls tolerated before consuming gives up
    pub max_empty_polls: u32,
}

impl ExampleConfig {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            brokers: DEFAULT_BROKERS.to_string(),
            topic: topic.into(),
            poll_timeout: Duration::from_millis(1000),
            send_pacing: Duration::from_millis(100),
            max_empty_polls: 60,
        }
    }

    /// Defaults overridden by `SCHEMASTREAMS_*` environment variables
    pub fn from_env(default_topic: &str) -> Result<Self, SchemaStreamsError> {
        Self::from_lookup(default_topic, |key| env::var(key).ok())
    }

    /// Same as [`ExampleConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(default_topic: &str, lookup: F) -> Result<Self, SchemaStreamsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new(default_topic);

        Ok(Self {
            registry_url: lookup("SCHEMASTREAMS_REGISTRY_URL").unwrap_or(defaults.registry_url),
            brokers: lookup("SCHEMASTREAMS_KAFKA_BROKERS").unwrap_or(defaults.brokers),
            topic: lookup("SCHEMASTREAMS_TOPIC").unwrap_or(defaults.topic),
            poll_timeout: parse_millis(&lookup, "SCHEMASTREAMS_POLL_TIMEOUT_MS")?
                .unwrap_or(defaults.poll_timeout),
            send_pacing: parse_millis(&lookup, "SCHEMASTREAMS_SEND_PACING_MS")?
                .unwrap_or(defaults.send_pacing),
            max_empty_polls: match lookup("SCHEMASTREAMS_MAX_EMPTY_POLLS") {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    SchemaStreamsError::config(format!(
                        "SCHEMASTREAMS_MAX_EMPTY_POLLS must be a non-negative integer, got '{}'",
                        raw
                    ))
                })?,
                None => defaults.max_empty_polls,
            },
        })
    }

    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    pub fn with_brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = brokers.into();
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_send_pacing(mut self, pacing: Duration) -> Self {
        self.send_pacing = pacing;
        self
    }

    pub fn with_max_empty_polls(mut self, polls: u32) -> Self {
        self.max_empty_polls = polls;
        self
    }

    /// Producer settings used by both examples: `Producer-<topic>`, acks=all
    pub fn producer_config(&self) -> ProducerConfig {
        ProducerConfig::new(&self.brokers, &self.topic)
            .client_id(format!("Producer-{}", self.topic))
            .acks(AckMode::All)
    }

    /// Consumer settings used by both examples: `Consumer-<topic>`,
    /// auto-commit every second, start from the earliest offset
    pub fn consumer_config(&self) -> ConsumerConfig {
        ConsumerConfig::new(&self.brokers, format!("Consumer-{}", self.topic))
            .auto_commit(true, Duration::from_millis(1000))
            .auto_offset_reset(OffsetReset::Earliest)
    }
}

fn parse_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, SchemaStreamsError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| {
                SchemaStreamsError::config(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    key, raw
                ))
            }),
    }
}
