use log::{debug, error, warn};
use rdkafka::config::RDKafkaLogLevel;
use rdkafka::consumer::ConsumerContext;
use rdkafka::error::{KafkaError, KafkaResult};
use rdkafka::{ClientContext, TopicPartitionList};

use super::utils::convert_kafka_log_level;

/// Client context that forwards librdkafka's own logging to the `log` facade.
///
/// Shared by the producer and the consumer; the consumer side also reports
/// offset commits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingClientContext;

impl ClientContext for LoggingClientContext {
    fn log(&self, level: RDKafkaLogLevel, fac: &str, message: &str) {
        log::log!(
            convert_kafka_log_level(level),
            "Kafka log ({}): {}",
            fac,
            message
        );
    }

    fn error(&self, error: KafkaError, reason: &str) {
        error!("Kafka client error: {:?}, reason: {}", error, reason);
    }
}

impl ConsumerContext for LoggingClientContext {
    fn commit_callback(&self, result: KafkaResult<()>, offsets: &TopicPartitionList) {
        match result {
            Ok(()) => debug!("Committed offsets for {} partitions", offsets.count()),
            Err(e) => warn!("Offset commit failed: {}", e),
        }
    }
}
