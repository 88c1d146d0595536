//! Produce-then-consume loops shared by both examples.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::time::Duration;

use crate::schemastreams::error::{SchemaStreamsError, SchemaStreamsResult};
use crate::schemastreams::kafka::{KafkaClientError, Message, MessageSink, MessageSource};

/// Upper bound for draining the producer queue after the last send
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Send `records` one at a time, awaiting each delivery and pausing
/// `pacing` between sends. Returns the number of records delivered.
pub async fn produce_batch<K, V, P, I>(
    sink: &P,
    topic: &str,
    records: I,
    pacing: Duration,
) -> SchemaStreamsResult<usize>
where
    K: Sync,
    V: Sync,
    P: MessageSink<K, V> + ?Sized,
    I: IntoIterator<Item = (Option<K>, V)>,
{
    let mut produced = 0;
    for (key, value) in records {
        let report = sink
            .send(topic, key.as_ref(), &value)
            .await
            .map_err(|e| client_error(e, format!("producing to topic {}", topic)))?;
        debug!(
            "Delivered record {} to {}[{}] at offset {}",
            produced, report.topic, report.partition, report.offset
        );
        produced += 1;

        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }
    Ok(produced)
}

/// Flush `sink` whatever `outcome` is, then hand `outcome` back.
///
/// A flush failure replaces a successful outcome; when producing already
/// failed, that error wins and the flush failure is only logged.
pub async fn finish_producing<K, V, P, T>(
    sink: &P,
    outcome: SchemaStreamsResult<T>,
) -> SchemaStreamsResult<T>
where
    K: Sync,
    V: Sync,
    P: MessageSink<K, V> + ?Sized,
{
    let flushed = sink.flush(FLUSH_TIMEOUT).await;
    match (outcome, flushed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(client_error(e, "flushing the producer")),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(flush_err)) => {
            warn!("Flush after failed produce also failed: {}", flush_err);
            Err(e)
        }
    }
}

/// Poll `source` until at least `expected` records have been consumed.
///
/// Every record is handed to `on_record` as it arrives. An empty poll prints
/// `No messages waiting...` and does not count toward `expected`; after
/// `max_empty_polls` consecutive empty polls the loop gives up with
/// [`SchemaStreamsError::ConsumeBudgetExhausted`]. A budget of zero polls
/// forever.
pub async fn consume_until<K, V, S, F>(
    source: &S,
    expected: usize,
    poll_timeout: Duration,
    max_empty_polls: u32,
    mut on_record: F,
) -> SchemaStreamsResult<Vec<Message<K, V>>>
where
    S: MessageSource<K, V> + ?Sized,
    F: FnMut(&Message<K, V>),
{
    let mut consumed = Vec::with_capacity(expected);
    let mut empty_polls = 0u32;

    while consumed.len() < expected {
        let batch = source
            .poll_batch(poll_timeout)
            .await
            .map_err(|e| client_error(e, "polling for records"))?;

        if batch.is_empty() {
            println!("No messages waiting...");
            empty_polls += 1;
            if max_empty_polls > 0 && empty_polls >= max_empty_polls {
                return Err(SchemaStreamsError::ConsumeBudgetExhausted {
                    expected,
                    received: consumed.len(),
                    empty_polls,
                });
            }
            continue;
        }

        empty_polls = 0;
        for message in batch {
            on_record(&message);
            consumed.push(message);
        }
    }

    Ok(consumed)
}

/// Epoch milliseconds rendered like `Mon Oct 19 09:30:00 UTC 2026`
pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%a %b %d %H:%M:%S UTC %Y").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// Codec failures keep their own variant so callers can tell a bad payload
// from a broker problem.
fn client_error(err: KafkaClientError, context: impl Into<String>) -> SchemaStreamsError {
    match err {
        KafkaClientError::Codec(e) => SchemaStreamsError::Serialization(e),
        other => SchemaStreamsError::kafka(other, context),
    }
}
