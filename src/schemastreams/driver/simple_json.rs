//! JSON Schema round trip.
//!
//! Registers [`MESSAGE_SCHEMA`] under the topic name, produces five
//! [`MessageBean`]s keyed `Greeting` and reads them back. The producer is
//! expected to run with `SimpleTopic` + `FindLatest` so that it picks up the
//! artifact registered here.

use log::info;
use serde::{Deserialize, Serialize};

use super::roundtrip::{
    consume_until, finish_producing, format_timestamp, now_millis, produce_batch,
};
use super::{Stage, StageTracker};
use crate::schemastreams::config::ExampleConfig;
use crate::schemastreams::error::SchemaStreamsResult;
use crate::schemastreams::kafka::{Message, MessageSink, MessageSource};
use crate::schemastreams::schema::{ArtifactMetaData, ArtifactType, SchemaRegistrar};

pub const TOPIC_NAME: &str = "SimpleJsonSchemaExample";
pub const SUBJECT_NAME: &str = "Greeting";
pub const MESSAGE_COUNT: usize = 5;

pub const MESSAGE_SCHEMA: &str = r#"{
    "$id": "https://example.com/message.schema.json",
    "$schema": "http://json-schema.org/draft-07/schema#",
    "required": [
        "message",
        "time"
    ],
    "type": "object",
    "properties": {
        "message": {
            "description": "",
            "type": "string"
        },
        "time": {
            "description": "",
            "type": "number"
        }
    }
}"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBean {
    pub message: String,
    /// Epoch milliseconds
    pub time: i64,
}

impl MessageBean {
    pub fn new(message: impl Into<String>, time: i64) -> Self {
        Self {
            message: message.into(),
            time,
        }
    }
}

/// `Hello (0)!` .. `Hello (count - 1)!`, stamped with the current time
pub fn greetings(count: usize) -> Vec<MessageBean> {
    (0..count)
        .map(|i| MessageBean::new(format!("Hello ({})!", i), now_millis()))
        .collect()
}

pub fn describe(bean: &MessageBean) -> String {
    format!(
        "Consumed a message: {} @ {}",
        bean.message,
        format_timestamp(bean.time)
    )
}

/// Register the schema artifact (artifact id = topic)
pub async fn register_schema(
    registrar: &SchemaRegistrar,
    topic: &str,
) -> SchemaStreamsResult<ArtifactMetaData> {
    Ok(registrar
        .ensure_artifact(topic, ArtifactType::Json, MESSAGE_SCHEMA)
        .await?)
}

/// Run the whole example and return the consumed beans in arrival order.
///
/// `consumer` must already be subscribed to `settings.topic`. The producer is
/// flushed before consuming starts, including when producing fails.
pub async fn run<P, C>(
    settings: &ExampleConfig,
    registrar: &SchemaRegistrar,
    producer: &P,
    consumer: &C,
) -> SchemaStreamsResult<Vec<MessageBean>>
where
    P: MessageSink<String, MessageBean> + ?Sized,
    C: MessageSource<String, MessageBean> + ?Sized,
{
    let mut stages = StageTracker::new();
    println!("Starting example {}", settings.topic);

    stages.advance(Stage::RegisterSchemas)?;
    let meta = register_schema(registrar, &settings.topic).await?;
    info!(
        "Producing against artifact {} (global id {})",
        meta.id, meta.global_id
    );

    stages.advance(Stage::Produce)?;
    println!("Producing ({}) messages.", MESSAGE_COUNT);
    let records = greetings(MESSAGE_COUNT)
        .into_iter()
        .map(|bean| (Some(SUBJECT_NAME.to_string()), bean));
    let produced = produce_batch(producer, &settings.topic, records, settings.send_pacing).await;
    finish_producing(producer, produced).await?;
    println!("Messages successfully produced.");

    stages.advance(Stage::Consume)?;
    println!("Consuming ({}) messages.", MESSAGE_COUNT);
    let consumed = consume_until(
        consumer,
        MESSAGE_COUNT,
        settings.poll_timeout,
        settings.max_empty_polls,
        |record: &Message<String, MessageBean>| println!("{}", describe(record.value())),
    )
    .await?;

    stages.advance(Stage::Done)?;
    println!("Done (success).");
    Ok(consumed.into_iter().map(Message::into_value).collect())
}
