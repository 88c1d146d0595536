//! Avro round trip with several record types on one topic.
//!
//! Four schema variants go onto the same topic, five records each: Greeting
//! v1, Greeting v2 (adds `Extra`), Farewell v1 and Farewell v2. Nothing is
//! registered up front; with `Record` + `CachedSchema` the serializer
//! registers each schema the first time it sees it. Every consumed record is
//! decoded with the schema its own id points at, so v1 records never show an
//! `Extra` field and v2 records always do.

use log::info;
use std::sync::Arc;
use uuid::Uuid;

use super::roundtrip::{
    consume_until, finish_producing, format_timestamp, now_millis, produce_batch,
};
use super::{Stage, StageTracker};
use crate::schemastreams::config::ExampleConfig;
use crate::schemastreams::error::SchemaStreamsResult;
use crate::schemastreams::kafka::{Message, MessageSink, MessageSource};
use crate::schemastreams::serdes::GenericRecord;
use crate::schemastreams::serdes::avro::parse_record_schema;

pub const TOPIC_NAME: &str = "MixAvroExample";
pub const MESSAGES_PER_VARIANT: usize = 5;

pub const GREETING_SCHEMA_V1: &str = r#"{"type":"record","name":"Greeting","fields":[{"name":"Message","type":"string"},{"name":"Time","type":"long"}]}"#;
pub const GREETING_SCHEMA_V2: &str = r#"{"type":"record","name":"Greeting","fields":[{"name":"Message","type":"string"},{"name":"Time","type":"long"},{"name":"Extra","type":"string"}]}"#;
pub const FAREWELL_SCHEMA_V1: &str = r#"{"type":"record","name":"Farewell","fields":[{"name":"Message","type":"string"},{"name":"Time","type":"long"}]}"#;
pub const FAREWELL_SCHEMA_V2: &str = r#"{"type":"record","name":"Farewell","fields":[{"name":"Message","type":"string"},{"name":"Time","type":"long"},{"name":"Extra","type":"string"}]}"#;

/// One schema version and the `Extra` value its records carry, if any
#[derive(Debug, Clone, Copy)]
pub struct Variant {
    pub schema: &'static str,
    pub extra: Option<&'static str>,
}

pub const VARIANTS: [Variant; 4] = [
    Variant {
        schema: GREETING_SCHEMA_V1,
        extra: None,
    },
    Variant {
        schema: GREETING_SCHEMA_V2,
        extra: Some("extra greeting"),
    },
    Variant {
        schema: FAREWELL_SCHEMA_V1,
        extra: None,
    },
    Variant {
        schema: FAREWELL_SCHEMA_V2,
        extra: Some("extra farewell"),
    },
];

pub fn expected_count() -> usize {
    VARIANTS.len() * MESSAGES_PER_VARIANT
}

/// `count` records of `variant`, messages `Hello (0)!` onwards
pub fn build_records(variant: &Variant, count: usize) -> SchemaStreamsResult<Vec<GenericRecord>> {
    let schema = Arc::new(parse_record_schema(variant.schema)?);

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let mut record = GenericRecord::new(Arc::clone(&schema))?;
        record
            .put("Message", format!("Hello ({})!", i))?
            .put("Time", now_millis())?;
        if let Some(extra) = variant.extra {
            record.put("Extra", extra)?;
        }
        records.push(record);
    }
    Ok(records)
}

pub fn describe(record: &GenericRecord) -> String {
    let message = record.get_str("Message").unwrap_or_default();
    let time = record
        .get_long("Time")
        .map(format_timestamp)
        .unwrap_or_default();

    if record.has_field("Extra") {
        format!(
            "Consumed {}: {} @ {} @ {}",
            record.full_name(),
            message,
            time,
            record.get_str("Extra").unwrap_or_default()
        )
    } else {
        format!("Consumed {}: {} @ {}", record.full_name(), message, time)
    }
}

async fn produce_variants<P>(producer: &P, settings: &ExampleConfig) -> SchemaStreamsResult<usize>
where
    P: MessageSink<String, GenericRecord> + ?Sized,
{
    let mut produced = 0;
    for variant in &VARIANTS {
        println!("Producing ({}) messages.", MESSAGES_PER_VARIANT);
        let records = build_records(variant, MESSAGES_PER_VARIANT)?
            .into_iter()
            .map(|record| (Some(Uuid::new_v4().to_string()), record));
        produced += produce_batch(producer, &settings.topic, records, settings.send_pacing).await?;
        println!("Messages successfully produced.");
    }
    Ok(produced)
}

/// Run the whole example and return the consumed records in arrival order.
///
/// `consumer` must already be subscribed to `settings.topic`. The producer is
/// flushed before consuming starts, including when producing fails.
pub async fn run<P, C>(
    settings: &ExampleConfig,
    producer: &P,
    consumer: &C,
) -> SchemaStreamsResult<Vec<GenericRecord>>
where
    P: MessageSink<String, GenericRecord> + ?Sized,
    C: MessageSource<String, GenericRecord> + ?Sized,
{
    let mut stages = StageTracker::new();
    println!("Starting example {}", settings.topic);

    stages.advance(Stage::RegisterSchemas)?;
    info!("Avro schemas are registered by the serializer on first use");

    stages.advance(Stage::Produce)?;
    let produced = produce_variants(producer, settings).await;
    let produced = finish_producing(producer, produced).await?;

    stages.advance(Stage::Consume)?;
    println!("Consuming ({}) messages.", produced);
    let consumed = consume_until(
        consumer,
        produced,
        settings.poll_timeout,
        settings.max_empty_polls,
        |record: &Message<String, GenericRecord>| println!("{}", describe(record.value())),
    )
    .await?;

    stages.advance(Stage::Done)?;
    println!("Done (success).");
    Ok(consumed.into_iter().map(Message::into_value).collect())
}
