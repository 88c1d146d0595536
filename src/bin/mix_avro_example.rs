//! Mixed Avro example
//!
//! Produces Greeting and Farewell records in two schema versions each onto a
//! single topic, letting the serializer register every schema on first use,
//! then consumes all twenty records with their own writer schemas.

use schemastreams::schemastreams::driver::mix_avro;
use schemastreams::{
    ArtifactIdStrategy, AvroDeserializer, AvroSerializer, ExampleConfig, GenericRecord,
    GlobalIdStrategy, KafkaConsumer, KafkaProducer, SchemaStreamsError, SerdeConfig,
    StringSerializer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = ExampleConfig::from_env(mix_avro::TOPIC_NAME)?;

    // Artifact id = record full name; look up by content, register when missing
    let producer_serde = SerdeConfig::new(settings.registry_url.clone())
        .artifact_id_strategy(ArtifactIdStrategy::Record)
        .global_id_strategy(GlobalIdStrategy::CachedSchema);
    // The global id travels with each record, so the consumer only needs the registry
    let consumer_serde = SerdeConfig::new(settings.registry_url.clone());

    let producer = KafkaProducer::<String, GenericRecord, _, _>::with_config(
        settings.producer_config(),
        StringSerializer,
        AvroSerializer::new(producer_serde)?,
    )
    .map_err(|e| SchemaStreamsError::kafka(e, "creating the producer"))?;

    let consumer = KafkaConsumer::<String, GenericRecord, _, _>::with_config(
        settings.consumer_config(),
        StringSerializer,
        AvroDeserializer::new(consumer_serde)?,
    )
    .map_err(|e| SchemaStreamsError::kafka(e, "creating the consumer"))?;

    println!("Subscribing to topic {}", settings.topic);
    consumer
        .subscribe(&[settings.topic.as_str()])
        .map_err(|e| SchemaStreamsError::kafka(e, "subscribing"))?;

    let outcome = mix_avro::run(&settings, &producer, &consumer).await;

    println!("Closing the producer.");
    let closed = producer.close();
    consumer.close();

    outcome?;
    closed?;
    Ok(())
}
