//! JSON Schema example
//!
//! Registers a JSON schema under the topic name, produces five greetings
//! validated against it and consumes them back.

use schemastreams::schemastreams::driver::simple_json::{self, MessageBean};
use schemastreams::{
    ArtifactIdStrategy, ExampleConfig, GlobalIdStrategy, JsonSchemaDeserializer,
    JsonSchemaSerializer, KafkaConsumer, KafkaProducer, RegistryClient, SchemaRegistrar,
    SchemaStreamsError, SerdeConfig, StringSerializer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = ExampleConfig::from_env(simple_json::TOPIC_NAME)?;
    let registrar = SchemaRegistrar::new(RegistryClient::new(&settings.registry_url)?);

    // The artifact is registered under the topic name, so map topic -> artifact id
    let producer_serde = SerdeConfig::new(settings.registry_url.clone())
        .artifact_id_strategy(ArtifactIdStrategy::SimpleTopic)
        .global_id_strategy(GlobalIdStrategy::FindLatest)
        .validation(true);
    let consumer_serde = SerdeConfig::new(settings.registry_url.clone()).validation(true);

    let producer = KafkaProducer::<String, MessageBean, _, _>::with_config(
        settings.producer_config(),
        StringSerializer,
        JsonSchemaSerializer::new(producer_serde)?,
    )
    .map_err(|e| SchemaStreamsError::kafka(e, "creating the producer"))?;

    let consumer = KafkaConsumer::<String, MessageBean, _, _>::with_config(
        settings.consumer_config(),
        StringSerializer,
        JsonSchemaDeserializer::new(consumer_serde)?,
    )
    .map_err(|e| SchemaStreamsError::kafka(e, "creating the consumer"))?;

    println!("Subscribing to topic {}", settings.topic);
    consumer
        .subscribe(&[settings.topic.as_str()])
        .map_err(|e| SchemaStreamsError::kafka(e, "subscribing"))?;

    let outcome = simple_json::run(&settings, &registrar, &producer, &consumer).await;

    println!("Closing the producer.");
    let closed = producer.close();
    consumer.close();

    outcome?;
    closed?;
    Ok(())
}
