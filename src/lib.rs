//! # schemastreams
//!
//! Typed Kafka producers and consumers whose value codecs talk to an Apicurio
//! schema registry. Every outgoing record carries the global id of the schema
//! it was written with (in a `0x00`-prefixed envelope or a record header), and
//! every incoming record is decoded with exactly that schema version.
//!
//! ## Features
//!
//! - **Registry Client**: async client for the registry's v1 REST API
//! - **Id Strategies**: artifact-id and global-id strategies selected by configuration
//! - **Value Codecs**: JSON Schema and Avro serializers/deserializers with schema caches
//! - **Typed Clients**: `rdkafka` producer and consumer wrappers with headers support
//! - **Example Drivers**: the JSON and mixed-Avro round trips as reusable library code
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemastreams::{
//!     ArtifactIdStrategy, GlobalIdStrategy, Headers, JsonSchemaSerializer, KafkaProducer,
//!     SerdeConfig, StringSerializer,
//! };
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Greeting {
//!     message: String,
//!     time: i64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let serde_config = SerdeConfig::new("http://localhost:8080/api")
//!         .artifact_id_strategy(ArtifactIdStrategy::SimpleTopic)
//!         .global_id_strategy(GlobalIdStrategy::FindLatest);
//!
//!     let producer = KafkaProducer::<String, Greeting, _, _>::new(
//!         "localhost:9092",
//!         "greetings",
//!         StringSerializer,
//!         JsonSchemaSerializer::new(serde_config)?,
//!     )?;
//!
//!     let greeting = Greeting { message: "Hello".to_string(), time: 0 };
//!     producer
//!         .send(None, Some(&"Greeting".to_string()), &greeting, Headers::new())
//!         .await?;
//!     producer.close()?;
//!     Ok(())
//! }
//! ```

pub mod schemastreams;

// Re-export main API at crate root for easy access
pub use schemastreams::kafka::{
    ConsumerConfig, ConsumerError, DeliveryReport, Headers, KafkaConsumer, KafkaProducer,
    Message, MessageSink, MessageSource, ProducerConfig, ProducerError, Serializer,
    StringSerializer,
};
pub use schemastreams::schema::{
    ArtifactIdStrategy, ArtifactMetaData, ArtifactType, GlobalIdStrategy, IfExists,
    RegistryClient, SchemaError, SchemaRegistrar,
};
pub use schemastreams::serdes::{
    AvroDeserializer, AvroSerializer, GenericRecord, JsonSchemaDeserializer,
    JsonSchemaSerializer, SerdeConfig, SerializationError, ValueDeserializer, ValueSerializer,
};
pub use schemastreams::{ExampleConfig, SchemaStreamsError, SchemaStreamsResult};
