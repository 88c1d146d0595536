//! Avro binary payloads with the writer schema resolved by global id.
//!
//! Values travel as [`GenericRecord`]s that carry their own schema, so a
//! single topic can mix record types and versions.

use apache_avro::schema::RecordSchema;
use apache_avro::types::Value as AvroValue;
use apache_avro::{Schema, from_avro_datum, to_avro_datum};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::config::SerdeConfig;
use super::error::SerializationError;
use super::schema_cache::SchemaCache;
use super::traits::{ValueDeserializer, ValueSerializer};
use super::wire::{self, EncodedValue};
use crate::schemastreams::kafka::Headers;
use crate::schemastreams::schema::{ArtifactType, GlobalIdResolver};

/// Parse an Avro schema that must describe a record
pub fn parse_record_schema(content: &str) -> Result<Schema, SerializationError> {
    let schema = Schema::parse_str(content)?;
    match schema {
        Schema::Record(_) => Ok(schema),
        other => Err(SerializationError::SchemaError(format!(
            "expected a record schema, got {:?}",
            other
        ))),
    }
}

/// An Avro record together with the schema it was written or read with
#[derive(Debug, Clone, PartialEq)]
pub struct GenericRecord {
    schema: Arc<Schema>,
    fields: HashMap<String, AvroValue>,
}

impl GenericRecord {
    pub fn new(schema: Arc<Schema>) -> Result<Self, SerializationError> {
        record_schema(&schema)?;
        Ok(Self {
            schema,
            fields: HashMap::new(),
        })
    }

    /// Set a field; the name must exist in the schema
    pub fn put(
        &mut self,
        name: &str,
        value: impl Into<AvroValue>,
    ) -> Result<&mut Self, SerializationError> {
        if !self.has_field(name) {
            return Err(SerializationError::SerializationFailed(format!(
                "record {} has no field '{}'",
                self.full_name(),
                name
            )));
        }
        self.fields.insert(name.to_string(), value.into());
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&AvroValue> {
        self.fields.get(name).map(unwrap_union)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            AvroValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            AvroValue::Long(v) => Some(*v),
            AvroValue::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Whether the record's schema declares `name`
    pub fn has_field(&self, name: &str) -> bool {
        self.record().is_some_and(|r| r.lookup.contains_key(name))
    }

    /// Namespace-qualified record name
    pub fn full_name(&self) -> String {
        self.record()
            .map(|r| r.name.fullname(None))
            .unwrap_or_default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn record(&self) -> Option<&RecordSchema> {
        match self.schema.as_ref() {
            Schema::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Avro value with fields in schema order
    pub fn to_value(&self) -> Result<AvroValue, SerializationError> {
        let record = record_schema(&self.schema)?;
        let mut values = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let value = self.fields.get(&field.name).cloned().ok_or_else(|| {
                SerializationError::SerializationFailed(format!(
                    "record {} is missing field '{}'",
                    self.full_name(),
                    field.name
                ))
            })?;
            values.push((field.name.clone(), value));
        }
        Ok(AvroValue::Record(values))
    }

    /// Wrap a decoded value read with `schema`
    pub fn from_value(schema: Arc<Schema>, value: AvroValue) -> Result<Self, SerializationError> {
        record_schema(&schema)?;
        match value {
            AvroValue::Record(fields) => Ok(Self {
                schema,
                fields: fields.into_iter().collect(),
            }),
            other => Err(SerializationError::DeserializationFailed(format!(
                "expected an Avro record, got {:?}",
                other
            ))),
        }
    }
}

fn record_schema(schema: &Schema) -> Result<&RecordSchema, SerializationError> {
    match schema {
        Schema::Record(record) => Ok(record),
        _ => Err(SerializationError::SchemaError(
            "generic records need a record schema".to_string(),
        )),
    }
}

fn unwrap_union(value: &AvroValue) -> &AvroValue {
    match value {
        AvroValue::Union(_, inner) => inner.as_ref(),
        other => other,
    }
}

/// Serializes [`GenericRecord`]s to Avro binary tagged with their global id
pub struct AvroSerializer {
    config: SerdeConfig,
    resolver: GlobalIdResolver,
}

impl AvroSerializer {
    pub fn new(config: SerdeConfig) -> Result<Self, SerializationError> {
        let client = config.registry_client()?;
        Ok(Self {
            resolver: GlobalIdResolver::new(client, config.global_id_strategy),
            config,
        })
    }

    pub fn config(&self) -> &SerdeConfig {
        &self.config
    }
}

#[async_trait]
impl ValueSerializer<GenericRecord> for AvroSerializer {
    async fn serialize(
        &self,
        topic: &str,
        record: &GenericRecord,
    ) -> Result<EncodedValue, SerializationError> {
        let schema = record.schema();
        let full_name = record.full_name();
        let content = serde_json::to_string(&**schema)?;

        let artifact_id = self.config.artifact_id_strategy.artifact_id(
            topic,
            self.config.is_key,
            Some(full_name.as_str()),
        )?;
        let global_id = self
            .resolver
            .resolve(&artifact_id, ArtifactType::Avro, Some(content.as_str()))
            .await?;

        let body = to_avro_datum(schema, record.to_value()?)?;
        debug!(
            "Encoded {} for '{}' with global id {} ({} bytes)",
            full_name,
            artifact_id,
            global_id,
            body.len()
        );
        wire::frame(
            self.config.id_handler,
            self.config.use_headers,
            self.config.is_key,
            global_id,
            body,
        )
    }
}

/// Decodes Avro records with the writer schema named by their global id
pub struct AvroDeserializer {
    config: SerdeConfig,
    schemas: SchemaCache<Schema>,
}

impl AvroDeserializer {
    pub fn new(config: SerdeConfig) -> Result<Self, SerializationError> {
        let client = config.registry_client()?;
        Ok(Self {
            schemas: SchemaCache::new(client),
            config,
        })
    }

    pub fn config(&self) -> &SerdeConfig {
        &self.config
    }

    /// Number of distinct writer schemas fetched so far
    pub async fn cached_schemas(&self) -> usize {
        self.schemas.len().await
    }
}

#[async_trait]
impl ValueDeserializer<GenericRecord> for AvroDeserializer {
    async fn deserialize(
        &self,
        _topic: &str,
        headers: &Headers,
        payload: &[u8],
    ) -> Result<GenericRecord, SerializationError> {
        let (global_id, mut body) =
            wire::unframe(self.config.id_handler, self.config.is_key, headers, payload)?;
        let schema = self
            .schemas
            .get_or_load(global_id, parse_record_schema)
            .await?;

        let value = from_avro_datum(&schema, &mut body, None)?;
        if !body.is_empty() {
            return Err(SerializationError::InvalidEnvelope(format!(
                "{} bytes left after decoding record with global id {}",
                body.len(),
                global_id
            )));
        }
        GenericRecord::from_value(schema, value)
    }
}
