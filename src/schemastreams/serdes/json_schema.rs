//! JSON payloads checked against a registered JSON Schema.

use async_trait::async_trait;
use jsonschema::Validator;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::config::SerdeConfig;
use super::error::SerializationError;
use super::schema_cache::SchemaCache;
use super::traits::{ValueDeserializer, ValueSerializer};
use super::wire::{self, EncodedValue};
use crate::schemastreams::kafka::Headers;
use crate::schemastreams::schema::{ArtifactType, GlobalIdResolver};

/// Compile a JSON Schema document
pub fn compile_schema(content: &str) -> Result<Validator, SerializationError> {
    let schema: Value = serde_json::from_str(content)?;
    jsonschema::validator_for(&schema)
        .map_err(|e| SerializationError::SchemaError(format!("Invalid JSON Schema: {}", e)))
}

/// Validate `instance`, reporting every violation
pub fn validate(validator: &Validator, instance: &Value) -> Result<(), SerializationError> {
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| e.to_string())
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SerializationError::Validation(errors.join("; ")))
    }
}

/// Schema document supplied by the application rather than the registry
struct LocalSchema {
    content: String,
    title: Option<String>,
    validator: Arc<Validator>,
}

/// Serializes values as JSON tagged with the global id of their JSON Schema
pub struct JsonSchemaSerializer {
    config: SerdeConfig,
    resolver: GlobalIdResolver,
    schemas: SchemaCache<Validator>,
    local: Option<LocalSchema>,
}

impl JsonSchemaSerializer {
    pub fn new(config: SerdeConfig) -> Result<Self, SerializationError> {
        let client = config.registry_client()?;
        Ok(Self {
            resolver: GlobalIdResolver::new(client.clone(), config.global_id_strategy),
            schemas: SchemaCache::new(client),
            config,
            local: None,
        })
    }

    /// Use `content` as the writer schema.
    ///
    /// Needed by every global-id strategy except find-latest, and by the
    /// record based artifact-id strategies (the schema `title` is the record name).
    pub fn with_schema(mut self, content: &str) -> Result<Self, SerializationError> {
        let validator = compile_schema(content)?;
        let schema: Value = serde_json::from_str(content)?;
        self.local = Some(LocalSchema {
            content: content.to_string(),
            title: schema.get("title").and_then(Value::as_str).map(str::to_string),
            validator: Arc::new(validator),
        });
        Ok(self)
    }

    pub fn config(&self) -> &SerdeConfig {
        &self.config
    }

    fn record_name(&self) -> Option<&str> {
        self.local.as_ref()?.title.as_deref()
    }

    /// Validator for the schema `global_id` names.
    ///
    /// The local schema only qualifies when the strategy resolved the id from
    /// that content; find-latest may point at any registered version.
    async fn validator_for(&self, global_id: i64) -> Result<Arc<Validator>, SerializationError> {
        match &self.local {
            Some(local) if self.config.global_id_strategy.needs_schema() => {
                Ok(Arc::clone(&local.validator))
            }
            _ => self.schemas.get_or_load(global_id, compile_schema).await,
        }
    }
}

#[async_trait]
impl<T> ValueSerializer<T> for JsonSchemaSerializer
where
    T: Serialize + Sync,
{
    async fn serialize(&self, topic: &str, value: &T) -> Result<EncodedValue, SerializationError> {
        let artifact_id = self.config.artifact_id_strategy.artifact_id(
            topic,
            self.config.is_key,
            self.record_name(),
        )?;
        let global_id = self
            .resolver
            .resolve(
                &artifact_id,
                ArtifactType::Json,
                self.local.as_ref().map(|l| l.content.as_str()),
            )
            .await?;

        let instance = serde_json::to_value(value)?;
        if self.config.validation_enabled {
            let validator = self.validator_for(global_id).await?;
            validate(&validator, &instance)?;
        }

        let body = serde_json::to_vec(&instance)?;
        debug!(
            "Encoded JSON record for '{}' with global id {} ({} bytes)",
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

/// Decodes JSON records, validating against the schema their global id names
pub struct JsonSchemaDeserializer {
    config: SerdeConfig,
    schemas: SchemaCache<Validator>,
}

impl JsonSchemaDeserializer {
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

    /// Number of distinct schemas fetched so far
    pub async fn cached_schemas(&self) -> usize {
        self.schemas.len().await
    }
}

#[async_trait]
impl<T> ValueDeserializer<T> for JsonSchemaDeserializer
where
    T: DeserializeOwned + Send,
{
    async fn deserialize(
        &self,
        _topic: &str,
        headers: &Headers,
        payload: &[u8],
    ) -> Result<T, SerializationError> {
        let (global_id, body) =
            wire::unframe(self.config.id_handler, self.config.is_key, headers, payload)?;
        let instance: Value = serde_json::from_slice(body)?;

        if self.config.validation_enabled {
            let validator = self.schemas.get_or_load(global_id, compile_schema).await?;
            validate(&validator, &instance)?;
        }

        serde_json::from_value(instance).map_err(|e| {
            SerializationError::DeserializationFailed(format!(
                "record with global id {} does not match the target type: {}",
                global_id, e
            ))
        })
    }
}
