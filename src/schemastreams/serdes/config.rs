//! Codec configuration.
//!
//! `SerdeConfig` is built either fluently or from a property map using the
//! Apicurio property names, so existing client property files keep working.

use std::collections::HashMap;

use super::error::SerializationError;
use super::wire::IdHandler;
use crate::schemastreams::schema::{
    ArtifactIdStrategy, GlobalIdStrategy, RegistryClient, RegistryClientConfig, SchemaError,
};

pub const REGISTRY_URL: &str = "apicurio.registry.url";
pub const ARTIFACT_ID_STRATEGY: &str = "apicurio.registry.artifact-id";
pub const GLOBAL_ID_STRATEGY: &str = "apicurio.registry.global-id";
pub const VALIDATION_ENABLED: &str = "apicurio.registry.serdes.validation-enabled";
pub const ID_HANDLER: &str = "apicurio.registry.id-handler";
pub const USE_HEADERS: &str = "apicurio.registry.use.headers";

pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8080/api";

/// Settings shared by the registry-aware serializers and deserializers
#[derive(Debug, Clone)]
pub struct SerdeConfig {
    pub registry_url: String,
    pub registry_client: RegistryClientConfig,
    pub artifact_id_strategy: ArtifactIdStrategy,
    pub global_id_strategy: GlobalIdStrategy,
    /// Check payloads against the resolved schema
    pub validation_enabled: bool,
    pub id_handler: IdHandler,
    /// Carry the global id in a record header instead of the envelope
    pub use_headers: bool,
    /// Codec is used for record keys rather than values
    pub is_key: bool,
}

impl Default for SerdeConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            registry_client: RegistryClientConfig::default(),
            artifact_id_strategy: ArtifactIdStrategy::default(),
            global_id_strategy: GlobalIdStrategy::default(),
            validation_enabled: false,
            id_handler: IdHandler::default(),
            use_headers: false,
            is_key: false,
        }
    }
}

impl SerdeConfig {
    pub fn new(registry_url: impl Into<String>) -> Self {
        Self {
            registry_url: registry_url.into(),
            ..Default::default()
        }
    }

    pub fn artifact_id_strategy(mut self, strategy: ArtifactIdStrategy) -> Self {
        self.artifact_id_strategy = strategy;
        self
    }

    pub fn global_id_strategy(mut self, strategy: GlobalIdStrategy) -> Self {
        self.global_id_strategy = strategy;
        self
    }

    pub fn validation(mut self, enabled: bool) -> Self {
        self.validation_enabled = enabled;
        self
    }

    pub fn id_handler(mut self, id_handler: IdHandler) -> Self {
        self.id_handler = id_handler;
        self
    }

    pub fn use_headers(mut self, enabled: bool) -> Self {
        self.use_headers = enabled;
        self
    }

    pub fn for_key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn registry_client_config(mut self, config: RegistryClientConfig) -> Self {
        self.registry_client = config;
        self
    }

    /// Build a config from Apicurio-style properties; unknown keys are ignored
    pub fn from_properties(
        properties: &HashMap<String, String>,
    ) -> Result<Self, SerializationError> {
        let mut config = Self::default();

        if let Some(url) = properties.get(REGISTRY_URL) {
            config.registry_url = url.clone();
        }
        if let Some(strategy) = properties.get(ARTIFACT_ID_STRATEGY) {
            config.artifact_id_strategy = strategy.parse()?;
        }
        if let Some(strategy) = properties.get(GLOBAL_ID_STRATEGY) {
            config.global_id_strategy = strategy.parse()?;
        }
        if let Some(flag) = properties.get(VALIDATION_ENABLED) {
            config.validation_enabled = parse_flag(VALIDATION_ENABLED, flag)?;
        }
        if let Some(handler) = properties.get(ID_HANDLER) {
            config.id_handler = handler.parse()?;
        }
        if let Some(flag) = properties.get(USE_HEADERS) {
            config.use_headers = parse_flag(USE_HEADERS, flag)?;
        }

        Ok(config)
    }

    /// Registry client for `registry_url`
    pub fn registry_client(&self) -> Result<RegistryClient, SchemaError> {
        RegistryClient::with_config(&self.registry_url, self.registry_client.clone())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, SerializationError> {
    value.trim().parse::<bool>().map_err(|_| {
        SerializationError::SchemaError(format!(
            "Property '{}' must be true or false, got '{}'",
            key, value
        ))
    })
}
