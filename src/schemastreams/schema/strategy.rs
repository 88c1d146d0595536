//! Artifact-id and global-id resolution strategies.
//!
//! Both are closed sets selected through configuration. The `FromStr`
//! implementations accept the short name (`simple-topic`), the strategy
//! class name (`SimpleTopicIdStrategy`) and the fully qualified Java class
//! name used in Apicurio property files.

use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tokio::sync::RwLock;

use super::client::RegistryClient;
use super::types::{ArtifactType, IfExists};
use super::{SchemaError, SchemaResult};

/// How the artifact id is derived for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactIdStrategy {
    /// `<topic>-value` or `<topic>-key`
    #[default]
    Topic,
    /// The topic name itself
    SimpleTopic,
    /// The record's full name (one artifact per record type)
    Record,
    /// `<topic>-<record full name>`
    TopicRecord,
}

impl ArtifactIdStrategy {
    /// Artifact id for a record on `topic`.
    ///
    /// `record_name` is the full name of the record type; it is required by
    /// the record based strategies.
    pub fn artifact_id(
        &self,
        topic: &str,
        is_key: bool,
        record_name: Option<&str>,
    ) -> SchemaResult<String> {
        match self {
            ArtifactIdStrategy::Topic => {
                let suffix = if is_key { "key" } else { "value" };
                Ok(format!("{}-{}", topic, suffix))
            }
            ArtifactIdStrategy::SimpleTopic => Ok(topic.to_string()),
            ArtifactIdStrategy::Record => record_name
                .map(str::to_string)
                .ok_or_else(|| missing_record_name(*self)),
            ArtifactIdStrategy::TopicRecord => record_name
                .map(|name| format!("{}-{}", topic, name))
                .ok_or_else(|| missing_record_name(*self)),
        }
    }

    /// True when the strategy needs the record's full name
    pub fn needs_record_name(&self) -> bool {
        matches!(
            self,
            ArtifactIdStrategy::Record | ArtifactIdStrategy::TopicRecord
        )
    }
}

fn missing_record_name(strategy: ArtifactIdStrategy) -> SchemaError {
    SchemaError::InvalidArtifactId {
        reason: format!("{} strategy requires a named record schema", strategy),
    }
}

impl fmt::Display for ArtifactIdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactIdStrategy::Topic => "topic",
            ArtifactIdStrategy::SimpleTopic => "simple-topic",
            ArtifactIdStrategy::Record => "record",
            ArtifactIdStrategy::TopicRecord => "topic-record",
        };
        f.write_str(name)
    }
}

impl FromStr for ArtifactIdStrategy {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_strategy_name(s, &["idstrategy", "strategy"]).as_str() {
            "topic" => Ok(ArtifactIdStrategy::Topic),
            "simpletopic" => Ok(ArtifactIdStrategy::SimpleTopic),
            "record" => Ok(ArtifactIdStrategy::Record),
            "topicrecord" => Ok(ArtifactIdStrategy::TopicRecord),
            _ => Err(SchemaError::Configuration {
                message: format!("Unknown artifact id strategy '{}'", s),
            }),
        }
    }
}

/// How the global id of the schema version is resolved when producing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobalIdStrategy {
    /// Latest version of the artifact, looked up on every record
    FindLatest,
    /// Version whose content matches the writer schema
    FindBySchema,
    /// Version matching the writer schema, registering it when absent
    GetOrCreate,
    /// Register the writer schema with return-or-update, every record
    AutoRegister,
    /// `GetOrCreate`, remembered per artifact id and schema content
    #[default]
    CachedSchema,
}

impl GlobalIdStrategy {
    /// True when the strategy needs the writer schema content
    pub fn needs_schema(&self) -> bool {
        !matches!(self, GlobalIdStrategy::FindLatest)
    }
}

impl fmt::Display for GlobalIdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GlobalIdStrategy::FindLatest => "find-latest",
            GlobalIdStrategy::FindBySchema => "find-by-schema",
            GlobalIdStrategy::GetOrCreate => "get-or-create",
            GlobalIdStrategy::AutoRegister => "auto-register",
            GlobalIdStrategy::CachedSchema => "cached-schema",
        };
        f.write_str(name)
    }
}

impl FromStr for GlobalIdStrategy {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_strategy_name(s, &["idstrategy", "strategy"]).as_str() {
            "findlatest" => Ok(GlobalIdStrategy::FindLatest),
            "findbyschema" => Ok(GlobalIdStrategy::FindBySchema),
            "getorcreate" => Ok(GlobalIdStrategy::GetOrCreate),
            "autoregister" => Ok(GlobalIdStrategy::AutoRegister),
            "cachedschema" => Ok(GlobalIdStrategy::CachedSchema),
            _ => Err(SchemaError::Configuration {
                message: format!("Unknown global id strategy '{}'", s),
            }),
        }
    }
}

/// Strip package prefix, separators, case and a trailing suffix:
/// `io.apicurio...SimpleTopicIdStrategy` and `simple-topic` both become `simpletopic`.
fn normalize_strategy_name(s: &str, suffixes: &[&str]) -> String {
    let last = s.trim().rsplit('.').next().unwrap_or_default();
    let mut name: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    for suffix in suffixes {
        if name.len() > suffix.len() && name.ends_with(suffix) {
            name.truncate(name.len() - suffix.len());
            break;
        }
    }
    name
}

/// Resolves global ids against the registry with a configured strategy.
///
/// Holds the per-content cache used by [`GlobalIdStrategy::CachedSchema`].
#[derive(Debug)]
pub struct GlobalIdResolver {
    client: RegistryClient,
    strategy: GlobalIdStrategy,
    cache: RwLock<HashMap<(String, String), i64>>,
}

impl GlobalIdResolver {
    pub fn new(client: RegistryClient, strategy: GlobalIdStrategy) -> Self {
        Self {
            client,
            strategy,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn strategy(&self) -> GlobalIdStrategy {
        self.strategy
    }

    pub fn client(&self) -> &RegistryClient {
        &self.client
    }

    /// Global id to embed for a record whose artifact id is `artifact_id`.
    ///
    /// `schema` is the writer schema; every strategy except `FindLatest`
    /// requires it.
    pub async fn resolve(
        &self,
        artifact_id: &str,
        artifact_type: ArtifactType,
        schema: Option<&str>,
    ) -> SchemaResult<i64> {
        let global_id = match self.strategy {
            GlobalIdStrategy::FindLatest => {
                self.client.get_latest_metadata(artifact_id).await?.global_id
            }
            GlobalIdStrategy::FindBySchema => {
                let content = self.require_schema(artifact_id, schema)?;
                self.client
                    .find_metadata_by_content(artifact_id, content, false)
                    .await?
                    .global_id
            }
            GlobalIdStrategy::GetOrCreate => {
                let content = self.require_schema(artifact_id, schema)?;
                self.get_or_create(artifact_id, artifact_type, content)
                    .await?
            }
            GlobalIdStrategy::AutoRegister => {
                let content = self.require_schema(artifact_id, schema)?;
                self.client
                    .create_artifact(
                        Some(artifact_id),
                        artifact_type,
                        content,
                        IfExists::ReturnOrUpdate,
                        false,
                    )
                    .await?
                    .global_id
            }
            GlobalIdStrategy::CachedSchema => {
                let content = self.require_schema(artifact_id, schema)?;
                let key = (artifact_id.to_string(), content.to_string());
                if let Some(id) = self.cache.read().await.get(&key) {
                    return Ok(*id);
                }
                let id = self
                    .get_or_create(artifact_id, artifact_type, content)
                    .await?;
                self.cache.write().await.insert(key, id);
                id
            }
        };

        debug!(
            "Resolved artifact '{}' to global id {} ({})",
            artifact_id, global_id, self.strategy
        );
        Ok(global_id)
    }

    fn require_schema<'a>(&self, artifact_id: &str, schema: Option<&'a str>) -> SchemaResult<&'a str> {
        schema.ok_or_else(|| SchemaError::Configuration {
            message: format!(
                "{} strategy requires the writer schema for artifact '{}'",
                self.strategy, artifact_id
            ),
        })
    }

    async fn get_or_create(
        &self,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: &str,
    ) -> SchemaResult<i64> {
        match self
            .client
            .find_metadata_by_content(artifact_id, content, false)
            .await
        {
            Ok(meta) => Ok(meta.global_id),
            Err(e) if e.is_not_found() => Ok(self
                .client
                .create_artifact(
                    Some(artifact_id),
                    artifact_type,
                    content,
                    IfExists::ReturnOrUpdate,
                    false,
                )
                .await?
                .global_id),
            Err(e) => Err(e),
        }
    }

    /// Number of cached (artifact id, content) entries
    pub async fn cached_entries(&self) -> usize {
        self.cache.read().await.len()
    }
}
