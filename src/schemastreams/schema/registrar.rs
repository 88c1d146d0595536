//! Idempotent artifact registration.

use log::info;

use super::client::RegistryClient;
use super::types::{ArtifactMetaData, ArtifactType, IfExists};
use super::{SchemaError, SchemaResult};

/// Makes sure a schema artifact exists before anything is produced against it
#[derive(Debug, Clone)]
pub struct SchemaRegistrar {
    client: RegistryClient,
}

impl SchemaRegistrar {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RegistryClient {
        &self.client
    }

    /// Register `content` under `artifact_id`.
    ///
    /// Registering identical content twice returns the existing version;
    /// different content under the same id adds a version.
    pub async fn ensure_artifact(
        &self,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: &str,
    ) -> SchemaResult<ArtifactMetaData> {
        self.ensure_artifact_with(
            artifact_id,
            artifact_type,
            content,
            IfExists::ReturnOrUpdate,
            false,
        )
        .await
    }

    /// Register with an explicit if-exists policy and canonicalisation flag
    pub async fn ensure_artifact_with(
        &self,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: &str,
        if_exists: IfExists,
        canonical: bool,
    ) -> SchemaResult<ArtifactMetaData> {
        if artifact_id.trim().is_empty() {
            return Err(SchemaError::InvalidArtifactId {
                reason: "artifact id must not be empty".to_string(),
            });
        }

        let meta = self
            .client
            .create_artifact(
                Some(artifact_id),
                artifact_type,
                content,
                if_exists,
                canonical,
            )
            .await?;

        info!(
            "Artifact '{}' registered: version {}, global id {}",
            meta.id, meta.version, meta.global_id
        );
        Ok(meta)
    }
}
