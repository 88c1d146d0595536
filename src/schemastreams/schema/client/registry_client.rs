//! Schema Registry Client Implementation
//!
//! Provides an HTTP client for the Apicurio registry v1 REST API
//! (`/api/artifacts`, `/api/ids`).

use log::{debug, info};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, Url};
use std::time::Duration;

use crate::schemastreams::schema::types::{
    ArtifactMetaData, ArtifactType, IfExists, RegistryErrorBody,
};
use crate::schemastreams::schema::{SchemaError, SchemaResult};

const ARTIFACT_ID_HEADER: &str = "X-Registry-ArtifactId";
const ARTIFACT_TYPE_HEADER: &str = "X-Registry-ArtifactType";
const PROVIDER: &str = "schema_registry";

/// Schema Registry client for registering and looking up artifacts
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: Url,
    http_client: Client,
    config: RegistryClientConfig,
}

/// Configuration for the registry client
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Retry attempts on 5xx and transport errors; 4xx answers are never retried
    pub max_retries: u32,
    /// Base retry delay, doubled on each attempt
    pub retry_delay: Duration,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 0,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RegistryClient {
    /// Create a client for the registry at `base_url` (e.g. `http://localhost:8080/api`)
    pub fn new(base_url: &str) -> SchemaResult<Self> {
        Self::with_config(base_url, RegistryClientConfig::default())
    }

    /// Create client with configuration
    pub fn with_config(base_url: &str, config: RegistryClientConfig) -> SchemaResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| SchemaError::Configuration {
            message: format!("Invalid registry URL '{}': {}", base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SchemaError::Configuration {
                message: format!("Registry URL '{}' cannot be used as a base", base_url),
            });
        }

        info!("Created registry client for {}", base_url);
        Ok(Self {
            base_url,
            http_client: Client::new(),
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Create an artifact, letting `if_exists` decide what happens when the id is taken.
    ///
    /// When `artifact_id` is `None` the registry generates one.
    pub async fn create_artifact(
        &self,
        artifact_id: Option<&str>,
        artifact_type: ArtifactType,
        content: &str,
        if_exists: IfExists,
        canonical: bool,
    ) -> SchemaResult<ArtifactMetaData> {
        let mut url = self.url(&["artifacts"])?;
        url.query_pairs_mut()
            .append_pair("ifExists", if_exists.as_str())
            .append_pair("canonical", &canonical.to_string());

        let mut headers = HeaderMap::new();
        if let Some(id) = artifact_id {
            headers.insert(
                HeaderName::from_static("x-registry-artifactid"),
                header_value(ARTIFACT_ID_HEADER, id)?,
            );
        }
        headers.insert(
            HeaderName::from_static("x-registry-artifacttype"),
            header_value(ARTIFACT_TYPE_HEADER, artifact_type.as_str())?,
        );

        let response = self
            .execute_request(Method::POST, url, headers, Some(content.to_string()))
            .await?;
        let meta: ArtifactMetaData = read_json(response).await?;

        debug!(
            "Artifact '{}' ({}) resolved to version {} / global id {}",
            meta.id, meta.artifact_type, meta.version, meta.global_id
        );
        Ok(meta)
    }

    /// Metadata of the latest version of an artifact
    pub async fn get_latest_metadata(&self, artifact_id: &str) -> SchemaResult<ArtifactMetaData> {
        let url = self.url(&["artifacts", artifact_id, "meta"])?;
        let response = self
            .execute_request(Method::GET, url, HeaderMap::new(), None)
            .await?;
        read_json(response).await
    }

    /// Metadata of the artifact version whose content matches `content`
    pub async fn find_metadata_by_content(
        &self,
        artifact_id: &str,
        content: &str,
        canonical: bool,
    ) -> SchemaResult<ArtifactMetaData> {
        let mut url = self.url(&["artifacts", artifact_id, "meta"])?;
        url.query_pairs_mut()
            .append_pair("canonical", &canonical.to_string());
        let response = self
            .execute_request(Method::POST, url, HeaderMap::new(), Some(content.to_string()))
            .await?;
        read_json(response).await
    }

    /// Raw schema document registered under a global id
    pub async fn get_content_by_global_id(&self, global_id: i64) -> SchemaResult<String> {
        let url = self.url(&["ids", &global_id.to_string()])?;
        let response = self
            .execute_request(Method::GET, url, HeaderMap::new(), None)
            .await?;
        response.text().await.map_err(|e| SchemaError::Provider {
            source: PROVIDER.to_string(),
            message: format!("Failed to read schema content: {}", e),
        })
    }

    /// Metadata of the artifact version registered under a global id
    pub async fn get_metadata_by_global_id(&self, global_id: i64) -> SchemaResult<ArtifactMetaData> {
        let url = self.url(&["ids", &global_id.to_string(), "meta"])?;
        let response = self
            .execute_request(Method::GET, url, HeaderMap::new(), None)
            .await?;
        read_json(response).await
    }

    /// Ids of all artifacts in the registry
    pub async fn list_artifacts(&self) -> SchemaResult<Vec<String>> {
        let url = self.url(&["artifacts"])?;
        let response = self
            .execute_request(Method::GET, url, HeaderMap::new(), None)
            .await?;
        read_json(response).await
    }

    /// Delete an artifact and all of its versions
    pub async fn delete_artifact(&self, artifact_id: &str) -> SchemaResult<()> {
        let url = self.url(&["artifacts", artifact_id])?;
        self.execute_request(Method::DELETE, url, HeaderMap::new(), None)
            .await?;
        info!("Deleted artifact '{}'", artifact_id);
        Ok(())
    }

    fn url(&self, segments: &[&str]) -> SchemaResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SchemaError::Configuration {
                message: format!("Registry URL '{}' cannot be used as a base", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute_request(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<String>,
    ) -> SchemaResult<Response> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            let mut request = self
                .http_client
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, "application/json")
                .headers(headers.clone())
                .timeout(self.config.timeout);

            if let Some(body_content) = &body {
                request = request.body(body_content.clone());
            }

            debug!("{} {} (attempt {})", method, url, attempt + 1);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let error_text = response.text().await.unwrap_or_default();
                    let error = registry_error(status.as_u16(), &url, &error_text);

                    if status.is_client_error() {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    last_error = Some(SchemaError::Provider {
                        source: PROVIDER.to_string(),
                        message: format!("Request to {} failed: {}", url, e),
                    });
                }
            }

            if attempt < self.config.max_retries {
                let delay = self.config.retry_delay * 2_u32.pow(attempt);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| SchemaError::Provider {
            source: PROVIDER.to_string(),
            message: "All retry attempts failed".to_string(),
        }))
    }
}

fn header_value(name: &str, value: &str) -> SchemaResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| SchemaError::InvalidArtifactId {
        reason: format!("'{}' is not a valid {} header: {}", value, name, e),
    })
}

fn registry_error(status: u16, url: &Url, body: &str) -> SchemaError {
    let parsed: Option<RegistryErrorBody> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| body.to_string());

    if status == 404 {
        return SchemaError::NotFound {
            source: format!("{} ({})", url.path(), message),
        };
    }

    SchemaError::Registry {
        status,
        error_code: parsed.and_then(|b| b.error_code),
        message,
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> SchemaResult<T> {
    response.json::<T>().await.map_err(|e| SchemaError::Provider {
        source: PROVIDER.to_string(),
        message: format!("Failed to parse registry response: {}", e),
    })
}
