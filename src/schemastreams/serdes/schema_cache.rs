//! Parsed schemas keyed by global id.
//!
//! Each distinct id is fetched from the registry once and kept for the
//! lifetime of the codec.

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::SerializationError;
use crate::schemastreams::schema::RegistryClient;

pub struct SchemaCache<S> {
    client: RegistryClient,
    entries: RwLock<HashMap<i64, Arc<S>>>,
}

impl<S> SchemaCache<S> {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Schema for `global_id`, fetching and parsing it on first use
    pub async fn get_or_load<F>(&self, global_id: i64, parse: F) -> Result<Arc<S>, SerializationError>
    where
        F: FnOnce(&str) -> Result<S, SerializationError>,
    {
        if let Some(schema) = self.entries.read().await.get(&global_id) {
            return Ok(Arc::clone(schema));
        }

        let content = self.client.get_content_by_global_id(global_id).await?;
        let parsed = Arc::new(parse(&content)?);
        debug!("Loaded schema for global id {}", global_id);

        let mut entries = self.entries.write().await;
        let schema = entries.entry(global_id).or_insert(parsed);
        Ok(Arc::clone(schema))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<S> std::fmt::Debug for SchemaCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("registry", &self.client.base_url())
            .finish_non_exhaustive()
    }
}
