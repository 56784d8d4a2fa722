// src/loader/dataset.rs

//! Loads the items of a platform dataset as documents.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::loader::{DocumentLoader, MappingFn};
use crate::models::{ApifyConfig, Document};
use crate::services::{ActorClient, ApifyClient};

/// Loader bound to one dataset and one mapping function.
///
/// Construction does no I/O; each [`load`](DocumentLoader::load) fetches the
/// full item list again.
#[derive(Clone)]
pub struct DatasetLoader {
    client: Arc<dyn ActorClient>,
    dataset_id: String,
    mapping: MappingFn,
}

impl DatasetLoader {
    pub fn new(
        client: Arc<dyn ActorClient>,
        dataset_id: impl Into<String>,
        mapping: MappingFn,
    ) -> Self {
        Self {
            client,
            dataset_id: dataset_id.into(),
            mapping,
        }
    }

    /// Build a loader with its own blocking client.
    pub fn from_config(
        config: &ApifyConfig,
        dataset_id: impl Into<String>,
        mapping: MappingFn,
    ) -> Result<Self> {
        config.validate()?;
        let client = ApifyClient::new(config)?;
        Ok(Self::new(Arc::new(client), dataset_id, mapping))
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }
}

impl DocumentLoader for DatasetLoader {
    fn load(&self) -> Result<Vec<Document>> {
        let items = self.client.list_items(&self.dataset_id)?;
        log::info!(
            "Mapping {} items from dataset {}",
            items.len(),
            self.dataset_id
        );
        items.iter().map(|item| (self.mapping)(item)).collect()
    }
}

impl fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("dataset_id", &self.dataset_id)
            .finish_non_exhaustive()
    }
}
