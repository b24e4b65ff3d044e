//! Model resolution, fetching, and cached construction.
//!
//! `ModelLoader` is the single entry point for turning a public identifier
//! into a runnable model: registry lookup (an unknown identifier fails here,
//! before any I/O), local file checks with download of what's missing, then
//! session plus tokenizer construction, all behind the bounded cache.

mod cache;
pub mod fetch;

pub use cache::ModelCache;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ModelError;
use crate::model::LoadedModel;
use crate::registry::{self, ModelDescriptor};

/// Loads models by identifier and keeps them cached.
pub struct ModelLoader {
    model_root: PathBuf,
    client: reqwest::Client,
    cache: ModelCache<LoadedModel>,
}

impl ModelLoader {
    /// Build a loader from configuration (model directory, cache capacity).
    pub fn new(config: &Config) -> Self {
        Self {
            model_root: config.model_dir(),
            client: reqwest::Client::new(),
            cache: ModelCache::new(config.general.cache_capacity),
        }
    }

    /// Local directory for a model's files.
    pub fn model_dir(&self, descriptor: &ModelDescriptor) -> PathBuf {
        self.model_root.join(descriptor.local_dir_name())
    }

    /// Whether all of a model's files are present on disk.
    pub fn is_downloaded(&self, descriptor: &ModelDescriptor) -> bool {
        let dir = self.model_dir(descriptor);
        descriptor
            .files()
            .iter()
            .all(|file| dir.join(file.local_name).exists())
    }

    /// Load a model by its public identifier, downloading files if needed.
    ///
    /// Loading the identifier that is already resident returns the same
    /// shared instance without touching disk or network. Loading a different
    /// identifier evicts per the cache capacity.
    pub async fn load(&self, identifier: &str) -> Result<Arc<LoadedModel>, ModelError> {
        let descriptor =
            registry::find(identifier).ok_or_else(|| ModelError::UnknownModel {
                identifier: identifier.to_string(),
            })?;

        self.cache
            .get_or_load(descriptor.identifier, || async {
                let dir = self.model_dir(descriptor);
                fetch::ensure_model_files(&self.client, descriptor, &dir).await?;
                LoadedModel::load(descriptor.identifier, &dir)
            })
            .await
    }

    /// Number of models currently resident in the cache.
    pub async fn cached_count(&self) -> usize {
        self.cache.len().await
    }

    /// Whether `identifier` is currently resident in the cache.
    pub async fn is_cached(&self, identifier: &str) -> bool {
        self.cache.contains(identifier).await
    }
}
