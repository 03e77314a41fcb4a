//! Load model declarations from TOML catalog files.
//!
//! # Example
//!
//! ```toml
//! [catalog]
//! title = "Road Network"
//! slug = "roads"
//! namespace = "acme"
//! version = "1.0"
//!
//! [[model]]
//! name = "Feature"
//!
//! [[model.column]]
//! name = "id"
//! type = "UUID"
//! primary_key = true
//! meta = { label = "ID", source = { requirement = "required" } }
//!
//! [[model]]
//! name = "Road"
//! tablename = "roads"
//! bases = ["Feature"]
//! table = { label = "Roads", synonyms = ["street"] }
//!
//! [[model.column]]
//! name = "name"
//! type = "VARCHAR(64)"
//! meta = { label = "Road Name", target = { guaranteed = true, usage = ["SEARCH", "DISPLAY"] } }
//! ```
//!
//! Models are registered in declaration order, so bases come first.

mod catalog;

pub use catalog::{Catalog, CatalogInfo};

use std::path::Path;

use thiserror::Error;

use crate::error::ModlitError;
use crate::meta::ModelMeta;
use crate::registry::{MetadataRegistry, ModelId};

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// Registration of a model failed.
    #[error("Invalid model '{model}': {source}")]
    Model {
        model: String,
        #[source]
        source: ModlitError,
    },
}

/// Result type for catalog loading operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// A catalog registered into a registry.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub registry: MetadataRegistry,
    pub info: Option<CatalogInfo>,
    /// Registered models in declaration order.
    pub models: Vec<ModelId>,
}

impl LoadedCatalog {
    pub fn model_id(&self, name: &str) -> Option<ModelId> {
        self.registry.model_by_name(name).map(|m| m.id())
    }

    /// Model metadata for every model in the catalog, when the catalog has a
    /// `[catalog]` header.
    pub fn model_meta(&self) -> Option<ModelMeta> {
        let info = self.info.as_ref()?;
        Some(self.registry.model_meta(
            info.title.clone(),
            info.slug.clone(),
            info.namespace.clone(),
            info.version.clone(),
            &self.models,
        ))
    }
}

/// Parse a catalog and register its models into a new registry.
pub fn load_str(content: &str) -> LoaderResult<LoadedCatalog> {
    load_into(MetadataRegistry::new(), content)
}

/// Parse a catalog and register its models into `registry`.
pub fn load_into(mut registry: MetadataRegistry, content: &str) -> LoaderResult<LoadedCatalog> {
    let catalog: Catalog = toml::from_str(content)?;
    let mut models = Vec::with_capacity(catalog.models.len());
    for decl in catalog.models {
        let name = decl.name.clone();
        let id = registry
            .register(decl.into_builder())
            .map_err(|source| LoaderError::Model {
                model: name.clone(),
                source,
            })?;
        tracing::debug!(model = %name, "loaded model");
        models.push(id);
    }
    Ok(LoadedCatalog {
        registry,
        info: catalog.catalog,
        models,
    })
}

/// Load a catalog file.
pub fn load_file(path: impl AsRef<Path>) -> LoaderResult<LoadedCatalog> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    load_str(&content)
}
