//! Metadata for entire data models.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use super::{CaseInsensitiveMap, Export, TableMeta};

static URN_ILLEGAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\-.:]").expect("URN character class is valid"));

/// A titled, versioned collection of table metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMeta {
    title: String,
    slug: String,
    namespace: String,
    version: String,
    tables: CaseInsensitiveMap<TableMeta>,
}

impl ModelMeta {
    /// Create model metadata. Tables are keyed by their table names.
    pub fn new<I>(
        title: impl Into<String>,
        slug: impl Into<String>,
        namespace: impl Into<String>,
        version: impl Into<String>,
        tables: I,
    ) -> Self
    where
        I: IntoIterator<Item = TableMeta>,
    {
        Self {
            title: title.into(),
            slug: slug.into(),
            namespace: namespace.into(),
            version: version.into(),
            tables: tables
                .into_iter()
                .map(|t| (t.tablename().to_string(), t))
                .collect(),
        }
    }

    /// The friendly, human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The uniform resource name that identifies the model.
    ///
    /// Characters other than word characters, `-`, `.` and `:` become `_`,
    /// and the result is lower-cased.
    pub fn urn(&self) -> String {
        let raw = format!("urn:{}:{}:{}", self.namespace, self.slug, self.version);
        URN_ILLEGAL.replace_all(&raw, "_").to_lowercase()
    }

    pub fn table(&self, tablename: &str) -> Option<&TableMeta> {
        self.tables.get(tablename)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableMeta> {
        self.tables.values()
    }
}

impl Export for ModelMeta {
    fn export(&self) -> Option<Value> {
        let tables: Map<String, Value> = self
            .tables
            .iter()
            .filter_map(|(name, t)| t.export().map(|v| (name.to_string(), v)))
            .collect();
        Some(json!({
            "title": self.title,
            "version": self.version,
            "urn": self.urn(),
            "tables": tables,
        }))
    }
}
