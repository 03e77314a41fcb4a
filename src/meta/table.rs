//! Table metadata.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::{CaseInsensitiveMap, ColumnMeta, Export, Synonyms};

/// Metadata for a table, including the metadata of its annotated columns.
///
/// Column names are looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMeta {
    tablename: String,
    label: Option<String>,
    synonyms: Synonyms,
    columns: CaseInsensitiveMap<Arc<ColumnMeta>>,
}

impl TableMeta {
    pub fn new(tablename: impl Into<String>) -> Self {
        Self {
            tablename: tablename.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_synonyms(mut self, synonyms: Synonyms) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// The ORM table name.
    pub fn tablename(&self) -> &str {
        &self.tablename
    }

    /// The human-friendly label for the table.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn synonyms(&self) -> &Synonyms {
        &self.synonyms
    }

    pub fn is_synonym(&self, name: &str) -> bool {
        self.synonyms.is_synonym(name)
    }

    /// Add (or replace) the metadata for a column.
    pub fn add_column(&mut self, name: impl Into<String>, meta: impl Into<Arc<ColumnMeta>>) {
        self.columns.insert(name, meta.into());
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.get(name).map(Arc::as_ref)
    }

    /// Column names and metadata in the order they were added.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnMeta)> {
        self.columns.iter().map(|(name, meta)| (name, meta.as_ref()))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

impl Export for TableMeta {
    fn export(&self) -> Option<Value> {
        let mut out = Map::new();
        out.insert("tablename".into(), json!(self.tablename));
        if let Some(label) = &self.label {
            out.insert("label".into(), json!(label));
        }
        if !self.synonyms.is_empty() {
            out.insert(
                "synonyms".into(),
                json!(self.synonyms.iter().collect::<Vec<_>>()),
            );
        }
        let columns: Map<String, Value> = self
            .columns()
            .filter_map(|(name, meta)| meta.export().map(|v| (name.to_string(), v)))
            .collect();
        out.insert("columns".into(), Value::Object(columns));
        Some(Value::Object(out))
    }
}
