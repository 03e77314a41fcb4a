//! Alternate names for modeled tables and columns.

use std::collections::HashMap;

use crate::error::{ModlitError, ModlitResult};
use crate::registry::{Field, FieldId, MetadataRegistry, ModelId};

/// Refers to a column by name or by field identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Name(String),
    Field(FieldId),
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        ColumnKey::Name(name.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(name: String) -> Self {
        ColumnKey::Name(name)
    }
}

impl From<FieldId> for ColumnKey {
    fn from(id: FieldId) -> Self {
        ColumnKey::Field(id)
    }
}

impl From<&Field> for ColumnKey {
    fn from(field: &Field) -> Self {
        ColumnKey::Name(field.name().to_string())
    }
}

/// A set of alternate names that may be used to refer to a modeled table and
/// its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMap {
    model: ModelId,
    alt_tablename: String,
    alt_columns: HashMap<String, String>,
}

impl ModelMap {
    /// Create a model map. Column keys given as field ids are normalized to
    /// the fields' names; every key must name a field visible on `model`.
    pub fn new<I, K, V>(
        registry: &MetadataRegistry,
        model: ModelId,
        alt_tablename: impl Into<String>,
        alt_columns: I,
    ) -> ModlitResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ColumnKey>,
        V: Into<String>,
    {
        let class = registry
            .model(model)
            .ok_or_else(|| ModlitError::UnknownModel(model.to_string()))?;
        let alt_columns = alt_columns
            .into_iter()
            .map(|(key, alt)| {
                let name = match key.into() {
                    ColumnKey::Name(name) if registry.resolve(model, &name).is_some() => name,
                    ColumnKey::Name(name) => {
                        return Err(ModlitError::UnknownField {
                            model: class.name().to_string(),
                            field: name,
                        })
                    }
                    ColumnKey::Field(id) => registry
                        .field(id)
                        .map(|f| f.name().to_string())
                        .ok_or(ModlitError::UnknownFieldId(id))?,
                };
                Ok((name, alt.into()))
            })
            .collect::<ModlitResult<HashMap<_, _>>>()?;
        Ok(Self {
            model,
            alt_tablename: alt_tablename.into(),
            alt_columns,
        })
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// The mapped table name.
    pub fn alt_tablename(&self) -> &str {
        &self.alt_tablename
    }

    /// The mapped name for a column.
    pub fn get_alt_column(&self, column: &str) -> Option<&str> {
        self.alt_columns.get(column).map(String::as_str)
    }

    pub fn alt_columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.alt_columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
