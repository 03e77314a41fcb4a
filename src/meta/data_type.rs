//! Column data type descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Export;
use crate::error::UnsupportedTypeError;
use crate::registry::ColumnDef;
use crate::types::{ColumnType, DeclarativeType, TypeClassifier};

/// Metadata for column data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeMeta {
    /// The generalized, declarative data type.
    pub declarative: DeclarativeType,
    /// Width of text types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Precision of numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Scale of exact numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default)]
    pub primary_key: bool,
}

impl DataTypeMeta {
    pub fn new(declarative: DeclarativeType) -> Self {
        Self {
            declarative,
            width: None,
            precision: None,
            scale: None,
            primary_key: false,
        }
    }

    /// Derive the descriptor from a concrete column type.
    pub fn from_column_type(
        column_type: &ColumnType,
        primary_key: bool,
        classifier: &TypeClassifier,
    ) -> Result<Self, UnsupportedTypeError> {
        Ok(Self {
            declarative: classifier.classify(column_type)?,
            width: column_type.length(),
            precision: column_type.precision(),
            scale: column_type.scale(),
            primary_key,
        })
    }

    /// Derive the descriptor from a column declaration.
    pub fn for_column(
        def: &ColumnDef,
        classifier: &TypeClassifier,
    ) -> Result<Self, UnsupportedTypeError> {
        Self::from_column_type(&def.column_type, def.primary_key, classifier)
    }
}

impl Export for DataTypeMeta {
    fn export(&self) -> Option<Value> {
        serde_json::to_value(self).ok()
    }
}
