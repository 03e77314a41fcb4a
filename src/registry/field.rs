//! Declared fields of model classes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::types::ColumnType;

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    pub(crate) fn next() -> Self {
        FieldId(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mapped column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub column_type: ColumnType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDef {
    /// A nullable, non-key column.
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            primary_key: false,
            nullable: true,
        }
    }

    /// Mark the column as (part of) the primary key. Key columns are not
    /// nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// What a model member is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Column(ColumnDef),
    /// A relationship to another model, by model name.
    Relationship { target: String },
    /// A plain member that is not mapped to the database.
    Attribute,
}

/// A member declared on a model class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Columns and relationships are field-like; plain attributes are not.
    pub fn is_field_like(&self) -> bool {
        !matches!(self.kind, FieldKind::Attribute)
    }

    pub fn column_def(&self) -> Option<&ColumnDef> {
        match &self.kind {
            FieldKind::Column(def) => Some(def),
            _ => None,
        }
    }

    pub fn is_column(&self) -> bool {
        self.column_def().is_some()
    }
}
