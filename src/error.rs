//! Crate-level error types.
//!
//! [`UnsupportedTypeError`] is the only failure of type classification.
//! [`ModlitError`] is the base error for registry and constraint problems.

use crate::registry::FieldId;
use crate::types::{ColumnType, DeclarativeType, TypeKind};

/// Result type for registry and metadata operations.
pub type ModlitResult<T> = Result<T, ModlitError>;

/// Raised when a column type has no generalized declarative category.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("An unsupported type was encountered: {column_type}")]
pub struct UnsupportedTypeError {
    /// The offending type.
    pub column_type: ColumnType,
}

impl UnsupportedTypeError {
    pub fn new(column_type: ColumnType) -> Self {
        Self { column_type }
    }
}

/// Base error for the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModlitError {
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    #[error("Type {kind:?} is mapped to both {first} and {second}")]
    DuplicateTypeMapping {
        kind: TypeKind,
        first: DeclarativeType,
        second: DeclarativeType,
    },

    #[error("Unknown model: '{0}'")]
    UnknownModel(String),

    #[error("Unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("Unknown field: {0}")]
    UnknownFieldId(FieldId),

    #[error("Model '{0}' is already registered")]
    DuplicateModel(String),

    #[error("Cannot linearize the bases of '{0}'")]
    InconsistentHierarchy(String),

    #[error("Constraint violated: {0}")]
    Constraint(String),
}
