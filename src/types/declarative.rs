//! Generalized declarative data types and the classifier that buckets
//! concrete column types into them.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{ColumnType, TypeKind};
use crate::error::{ModlitError, ModlitResult, UnsupportedTypeError};

/// A generalized declarative set of supported data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeclarativeType {
    /// Universally-unique identifiers.
    Uuid,
    /// Text data (strings, characters, etc.).
    Text,
    Integer,
    /// Floating-point and exact numeric values.
    Float,
    Date,
    Time,
    /// Date and time.
    DateTime,
}

impl DeclarativeType {
    pub const ALL: [DeclarativeType; 7] = [
        DeclarativeType::Uuid,
        DeclarativeType::Text,
        DeclarativeType::Integer,
        DeclarativeType::Float,
        DeclarativeType::Date,
        DeclarativeType::Time,
        DeclarativeType::DateTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarativeType::Uuid => "UUID",
            DeclarativeType::Text => "TEXT",
            DeclarativeType::Integer => "INTEGER",
            DeclarativeType::Float => "FLOAT",
            DeclarativeType::Date => "DATE",
            DeclarativeType::Time => "TIME",
            DeclarativeType::DateTime => "DATETIME",
        }
    }

    /// Classify a column type with the standard table.
    pub fn from_column_type(column_type: &ColumnType) -> Result<Self, UnsupportedTypeError> {
        TypeClassifier::standard().classify(column_type)
    }
}

impl fmt::Display for DeclarativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The standard category buckets. A kind may appear in at most one bucket.
const STANDARD_BUCKETS: &[(DeclarativeType, &[TypeKind])] = &[
    (DeclarativeType::Uuid, &[TypeKind::Uuid]),
    (
        DeclarativeType::Text,
        &[
            TypeKind::Text,
            TypeKind::String,
            TypeKind::Char,
            TypeKind::NChar,
            TypeKind::NVarchar,
            TypeKind::Varchar,
        ],
    ),
    (
        DeclarativeType::Integer,
        &[
            TypeKind::SmallInteger,
            TypeKind::Integer,
            TypeKind::BigInteger,
        ],
    ),
    (
        DeclarativeType::Float,
        &[
            TypeKind::Float,
            TypeKind::Real,
            TypeKind::Numeric,
            TypeKind::Decimal,
        ],
    ),
    (DeclarativeType::Date, &[TypeKind::Date]),
    (DeclarativeType::Time, &[TypeKind::Time]),
    (DeclarativeType::DateTime, &[TypeKind::DateTime]),
];

static STANDARD: Lazy<TypeClassifier> = Lazy::new(|| {
    TypeClassifier::from_buckets(
        STANDARD_BUCKETS
            .iter()
            .map(|(d, kinds)| (*d, kinds.iter().copied())),
    )
    .expect("standard type buckets are disjoint")
});

/// Reverse index from concrete type kinds to declarative categories.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeClassifier {
    index: HashMap<TypeKind, DeclarativeType>,
}

impl TypeClassifier {
    /// The process-wide standard classifier.
    pub fn standard() -> &'static TypeClassifier {
        &STANDARD
    }

    /// Build a classifier from `(category, kinds)` buckets.
    ///
    /// Fails if any kind is listed under more than one category, including
    /// the same category twice.
    pub fn from_buckets<B, K>(buckets: B) -> ModlitResult<Self>
    where
        B: IntoIterator<Item = (DeclarativeType, K)>,
        K: IntoIterator<Item = TypeKind>,
    {
        let mut classifier = TypeClassifier::default();
        for (declarative, kinds) in buckets {
            for kind in kinds {
                classifier.insert(kind, declarative)?;
            }
        }
        Ok(classifier)
    }

    /// Return a copy extended with one more mapping.
    pub fn with_mapping(&self, kind: TypeKind, declarative: DeclarativeType) -> ModlitResult<Self> {
        let mut classifier = self.clone();
        classifier.insert(kind, declarative)?;
        Ok(classifier)
    }

    fn insert(&mut self, kind: TypeKind, declarative: DeclarativeType) -> ModlitResult<()> {
        if let Some(first) = self.index.get(&kind) {
            return Err(ModlitError::DuplicateTypeMapping {
                kind,
                first: *first,
                second: declarative,
            });
        }
        self.index.insert(kind, declarative);
        Ok(())
    }

    /// Get the declarative category for a column type.
    pub fn classify(
        &self,
        column_type: &ColumnType,
    ) -> Result<DeclarativeType, UnsupportedTypeError> {
        self.index
            .get(&column_type.kind())
            .copied()
            .ok_or_else(|| UnsupportedTypeError::new(column_type.clone()))
    }

    /// Get the declarative category for a bare kind.
    pub fn classify_kind(&self, kind: TypeKind) -> Option<DeclarativeType> {
        self.index.get(&kind).copied()
    }

    /// Kinds mapped to `declarative`, sorted.
    pub fn kinds_of(&self, declarative: DeclarativeType) -> Vec<TypeKind> {
        let mut kinds: Vec<TypeKind> = self
            .index
            .iter()
            .filter(|(_, d)| **d == declarative)
            .map(|(k, _)| *k)
            .collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
