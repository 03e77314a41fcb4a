//! Model classes and their declarations.

use std::collections::HashMap;
use std::fmt;

use super::field::{ColumnDef, Field, FieldKind};
use crate::meta::{ColumnMeta, Synonyms};

/// Identity of a model registered in a [`super::MetadataRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub(crate) usize);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model#{}", self.0)
    }
}

/// Table-level information declared for a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRecord {
    pub label: Option<String>,
    pub synonyms: Synonyms,
}

impl TableRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            synonyms: Synonyms::empty(),
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = Synonyms::new(synonyms);
        self
    }
}

/// A registered model class.
#[derive(Debug, Clone)]
pub struct ModelClass {
    pub(crate) id: ModelId,
    pub(crate) name: String,
    pub(crate) tablename: Option<String>,
    pub(crate) bases: Vec<ModelId>,
    pub(crate) mro: Vec<ModelId>,
    pub(crate) members: Vec<Field>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) table: Option<TableRecord>,
}

impl ModelClass {
    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table name declared on this class itself.
    pub fn own_tablename(&self) -> Option<&str> {
        self.tablename.as_deref()
    }

    /// Direct bases in declaration order.
    pub fn bases(&self) -> &[ModelId] {
        &self.bases
    }

    /// Members declared on this class, in declaration order.
    pub fn members(&self) -> &[Field] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.members[i])
    }

    pub fn table_record(&self) -> Option<&TableRecord> {
        self.table.as_ref()
    }
}

/// A member as declared, before the registry assigns it an identity.
#[derive(Debug, Clone)]
pub(crate) struct MemberDecl {
    pub name: String,
    pub kind: FieldKind,
    pub meta: Option<ColumnMeta>,
}

/// Declares a model class for [`super::MetadataRegistry::register`].
///
/// ```
/// use modlit::meta::ColumnMeta;
/// use modlit::registry::{ColumnDef, ModelBuilder};
/// use modlit::types::ColumnType;
///
/// let builder = ModelBuilder::new("Road")
///     .tablename("roads")
///     .table("Roads", ["street"])
///     .column_with_meta(
///         "name",
///         ColumnDef::new(ColumnType::Varchar { length: Some(64) }),
///         ColumnMeta::builder().label("Road Name").build(),
///     );
/// assert_eq!(builder.name(), "Road");
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    pub(crate) name: String,
    pub(crate) tablename: Option<String>,
    pub(crate) bases: Vec<String>,
    pub(crate) members: Vec<MemberDecl>,
    pub(crate) table: Option<TableRecord>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tablename: None,
            bases: Vec::new(),
            members: Vec::new(),
            table: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tablename(mut self, tablename: impl Into<String>) -> Self {
        self.tablename = Some(tablename.into());
        self
    }

    /// Add a base class by name. Bases must already be registered.
    pub fn base(mut self, name: impl Into<String>) -> Self {
        self.bases.push(name.into());
        self
    }

    /// Attach a table label and synonyms to the model.
    pub fn table<I, S>(mut self, label: impl Into<String>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table = Some(TableRecord::new(label).with_synonyms(synonyms));
        self
    }

    pub fn table_record(mut self, record: TableRecord) -> Self {
        self.table = Some(record);
        self
    }

    pub fn column(self, name: impl Into<String>, def: ColumnDef) -> Self {
        self.member(name, FieldKind::Column(def), None)
    }

    pub fn column_with_meta(
        self,
        name: impl Into<String>,
        def: ColumnDef,
        meta: ColumnMeta,
    ) -> Self {
        self.member(name, FieldKind::Column(def), Some(meta))
    }

    pub fn relationship(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        let kind = FieldKind::Relationship {
            target: target.into(),
        };
        self.member(name, kind, None)
    }

    pub fn relationship_with_meta(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        meta: ColumnMeta,
    ) -> Self {
        let kind = FieldKind::Relationship {
            target: target.into(),
        };
        self.member(name, kind, Some(meta))
    }

    /// A plain, unmapped member.
    pub fn attribute(self, name: impl Into<String>) -> Self {
        self.member(name, FieldKind::Attribute, None)
    }

    pub(crate) fn member(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        meta: Option<ColumnMeta>,
    ) -> Self {
        self.members.push(MemberDecl {
            name: name.into(),
            kind,
            meta,
        });
        self
    }
}
