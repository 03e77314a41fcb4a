//! Serde representation of catalog files.

use serde::Deserialize;

use crate::meta::{
    ColumnMeta, DataTypeMeta, Source, Synonyms, Target, ValueDomain,
};
use crate::registry::{ColumnDef, ModelBuilder, TableRecord};
use crate::types::ColumnType;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub catalog: Option<CatalogInfo>,
    #[serde(default, rename = "model")]
    pub models: Vec<ModelDecl>,
}

/// The `[catalog]` header: identifies the data model as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogInfo {
    pub title: String,
    pub slug: String,
    pub namespace: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDecl {
    pub name: String,
    #[serde(default)]
    pub tablename: Option<String>,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub table: Option<TableDecl>,
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnDecl>,
    #[serde(default, rename = "relationship")]
    pub relationships: Vec<RelationshipDecl>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDecl {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub synonyms: Synonyms,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub meta: Option<MetaDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipDecl {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub meta: Option<MetaDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetaDecl {
    pub label: String,
    pub description: String,
    pub nena: Option<String>,
    pub source: Source,
    pub target: Target,
    pub synonyms: Vec<String>,
    pub data_type: Option<DataTypeMeta>,
    pub domain: Option<ValueDomain>,
}

impl MetaDecl {
    pub fn into_meta(self) -> ColumnMeta {
        let mut builder = ColumnMeta::builder()
            .label(self.label)
            .description(self.description)
            .source(self.source)
            .target(self.target)
            .synonyms(self.synonyms);
        if let Some(nena) = self.nena {
            builder = builder.nena(nena);
        }
        if let Some(data_type) = self.data_type {
            builder = builder.data_type(data_type);
        }
        if let Some(domain) = self.domain {
            builder = builder.domain(domain);
        }
        builder.build()
    }
}

impl ModelDecl {
    /// Columns first, then relationships, then plain attributes.
    pub fn into_builder(self) -> ModelBuilder {
        let mut builder = ModelBuilder::new(self.name);
        if let Some(tablename) = self.tablename {
            builder = builder.tablename(tablename);
        }
        for base in self.bases {
            builder = builder.base(base);
        }
        if let Some(table) = self.table {
            builder = builder.table_record(TableRecord {
                label: table.label,
                synonyms: table.synonyms,
            });
        }
        for column in self.columns {
            let mut def = ColumnDef::new(column.column_type);
            if column.primary_key {
                def = def.primary_key();
            }
            if let Some(nullable) = column.nullable {
                def.nullable = nullable;
            }
            builder = match column.meta {
                Some(meta) => builder.column_with_meta(column.name, def, meta.into_meta()),
                None => builder.column(column.name, def),
            };
        }
        for rel in self.relationships {
            builder = match rel.meta {
                Some(meta) => {
                    builder.relationship_with_meta(rel.name, rel.target, meta.into_meta())
                }
                None => builder.relationship(rel.name, rel.target),
            };
        }
        for attribute in self.attributes {
            builder = builder.attribute(attribute);
        }
        builder
    }
}
