//! Schemas generated from registered models.
//!
//! - [`api`]: REST-style API models, cached by name in an [`api::ApiNamespace`].
//! - [`serial`]: serialization schemas that validate and load input records.
//!
//! Both consider only the visible columns of a model that carry metadata.

pub mod api;
pub mod serial;

pub use api::{api_model, ApiField, ApiFieldType, ApiModel, ApiNamespace};
pub use serial::{
    FieldValue, Record, SchemaCache, SchemaError, SerialField, SerialFieldType, SerialSchema,
};

use std::sync::Arc;

use crate::meta::ColumnMeta;
use crate::registry::{ColumnDef, MetadataRegistry, ModelId};

/// A visible, annotated column of a model.
pub(crate) struct AnnotatedColumn<'a> {
    pub attribute: &'a str,
    pub def: &'a ColumnDef,
    pub meta: Arc<ColumnMeta>,
}

pub(crate) fn annotated_columns(
    registry: &MetadataRegistry,
    model: ModelId,
) -> Vec<AnnotatedColumn<'_>> {
    registry
        .visible_fields(model)
        .into_iter()
        .filter_map(|(attribute, field)| {
            let def = field.column_def()?;
            let meta = registry.get_metadata(field.id())?;
            Some(AnnotatedColumn { attribute, def, meta })
        })
        .collect()
}
