//! REST-style API models.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::annotated_columns;
use crate::error::{ModlitError, ModlitResult};
use crate::registry::{MetadataRegistry, ModelId};
use crate::types::ColumnType;

/// Field types of an API model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiFieldType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    DateTime,
}

impl ApiFieldType {
    /// The API field type for a column type, if there is one.
    pub fn for_column_type(column_type: &ColumnType) -> Option<Self> {
        use ColumnType::*;
        let t = match column_type {
            Boolean => ApiFieldType::Boolean,
            SmallInteger | Integer | BigInteger => ApiFieldType::Integer,
            Float { .. } | Real | Numeric { .. } | Decimal { .. } => ApiFieldType::Float,
            Char { .. }
            | NChar { .. }
            | Varchar { .. }
            | NVarchar { .. }
            | String { .. }
            | Text => ApiFieldType::String,
            Date => ApiFieldType::Date,
            Time | DateTime | Timestamp => ApiFieldType::DateTime,
            Uuid | Binary | Json | Geometry { .. } | Custom(_) => return None,
        };
        Some(t)
    }

    fn schema(&self) -> Value {
        match self {
            ApiFieldType::Integer => json!({"type": "integer"}),
            ApiFieldType::Float => json!({"type": "number"}),
            ApiFieldType::String => json!({"type": "string"}),
            ApiFieldType::Boolean => json!({"type": "boolean"}),
            ApiFieldType::Date => json!({"type": "string", "format": "date"}),
            ApiFieldType::DateTime => json!({"type": "string", "format": "date-time"}),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiField {
    pub name: String,
    pub field_type: ApiFieldType,
    pub description: Option<String>,
}

/// An API model: a named set of typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiModel {
    name: String,
    fields: Vec<ApiField>,
}

impl ApiModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[ApiField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&ApiField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// A JSON-schema-style rendering of the model.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut schema = field.field_type.schema();
            if let (Some(description), Value::Object(obj)) = (&field.description, &mut schema) {
                obj.insert("description".into(), json!(description));
            }
            properties.insert(field.name.clone(), schema);
        }
        json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
        })
    }
}

/// A namespace of API models, keyed by model name.
#[derive(Debug, Clone, Default)]
pub struct ApiNamespace {
    name: String,
    models: BTreeMap<String, ApiModel>,
}

impl ApiNamespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&ApiModel> {
        self.models.get(name)
    }

    pub fn models(&self) -> impl Iterator<Item = &ApiModel> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Generate (or fetch) the API model for a registered model.
///
/// The model is named `name`, or after the model class when no name is
/// given. A model already present in the namespace under that name is
/// returned as is. Columns whose type has no API equivalent are left out.
pub fn api_model<'ns>(
    namespace: &'ns mut ApiNamespace,
    registry: &MetadataRegistry,
    model: ModelId,
    name: Option<&str>,
) -> ModlitResult<&'ns ApiModel> {
    let class = registry
        .model(model)
        .ok_or_else(|| ModlitError::UnknownModel(model.to_string()))?;
    let name = name.unwrap_or(class.name()).to_string();
    let api = namespace
        .models
        .entry(name)
        .or_insert_with_key(|name| build(registry, model, class.name(), name));
    Ok(api)
}

fn build(registry: &MetadataRegistry, model: ModelId, class_name: &str, name: &str) -> ApiModel {
    let mut fields = Vec::new();
    for column in annotated_columns(registry, model) {
        match ApiFieldType::for_column_type(&column.def.column_type) {
            Some(field_type) => fields.push(ApiField {
                name: column.attribute.to_string(),
                field_type,
                description: (!column.meta.description().is_empty())
                    .then(|| column.meta.description().to_string()),
            }),
            None => tracing::warn!(
                model = class_name,
                attribute = column.attribute,
                column_type = %column.def.column_type,
                "no equivalent API type; the attribute is not included in the API model"
            ),
        }
    }
    ApiModel {
        name: name.to_string(),
        fields,
    }
}
