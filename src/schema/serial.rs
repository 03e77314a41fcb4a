//! Serialization schemas.
//!
//! A [`SerialSchema`] is keyed by column label, the name used on the wire.
//! Loading validates an input object and produces a [`Record`] keyed by the
//! model's attribute names; dumping reverses the mapping.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::annotated_columns;
use crate::error::{ModlitError, ModlitResult};
use crate::registry::{MetadataRegistry, ModelId};
use crate::types::ColumnType;

/// Errors raised while loading input through a schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Expected an object, found {0}")]
    NotAnObject(String),

    #[error("Unknown field: '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' may not be null")]
    Null { field: String },

    #[error("Field '{field}' expects {expected}, found {found}")]
    InvalidValue {
        field: String,
        expected: SerialFieldType,
        found: String,
    },
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Field types of a serialization schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialFieldType {
    Uuid,
    Integer,
    Boolean,
    Float,
    String,
    Date,
    Time,
    DateTime,
}

impl fmt::Display for SerialFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SerialFieldType::Uuid => "a UUID",
            SerialFieldType::Integer => "an integer",
            SerialFieldType::Boolean => "a boolean",
            SerialFieldType::Float => "a number",
            SerialFieldType::String => "a string",
            SerialFieldType::Date => "a date",
            SerialFieldType::Time => "a time",
            SerialFieldType::DateTime => "a datetime",
        };
        f.write_str(name)
    }
}

impl SerialFieldType {
    pub fn for_column_type(column_type: &ColumnType) -> Option<Self> {
        let t = match column_type {
            ColumnType::Uuid => SerialFieldType::Uuid,
            ColumnType::SmallInteger | ColumnType::Integer | ColumnType::BigInteger => {
                SerialFieldType::Integer
            }
            ColumnType::Boolean => SerialFieldType::Boolean,
            ColumnType::Float { .. }
            | ColumnType::Real
            | ColumnType::Numeric { .. }
            | ColumnType::Decimal { .. } => SerialFieldType::Float,
            ColumnType::Char { .. }
            | ColumnType::NChar { .. }
            | ColumnType::Varchar { .. }
            | ColumnType::NVarchar { .. }
            | ColumnType::String { .. }
            | ColumnType::Text => SerialFieldType::String,
            ColumnType::Date => SerialFieldType::Date,
            ColumnType::Time => SerialFieldType::Time,
            ColumnType::DateTime | ColumnType::Timestamp => SerialFieldType::DateTime,
            ColumnType::Binary
            | ColumnType::Json
            | ColumnType::Geometry { .. }
            | ColumnType::Custom(_) => return None,
        };
        Some(t)
    }

    fn parse(&self, field: &str, value: &Value) -> SchemaResult<FieldValue> {
        let invalid = || SchemaError::InvalidValue {
            field: field.to_string(),
            expected: *self,
            found: value.to_string(),
        };
        let parsed = match self {
            SerialFieldType::Uuid => value
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .map(FieldValue::Uuid),
            SerialFieldType::Integer => value.as_i64().map(FieldValue::Integer),
            SerialFieldType::Boolean => value.as_bool().map(FieldValue::Boolean),
            SerialFieldType::Float => value.as_f64().map(FieldValue::Float),
            SerialFieldType::String => value.as_str().map(|s| FieldValue::String(s.to_string())),
            SerialFieldType::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
                .map(FieldValue::Date),
            SerialFieldType::Time => value.as_str().and_then(parse_time).map(FieldValue::Time),
            SerialFieldType::DateTime => value
                .as_str()
                .and_then(parse_datetime)
                .map(FieldValue::DateTime),
        };
        parsed.ok_or_else(invalid)
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// ISO-8601 datetimes, with or without an offset. Offsets are normalized to
/// UTC.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Uuid(Uuid),
    Integer(i64),
    Boolean(bool),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Uuid(u) => json!(u.hyphenated().to_string()),
            FieldValue::Integer(n) => json!(n),
            FieldValue::Boolean(b) => json!(b),
            FieldValue::Float(x) => json!(x),
            FieldValue::String(s) => json!(s),
            FieldValue::Date(d) => json!(d.format(DATE_FORMAT).to_string()),
            FieldValue::Time(t) => json!(t.format(TIME_FORMAT).to_string()),
            FieldValue::DateTime(dt) => json!(dt.format(DATETIME_FORMAT).to_string()),
        }
    }
}

/// A loaded instance of a model: attribute name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    model: String,
    values: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            values: BTreeMap::new(),
        }
    }

    /// The name of the model class the record instantiates.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn get(&self, attribute: &str) -> Option<&FieldValue> {
        self.values.get(attribute)
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: FieldValue) {
        self.values.insert(attribute.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerialField {
    /// The model attribute the field loads into.
    pub attribute: String,
    /// The wire name: the column's label.
    pub label: String,
    pub description: String,
    pub field_type: SerialFieldType,
    pub nullable: bool,
}

/// A serialization schema for a model.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialSchema {
    name: String,
    model: String,
    fields: Vec<SerialField>,
    by_label: HashMap<String, usize>,
}

impl SerialSchema {
    /// Build the schema for a registered model. It is named `name`, or
    /// `{Model}Schema` when no name is given.
    pub fn for_model(
        registry: &MetadataRegistry,
        model: ModelId,
        name: Option<&str>,
    ) -> ModlitResult<Self> {
        let class = registry
            .model(model)
            .ok_or_else(|| ModlitError::UnknownModel(model.to_string()))?;
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}Schema", class.name()));

        let mut fields = Vec::new();
        let mut by_label = HashMap::new();
        for column in annotated_columns(registry, model) {
            let Some(field_type) = SerialFieldType::for_column_type(&column.def.column_type) else {
                tracing::warn!(
                    model = class.name(),
                    attribute = column.attribute,
                    column_type = %column.def.column_type,
                    "no equivalent serialization type; the attribute is not included in the schema"
                );
                continue;
            };
            // Labels are the wire names; the first declaration of a label wins.
            let label = column.meta.label().to_string();
            if by_label.contains_key(&label) {
                tracing::warn!(model = class.name(), label = %label, "duplicate label in schema");
                continue;
            }
            by_label.insert(label.clone(), fields.len());
            fields.push(SerialField {
                attribute: column.attribute.to_string(),
                label,
                description: column.meta.description().to_string(),
                field_type,
                nullable: column.def.nullable,
            });
        }

        Ok(Self {
            name,
            model: class.name().to_string(),
            fields,
            by_label,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn fields(&self) -> &[SerialField] {
        &self.fields
    }

    pub fn field(&self, label: &str) -> Option<&SerialField> {
        self.by_label.get(label).map(|&i| &self.fields[i])
    }

    /// Validate `input` and load it into a record.
    ///
    /// Keys are labels. Unknown keys and values that do not match the field
    /// type are errors. Absent fields are left out of the record.
    pub fn load(&self, input: &Value) -> SchemaResult<Record> {
        let Value::Object(object) = input else {
            return Err(SchemaError::NotAnObject(input.to_string()));
        };
        let mut record = Record::new(&self.model);
        for (key, value) in object {
            let field = self
                .field(key)
                .ok_or_else(|| SchemaError::UnknownField(key.clone()))?;
            let loaded = if value.is_null() {
                if !field.nullable {
                    return Err(SchemaError::Null { field: key.clone() });
                }
                FieldValue::Null
            } else {
                field.field_type.parse(key, value)?
            };
            record.set(&field.attribute, loaded);
        }
        Ok(record)
    }

    /// Render a record keyed by label. Attributes outside the schema are
    /// dropped.
    pub fn dump(&self, record: &Record) -> Value {
        let mut out = Map::new();
        for field in &self.fields {
            if let Some(value) = record.get(&field.attribute) {
                out.insert(field.label.clone(), value.to_json());
            }
        }
        Value::Object(out)
    }

    /// A description of the schema's fields.
    pub fn to_json(&self) -> Value {
        let fields: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.label.clone(),
                    json!({
                        "attribute": f.attribute,
                        "type": f.field_type,
                        "description": f.description,
                        "nullable": f.nullable,
                    }),
                )
            })
            .collect();
        json!({"name": self.name, "model": self.model, "fields": fields})
    }
}

/// Generated schemas, one per model.
#[derive(Debug, Clone, Default)]
pub struct SchemaCache {
    schemas: HashMap<ModelId, Arc<SerialSchema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached schema for `model`, generating it on first request.
    ///
    /// `name` only applies when the schema is generated.
    pub fn get_or_build(
        &mut self,
        registry: &MetadataRegistry,
        model: ModelId,
        name: Option<&str>,
    ) -> ModlitResult<Arc<SerialSchema>> {
        if let Some(schema) = self.schemas.get(&model) {
            return Ok(Arc::clone(schema));
        }
        let schema = Arc::new(SerialSchema::for_model(registry, model, name)?);
        self.schemas.insert(model, Arc::clone(&schema));
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
