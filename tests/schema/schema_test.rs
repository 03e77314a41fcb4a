//! Integration tests for API models and serialization schemas.

use std::sync::Arc;

use chrono::NaiveDate;
use modlit::prelude::*;
use modlit::schema::{
    api_model, ApiFieldType, ApiNamespace, FieldValue, SchemaCache, SchemaError, SerialFieldType,
    SerialSchema,
};
use serde_json::json;

fn meta(label: &str, description: &str) -> ColumnMeta {
    ColumnMeta::builder()
        .label(label)
        .description(description)
        .build()
}

fn inspections() -> (MetadataRegistry, ModelId) {
    let mut registry = MetadataRegistry::new();
    let model = registry
        .register(
            ModelBuilder::new("Inspection")
                .tablename("inspections")
                .column_with_meta(
                    "id",
                    ColumnDef::new(ColumnType::Uuid).primary_key(),
                    meta("ID", "Inspection identifier"),
                )
                .column_with_meta(
                    "inspector",
                    ColumnDef::new(ColumnType::Varchar { length: Some(40) }).not_null(),
                    meta("Inspector", "Who inspected"),
                )
                .column_with_meta(
                    "score",
                    ColumnDef::new(ColumnType::Integer),
                    meta("Score", ""),
                )
                .column_with_meta(
                    "inspected_on",
                    ColumnDef::new(ColumnType::Date),
                    meta("Inspected On", "Date of inspection"),
                )
                .column_with_meta(
                    "location",
                    ColumnDef::new(ColumnType::Geometry {
                        geometry_type: Some("POINT".into()),
                        srid: Some(4326),
                    }),
                    ColumnMeta::builder()
                        .label("Location")
                        .data_type(DataTypeMeta::new(DeclarativeType::Text))
                        .build(),
                )
                .column("internal_flag", ColumnDef::new(ColumnType::Integer)),
        )
        .unwrap();
    (registry, model)
}

#[test]
fn test_api_model_fields() {
    let (registry, model) = inspections();
    let mut namespace = ApiNamespace::new("public");

    let api = api_model(&mut namespace, &registry, model, None).unwrap();
    assert_eq!(api.name(), "Inspection");

    let names: Vec<&str> = api.fields().iter().map(|f| f.name.as_str()).collect();
    // UUID and geometry columns have no API type; unannotated columns are left out.
    assert_eq!(names, vec!["inspector", "score", "inspected_on"]);

    let inspector = api.field("inspector").unwrap();
    assert_eq!(inspector.field_type, ApiFieldType::String);
    assert_eq!(inspector.description.as_deref(), Some("Who inspected"));
    assert_eq!(api.field("score").unwrap().description, None);
    assert_eq!(
        api.field("inspected_on").unwrap().field_type,
        ApiFieldType::Date
    );
}

#[test]
fn test_api_model_json() {
    let (registry, model) = inspections();
    let mut namespace = ApiNamespace::new("public");
    let api = api_model(&mut namespace, &registry, model, Some("InspectionModel")).unwrap();

    insta::assert_json_snapshot!(api.to_json(), @r###"
    {
      "properties": {
        "inspected_on": {
          "description": "Date of inspection",
          "format": "date",
          "type": "string"
        },
        "inspector": {
          "description": "Who inspected",
          "type": "string"
        },
        "score": {
          "type": "integer"
        }
      },
      "title": "InspectionModel",
      "type": "object"
    }
    "###);
}

#[test]
fn test_api_model_is_cached_by_name() {
    let (registry, model) = inspections();
    let mut namespace = ApiNamespace::new("public");

    api_model(&mut namespace, &registry, model, None).unwrap();
    api_model(&mut namespace, &registry, model, None).unwrap();
    assert_eq!(namespace.len(), 1);

    api_model(&mut namespace, &registry, model, Some("Brief")).unwrap();
    assert_eq!(namespace.len(), 2);
    assert!(namespace.get("Brief").is_some());
    assert!(namespace.get("Inspection").is_some());
}

#[test]
fn test_serial_schema_fields() {
    let (registry, model) = inspections();
    let schema = SerialSchema::for_model(&registry, model, None).unwrap();

    assert_eq!(schema.name(), "InspectionSchema");
    assert_eq!(schema.model(), "Inspection");

    let labels: Vec<&str> = schema.fields().iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["ID", "Inspector", "Score", "Inspected On"]);

    let id = schema.field("ID").unwrap();
    assert_eq!(id.attribute, "id");
    assert_eq!(id.field_type, SerialFieldType::Uuid);
    assert!(!id.nullable);
    assert!(schema.field("Score").unwrap().nullable);
}

#[test]
fn test_serial_load_keys_by_attribute() {
    let (registry, model) = inspections();
    let schema = SerialSchema::for_model(&registry, model, None).unwrap();

    let record = schema
        .load(&json!({
            "ID": "7f1c8b3e-2a4d-4c6e-9f0a-1b2c3d4e5f60",
            "Inspector": "Riley",
            "Score": 92,
            "Inspected On": "2024-03-15",
        }))
        .unwrap();

    assert_eq!(record.model(), "Inspection");
    assert_eq!(record.len(), 4);
    assert_eq!(
        record.get("inspector"),
        Some(&FieldValue::String("Riley".into()))
    );
    assert_eq!(record.get("score"), Some(&FieldValue::Integer(92)));
    assert_eq!(
        record.get("inspected_on"),
        Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()))
    );
    assert!(matches!(record.get("id"), Some(FieldValue::Uuid(_))));
}

#[test]
fn test_serial_dump_keys_by_label() {
    let (registry, model) = inspections();
    let schema = SerialSchema::for_model(&registry, model, None).unwrap();
    let input = json!({
        "ID": "7f1c8b3e-2a4d-4c6e-9f0a-1b2c3d4e5f60",
        "Score": null,
        "Inspected On": "2024-03-15",
    });

    let record = schema.load(&input).unwrap();
    assert_eq!(record.get("score"), Some(&FieldValue::Null));
    assert_eq!(schema.dump(&record), input);
}

#[test]
fn test_serial_load_rejects_bad_input() {
    let (registry, model) = inspections();
    let schema = SerialSchema::for_model(&registry, model, None).unwrap();

    assert!(matches!(
        schema.load(&json!(["not", "an", "object"])),
        Err(SchemaError::NotAnObject(_))
    ));
    assert_eq!(
        schema.load(&json!({"Colour": "red"})),
        Err(SchemaError::UnknownField("Colour".into()))
    );
    assert_eq!(
        schema.load(&json!({"Inspector": null})),
        Err(SchemaError::Null {
            field: "Inspector".into()
        })
    );

    let err = schema.load(&json!({"Score": "high"})).unwrap_err();
    assert_eq!(err.to_string(), "Field 'Score' expects an integer, found \"high\"");

    assert!(matches!(
        schema.load(&json!({"ID": "not-a-uuid"})),
        Err(SchemaError::InvalidValue {
            expected: SerialFieldType::Uuid,
            ..
        })
    ));
    assert!(matches!(
        schema.load(&json!({"Inspected On": "15/03/2024"})),
        Err(SchemaError::InvalidValue {
            expected: SerialFieldType::Date,
            ..
        })
    ));
}

#[test]
fn test_schema_cache_reuses_schema() {
    let (registry, model) = inspections();
    let mut cache = SchemaCache::new();
    assert!(cache.is_empty());

    let first = cache.get_or_build(&registry, model, Some("Custom")).unwrap();
    let second = cache.get_or_build(&registry, model, None).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.name(), "Custom");
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_schema_cache_shared_across_models() {
    let (mut registry, inspection) = inspections();
    let visit = registry
        .register(ModelBuilder::new("Visit").column_with_meta(
            "visited_on",
            ColumnDef::new(ColumnType::Date),
            meta("Visited On", ""),
        ))
        .unwrap();
    let mut cache = SchemaCache::new();

    let requested = [inspection, visit, inspection, visit];
    let schemas: Vec<_> = requested
        .iter()
        .map(|&id| cache.get_or_build(&registry, id, None).unwrap())
        .collect();

    assert_eq!(cache.len(), 2);
    assert!(Arc::ptr_eq(&schemas[0], &schemas[2]));
    assert!(Arc::ptr_eq(&schemas[1], &schemas[3]));
    assert_eq!(schemas[1].name(), "VisitSchema");
}
