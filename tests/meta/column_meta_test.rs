//! Integration tests for column and table metadata.

use modlit::meta::{Export, Synonyms, TableMeta};
use modlit::prelude::*;
use serde_json::json;

fn parcel_id() -> ColumnMeta {
    ColumnMeta::builder()
        .label("Parcel ID")
        .description("County parcel identifier")
        .nena("ParcelID")
        .source(Source::required().with_synonyms(Synonyms::new(["pid", "parcel_no"])))
        .target(Target::new(true, false, Usage::SEARCH | Usage::DISPLAY))
        .synonyms(["parcel[_ ]?id"])
        .build()
}

#[test]
fn test_builder_sets_every_field() {
    let meta = parcel_id();

    assert_eq!(meta.label(), "Parcel ID");
    assert_eq!(meta.description(), "County parcel identifier");
    assert_eq!(meta.nena(), Some("ParcelID"));
    assert_eq!(meta.requirement(), Requirement::Required);
    assert!(meta.source().is_synonym("PID"));
    assert!(meta.target().guaranteed());
    assert!(!meta.target().calculated());
    assert!(meta.usage().contains(Usage::SEARCH));
    assert!(meta.usage().contains(Usage::DISPLAY));
}

#[test]
fn test_column_synonym_patterns() {
    let meta = parcel_id();

    assert!(meta.is_synonym("ParcelId"));
    assert!(meta.is_synonym("PARCEL_ID"));
    assert!(meta.is_synonym("parcel id"));
    assert!(!meta.is_synonym("owner_parcel_id"));
    assert!(!meta.is_synonym("address"));
}

#[test]
fn test_equality_ignores_synonym_order() {
    let a = ColumnMeta::builder()
        .label("Name")
        .synonyms(["a", "b"])
        .build();
    let b = ColumnMeta::builder()
        .label("Name")
        .synonyms(["b", "a"])
        .build();
    let c = ColumnMeta::builder().label("Other").build();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_export_shape() {
    let meta = ColumnMeta::builder()
        .label("Status")
        .source(Source::requested())
        .target(Target::new(false, true, Usage::DISPLAY))
        .domain_items([("A", "active"), ("R", "retired")])
        .build();

    assert_eq!(
        meta.export(),
        Some(json!({
            "label": "Status",
            "description": "",
            "source": {"requirement": 1},
            "target": {"guaranteed": false, "calculated": true, "usage": ["DISPLAY"]},
            "domain": [
                {"value": "A", "description": "active"},
                {"value": "R", "description": "retired"}
            ]
        }))
    );
}

#[test]
fn test_export_includes_declared_data_type() {
    let meta = ColumnMeta::builder()
        .label("Width")
        .data_type(DataTypeMeta::new(DeclarativeType::Float))
        .build();

    let exported = meta.export().unwrap();
    assert_eq!(
        exported["data_type"],
        json!({"declarative": "FLOAT", "primary_key": false})
    );
}

#[test]
fn test_table_meta_lookup_ignores_case() {
    let mut table = TableMeta::new("parcels")
        .with_label("Parcels")
        .with_synonyms(Synonyms::new(["lots", "tax_parcel"]));
    table.add_column("ParcelId", parcel_id());
    table.add_column("owner", ColumnMeta::builder().label("Owner").build());

    assert_eq!(table.tablename(), "parcels");
    assert_eq!(table.label(), Some("Parcels"));
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.column("parcelid").unwrap().label(), "Parcel ID");
    assert_eq!(table.column("OWNER").unwrap().label(), "Owner");
    assert!(table.column("address").is_none());
    assert!(table.is_synonym("Lots"));
    assert!(!table.is_synonym("buildings"));

    let names: Vec<&str> = table.columns().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["ParcelId", "owner"]);
}

#[test]
fn test_table_export() {
    let mut table = TableMeta::new("roads").with_label("Roads");
    table.add_column("name", ColumnMeta::builder().label("Road Name").build());

    assert_eq!(
        table.export(),
        Some(json!({
            "tablename": "roads",
            "label": "Roads",
            "columns": {
                "name": {
                    "label": "Road Name",
                    "description": "",
                    "target": {"guaranteed": false, "calculated": false}
                }
            }
        }))
    );
}
