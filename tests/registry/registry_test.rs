//! Integration tests for the metadata registry.

use std::sync::Arc;

use modlit::meta::Export;
use modlit::prelude::*;
use modlit::registry::TableRecord;
use serde_json::json;

fn label(text: &str) -> ColumnMeta {
    ColumnMeta::builder().label(text).build()
}

fn field_id(registry: &MetadataRegistry, model: ModelId, name: &str) -> FieldId {
    registry
        .resolve(model, name)
        .map(|f| f.id())
        .unwrap_or_else(|| panic!("no field '{}'", name))
}

fn parcels(registry: &mut MetadataRegistry) -> ModelId {
    registry
        .register(
            ModelBuilder::new("Parcel")
                .tablename("parcels")
                .table("Parcels", ["lots"])
                .column_with_meta(
                    "id",
                    ColumnDef::new(ColumnType::Uuid).primary_key(),
                    label("Parcel ID"),
                )
                .column_with_meta(
                    "area",
                    ColumnDef::new(ColumnType::Numeric {
                        precision: Some(12),
                        scale: Some(2),
                    }),
                    label("Area"),
                )
                .column("notes", ColumnDef::new(ColumnType::Text))
                .relationship_with_meta("owner", "Owner", label("Owner"))
                .attribute("cached_score"),
        )
        .unwrap()
}

#[test]
fn test_attach_and_get_metadata() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);
    let notes = field_id(&registry, parcel, "notes");

    assert!(!registry.has_metadata(notes));
    assert!(registry.get_metadata(notes).is_none());

    registry.attach(notes, label("Notes")).unwrap();
    assert!(registry.has_metadata(notes));
    assert_eq!(registry.get_metadata(notes).unwrap().label(), "Notes");

    // Attaching again replaces.
    registry.attach(notes, label("Remarks")).unwrap();
    assert_eq!(registry.get_metadata(notes).unwrap().label(), "Remarks");
}

#[test]
fn test_shared_metadata_is_the_same_instance() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);
    let id = field_id(&registry, parcel, "id");

    let a = registry.get_metadata(id).unwrap();
    let b = registry.get_metadata(id).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_plain_attribute_never_has_metadata() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);
    let score = field_id(&registry, parcel, "cached_score");

    registry.attach(score, label("Score")).unwrap();
    assert!(!registry.has_metadata(score));
    assert!(registry
        .table_meta(parcel)
        .unwrap()
        .column("cached_score")
        .is_none());
}

#[test]
fn test_relationship_is_field_like() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);
    let owner = field_id(&registry, parcel, "owner");

    assert!(registry.has_metadata(owner));
    assert_eq!(registry.data_type_meta(owner).unwrap(), None);
}

#[test]
fn test_unknown_base_rejected() {
    let mut registry = MetadataRegistry::new();
    let err = registry
        .register(ModelBuilder::new("Road").base("Feature"))
        .unwrap_err();

    assert_eq!(err, ModlitError::UnknownModel("Feature".into()));
    assert!(registry.model_by_name("Road").is_none());
}

#[test]
fn test_duplicate_model_rejected() {
    let mut registry = MetadataRegistry::new();
    parcels(&mut registry);
    let err = registry.register(ModelBuilder::new("Parcel")).unwrap_err();
    assert_eq!(err, ModlitError::DuplicateModel("Parcel".into()));
}

#[test]
fn test_inconsistent_hierarchy_rejected() {
    let mut registry = MetadataRegistry::new();
    registry.register(ModelBuilder::new("A")).unwrap();
    registry.register(ModelBuilder::new("B").base("A")).unwrap();

    let err = registry
        .register(ModelBuilder::new("C").base("A").base("B"))
        .unwrap_err();
    assert_eq!(err, ModlitError::InconsistentHierarchy("C".into()));
}

#[test]
fn test_unsupported_declared_column_type() {
    let mut registry = MetadataRegistry::new();
    let err = registry
        .register(ModelBuilder::new("Flag").column_with_meta(
            "active",
            ColumnDef::new(ColumnType::Boolean),
            label("Active"),
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        ModlitError::UnsupportedType(e) if e.column_type == ColumnType::Boolean
    ));
}

#[test]
fn test_declared_data_type_skips_derivation() {
    let mut registry = MetadataRegistry::new();
    let flag = registry
        .register(ModelBuilder::new("Flag").column_with_meta(
            "active",
            ColumnDef::new(ColumnType::Boolean),
            ColumnMeta::builder()
                .label("Active")
                .data_type(DataTypeMeta::new(DeclarativeType::Integer))
                .build(),
        ))
        .unwrap();

    let active = field_id(&registry, flag, "active");
    let data_type = registry.data_type_meta(active).unwrap().unwrap();
    assert_eq!(data_type.declarative, DeclarativeType::Integer);
}

#[test]
fn test_data_type_meta_from_column() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);

    let id = registry
        .data_type_meta(field_id(&registry, parcel, "id"))
        .unwrap()
        .unwrap();
    assert_eq!(id.declarative, DeclarativeType::Uuid);
    assert!(id.primary_key);

    let area = registry
        .data_type_meta(field_id(&registry, parcel, "area"))
        .unwrap()
        .unwrap();
    assert_eq!(area.declarative, DeclarativeType::Float);
    assert_eq!((area.precision, area.scale), (Some(12), Some(2)));
    assert!(!area.primary_key);
}

#[test]
fn test_attached_metadata_derives_lazily() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);
    let notes = field_id(&registry, parcel, "notes");
    registry.attach(notes, label("Notes")).unwrap();

    assert!(registry.get_metadata(notes).unwrap().data_type_meta().is_none());
    let derived = registry.data_type_meta(notes).unwrap().unwrap();
    assert_eq!(derived.declarative, DeclarativeType::Text);
    assert_eq!(
        registry.get_metadata(notes).unwrap().data_type_meta(),
        Some(&derived)
    );
}

#[test]
fn test_table_meta() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);
    let table = registry.table_meta(parcel).unwrap();

    assert_eq!(table.tablename(), "parcels");
    assert_eq!(table.label(), Some("Parcels"));
    assert!(table.is_synonym("LOTS"));
    assert_eq!(
        table.columns().map(|(name, _)| name).collect::<Vec<_>>(),
        vec!["id", "area", "owner"]
    );
    assert_eq!(table.column("ID").unwrap().label(), "Parcel ID");
}

#[test]
fn test_table_meta_requires_table_record() {
    let mut registry = MetadataRegistry::new();
    let bare = registry
        .register(ModelBuilder::new("Bare").column_with_meta(
            "name",
            ColumnDef::new(ColumnType::Text),
            label("Name"),
        ))
        .unwrap();
    assert!(registry.table_meta(bare).is_none());

    let unnamed = registry
        .register(ModelBuilder::new("Unnamed").table_record(TableRecord::default()))
        .unwrap();
    let table = registry.table_meta(unnamed).unwrap();
    assert_eq!(table.tablename(), "Unnamed");
    assert_eq!(table.label(), None);
    assert_eq!(table.column_count(), 0);
}

#[test]
fn test_model_meta() {
    let mut registry = MetadataRegistry::new();
    let parcel = parcels(&mut registry);
    let bare = registry.register(ModelBuilder::new("Bare")).unwrap();

    let model = registry.model_meta(
        "Cadastre",
        "Tax Parcels",
        "County GIS",
        "2.1",
        &[parcel, bare],
    );

    assert_eq!(model.urn(), "urn:county_gis:tax_parcels:2.1");
    assert_eq!(model.tables().count(), 1);
    assert!(model.table("PARCELS").is_some());

    let exported = model.export().unwrap();
    assert_eq!(exported["title"], json!("Cadastre"));
    assert_eq!(exported["urn"], json!("urn:county_gis:tax_parcels:2.1"));
    assert_eq!(
        exported["tables"]["parcels"]["columns"]["id"]["data_type"],
        json!({"declarative": "UUID", "primary_key": true})
    );
}

#[test]
fn test_tablename_inherited() {
    let mut registry = MetadataRegistry::new();
    let base = registry
        .register(ModelBuilder::new("Feature").tablename("features"))
        .unwrap();
    let child = registry
        .register(ModelBuilder::new("Hydrant").base("Feature"))
        .unwrap();

    assert_eq!(registry.tablename(base), Some("features"));
    assert_eq!(registry.tablename(child), Some("features"));
    assert_eq!(registry.ancestors(child).unwrap(), &[child, base]);
}
