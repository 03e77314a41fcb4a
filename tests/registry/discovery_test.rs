//! Integration tests for metadata discovery along model hierarchies.

use std::sync::Arc;

use modlit::prelude::*;

fn label(text: &str) -> ColumnMeta {
    ColumnMeta::builder().label(text).build()
}

fn text() -> ColumnDef {
    ColumnDef::new(ColumnType::Varchar { length: Some(80) })
}

fn meta_of(registry: &MetadataRegistry, model: ModelId, name: &str) -> Option<Arc<ColumnMeta>> {
    let field = registry.resolve(model, name)?;
    registry.get_metadata(field.id())
}

fn feature(registry: &mut MetadataRegistry) -> ModelId {
    registry
        .register(
            ModelBuilder::new("Feature")
                .column_with_meta("name", text(), label("Feature Name"))
                .column_with_meta("code", text(), label("Feature Code")),
        )
        .unwrap()
}

#[test]
fn test_redeclared_column_inherits_metadata() {
    let mut registry = MetadataRegistry::new();
    let base = feature(&mut registry);
    let road = registry
        .register(ModelBuilder::new("Road").base("Feature").column("name", text()))
        .unwrap();

    let inherited = meta_of(&registry, road, "name").unwrap();
    let declared = meta_of(&registry, base, "name").unwrap();
    assert_eq!(inherited.label(), "Feature Name");
    assert!(Arc::ptr_eq(&inherited, &declared));

    // The redeclared column is a distinct field from the base's.
    let road_name = registry.resolve(road, "name").unwrap().id();
    let base_name = registry.resolve(base, "name").unwrap().id();
    assert_ne!(road_name, base_name);
    assert!(registry.has_metadata(road_name));
}

#[test]
fn test_own_metadata_is_never_overwritten() {
    let mut registry = MetadataRegistry::new();
    feature(&mut registry);
    let road = registry
        .register(
            ModelBuilder::new("Road")
                .base("Feature")
                .column_with_meta("name", text(), label("Road Name")),
        )
        .unwrap();

    assert_eq!(meta_of(&registry, road, "name").unwrap().label(), "Road Name");
    assert_eq!(registry.discover(road).unwrap(), 0);
    assert_eq!(meta_of(&registry, road, "name").unwrap().label(), "Road Name");
}

#[test]
fn test_non_column_redeclaration_is_skipped() {
    let mut registry = MetadataRegistry::new();
    feature(&mut registry);
    let sign = registry
        .register(ModelBuilder::new("Sign").base("Feature").attribute("code"))
        .unwrap();

    let code = registry.resolve(sign, "code").unwrap();
    assert!(!code.is_column());
    assert!(registry.get_metadata(code.id()).is_none());
}

#[test]
fn test_inherited_columns_appear_in_table_meta() {
    let mut registry = MetadataRegistry::new();
    feature(&mut registry);
    let road = registry
        .register(
            ModelBuilder::new("Road")
                .base("Feature")
                .tablename("roads")
                .table("Roads", Vec::<String>::new())
                .column("name", text())
                .column_with_meta("lanes", ColumnDef::new(ColumnType::Integer), label("Lanes")),
        )
        .unwrap();

    let table = registry.table_meta(road).unwrap();
    assert_eq!(
        table.columns().map(|(name, _)| name).collect::<Vec<_>>(),
        vec!["name", "code", "lanes"]
    );
    assert_eq!(table.column("name").unwrap().label(), "Feature Name");
    assert_eq!(table.column("code").unwrap().label(), "Feature Code");
}

#[test]
fn test_diamond_takes_nearest_ancestor() {
    let mut registry = MetadataRegistry::new();
    feature(&mut registry);
    registry
        .register(ModelBuilder::new("Linear").base("Feature"))
        .unwrap();
    registry
        .register(
            ModelBuilder::new("Named")
                .base("Feature")
                .column_with_meta("code", text(), label("Named Code")),
        )
        .unwrap();
    let trail = registry
        .register(
            ModelBuilder::new("Trail")
                .base("Linear")
                .base("Named")
                .column("code", text()),
        )
        .unwrap();

    let names: Vec<&str> = registry
        .ancestors(trail)
        .unwrap()
        .iter()
        .map(|&id| registry.model(id).unwrap().name())
        .collect();
    assert_eq!(names, vec!["Trail", "Linear", "Named", "Feature"]);

    assert_eq!(meta_of(&registry, trail, "code").unwrap().label(), "Named Code");
    assert_eq!(meta_of(&registry, trail, "name").unwrap().label(), "Feature Name");
}

#[test]
fn test_rediscovery_after_late_attach() {
    let mut registry = MetadataRegistry::new();
    let base = registry
        .register(ModelBuilder::new("Asset").column("serial", text()))
        .unwrap();
    let pump = registry
        .register(ModelBuilder::new("Pump").base("Asset").column("serial", text()))
        .unwrap();
    assert!(meta_of(&registry, pump, "serial").is_none());

    let base_serial = registry.resolve(base, "serial").unwrap().id();
    registry.attach(base_serial, label("Serial Number")).unwrap();

    assert_eq!(registry.discover(pump).unwrap(), 1);
    assert_eq!(
        meta_of(&registry, pump, "serial").unwrap().label(),
        "Serial Number"
    );
    assert_eq!(registry.discover(pump).unwrap(), 0);
}

#[test]
fn test_visible_fields_follow_linearization_from_root() {
    let mut registry = MetadataRegistry::new();
    feature(&mut registry);
    registry
        .register(ModelBuilder::new("Linear").base("Feature").column("span", text()))
        .unwrap();
    registry
        .register(ModelBuilder::new("Named").base("Feature").column("alias", text()))
        .unwrap();
    let trail = registry
        .register(ModelBuilder::new("Trail").base("Linear").base("Named"))
        .unwrap();

    let names: Vec<&str> = registry
        .visible_fields(trail)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    // Reversed [Trail, Linear, Named, Feature]: Named's fields precede Linear's.
    assert_eq!(names, vec!["name", "code", "alias", "span"]);
}
