//! Integration tests for column type parsing and declarative classification.

use modlit::prelude::*;

#[test]
fn test_standard_mappings() {
    let cases = [
        (ColumnType::Uuid, DeclarativeType::Uuid),
        (ColumnType::Text, DeclarativeType::Text),
        (ColumnType::String { length: Some(10) }, DeclarativeType::Text),
        (ColumnType::Char { length: Some(2) }, DeclarativeType::Text),
        (ColumnType::NChar { length: None }, DeclarativeType::Text),
        (ColumnType::Varchar { length: Some(255) }, DeclarativeType::Text),
        (ColumnType::NVarchar { length: None }, DeclarativeType::Text),
        (ColumnType::SmallInteger, DeclarativeType::Integer),
        (ColumnType::Integer, DeclarativeType::Integer),
        (ColumnType::BigInteger, DeclarativeType::Integer),
        (ColumnType::Real, DeclarativeType::Float),
        (ColumnType::Float { precision: None }, DeclarativeType::Float),
        (
            ColumnType::Numeric {
                precision: Some(10),
                scale: Some(2),
            },
            DeclarativeType::Float,
        ),
        (
            ColumnType::Decimal {
                precision: None,
                scale: None,
            },
            DeclarativeType::Float,
        ),
        (ColumnType::Date, DeclarativeType::Date),
        (ColumnType::Time, DeclarativeType::Time),
        (ColumnType::DateTime, DeclarativeType::DateTime),
    ];

    let classifier = TypeClassifier::standard();
    for (column_type, expected) in cases {
        assert_eq!(
            classifier.classify(&column_type).unwrap(),
            expected,
            "{} should classify as {}",
            column_type,
            expected
        );
    }
}

#[test]
fn test_unmapped_types_carry_the_offending_type() {
    let unmapped = [
        ColumnType::Boolean,
        ColumnType::Timestamp,
        ColumnType::Binary,
        ColumnType::Json,
        ColumnType::Geometry {
            geometry_type: Some("POINT".into()),
            srid: Some(4326),
        },
        ColumnType::Custom("INTERVAL".into()),
    ];

    for column_type in unmapped {
        let err = DeclarativeType::from_column_type(&column_type).unwrap_err();
        assert_eq!(err.column_type, column_type);
        assert!(err.to_string().starts_with("An unsupported type was encountered"));
    }
}

#[test]
fn test_kinds_of_text() {
    let kinds = TypeClassifier::standard().kinds_of(DeclarativeType::Text);
    assert_eq!(kinds.len(), 6);
    assert!(kinds.contains(&TypeKind::Varchar));
    assert!(!kinds.contains(&TypeKind::Uuid));
}

#[test]
fn test_duplicate_bucket_rejected() {
    let err = TypeClassifier::from_buckets([
        (DeclarativeType::Text, vec![TypeKind::Text]),
        (DeclarativeType::Integer, vec![TypeKind::Integer, TypeKind::Text]),
    ])
    .unwrap_err();

    assert_eq!(
        err,
        ModlitError::DuplicateTypeMapping {
            kind: TypeKind::Text,
            first: DeclarativeType::Text,
            second: DeclarativeType::Integer,
        }
    );
}

#[test]
fn test_with_mapping_extends_a_copy() {
    let standard = TypeClassifier::standard();
    let extended = standard
        .with_mapping(TypeKind::Timestamp, DeclarativeType::DateTime)
        .unwrap();

    assert_eq!(
        extended.classify(&ColumnType::Timestamp).unwrap(),
        DeclarativeType::DateTime
    );
    assert!(standard.classify(&ColumnType::Timestamp).is_err());
    assert!(extended
        .with_mapping(TypeKind::Uuid, DeclarativeType::Text)
        .is_err());
}

#[test]
fn test_parse_sql_spellings() {
    assert_eq!(ColumnType::parse("UUID"), ColumnType::Uuid);
    assert_eq!(ColumnType::parse(" integer "), ColumnType::Integer);
    assert_eq!(
        ColumnType::parse("VARCHAR(64)"),
        ColumnType::Varchar { length: Some(64) }
    );
    assert_eq!(
        ColumnType::parse("numeric(12, 3)"),
        ColumnType::Numeric {
            precision: Some(12),
            scale: Some(3)
        }
    );
    assert_eq!(ColumnType::parse("boolean"), ColumnType::Boolean);
    assert_eq!(ColumnType::parse("blob"), ColumnType::Binary);
    assert_eq!(ColumnType::parse("jsonb"), ColumnType::Json);
    assert!(ColumnType::parse("geometry").is_geometry());
    assert_eq!(
        ColumnType::parse("money"),
        ColumnType::Custom("money".into())
    );
}

#[test]
fn test_custom_classifier_drives_registry() {
    let classifier = TypeClassifier::standard()
        .with_mapping(TypeKind::Boolean, DeclarativeType::Integer)
        .unwrap();
    let mut registry = MetadataRegistry::with_classifier(classifier);

    let flagged = registry
        .register(ModelBuilder::new("Flagged").column_with_meta(
            "active",
            ColumnDef::new(ColumnType::Boolean),
            ColumnMeta::builder().label("Active").build(),
        ))
        .unwrap();

    let field = registry
        .resolve(flagged, "active")
        .map(|f| f.id())
        .unwrap();
    let data_type = registry.data_type_meta(field).unwrap().unwrap();
    assert_eq!(data_type.declarative, DeclarativeType::Integer);
}
