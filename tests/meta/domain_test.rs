//! Integration tests for value domains.

use modlit::meta::{Export, ValueDomain, ValueDomainItem};
use modlit::prelude::*;
use serde_json::json;

fn surface() -> ValueDomain {
    ValueDomain::new([
        ("PAVED", "Asphalt or concrete"),
        ("GRAVEL", "Loose aggregate"),
        ("DIRT", "Unimproved"),
    ])
}

#[test]
fn test_describe_known_values() {
    let domain = ValueDomain::new([("A", "first"), ("B", "second")]);

    assert_eq!(domain.describe("A"), Some("first"));
    assert_eq!(domain.describe("B"), Some("second"));
    assert_eq!(domain.describe("C"), None);
    assert_eq!(domain.len(), 2);
}

#[test]
fn test_lookup_falls_back_to_case_insensitive() {
    let domain = surface();

    assert!(domain.contains("gravel"));
    assert_eq!(domain.describe("Paved"), Some("Asphalt or concrete"));
    assert_eq!(
        domain.get("dirt").map(|item| &item.value),
        Some(&DomainValue::from("DIRT"))
    );
    assert!(!domain.contains("cobble"));
}

#[test]
fn test_declaration_order_preserved() {
    let values: Vec<String> = surface().iter().map(|v| v.to_string()).collect();
    assert_eq!(values, vec!["PAVED", "GRAVEL", "DIRT"]);
}

#[test]
fn test_first_duplicate_wins() {
    let domain = ValueDomain::new([("X", "first"), ("X", "replacement")]);
    assert_eq!(domain.len(), 1);
    assert_eq!(domain.describe("X"), Some("first"));
}

#[test]
fn test_mixed_value_kinds() {
    let domain: ValueDomain = [
        ValueDomainItem::new(1, "one lane"),
        ValueDomainItem::new(2, "two lanes"),
        ValueDomainItem::new("N/A", "unknown"),
    ]
    .into_iter()
    .collect();

    assert_eq!(domain.describe(2), Some("two lanes"));
    assert_eq!(domain.describe("n/a"), Some("unknown"));
    assert!(!domain.contains(3));
}

#[test]
fn test_domain_equality_ignores_order() {
    let a = ValueDomain::new([("A", "first"), ("B", "second")]);
    let b = ValueDomain::new([("B", "second"), ("A", "first")]);
    let c = ValueDomain::new([("A", "first"), ("B", "other")]);

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_domain_on_column_meta() {
    let meta = ColumnMeta::builder()
        .label("Surface")
        .domain(surface())
        .build();

    let domain = meta.domain().unwrap();
    assert_eq!(domain.describe("paved"), Some("Asphalt or concrete"));
    assert_eq!(
        domain.export(),
        Some(json!([
            {"value": "PAVED", "description": "Asphalt or concrete"},
            {"value": "GRAVEL", "description": "Loose aggregate"},
            {"value": "DIRT", "description": "Unimproved"}
        ]))
    );
}

#[test]
fn test_domain_from_toml() {
    #[derive(serde::Deserialize)]
    struct Holder {
        domain: ValueDomain,
    }

    let holder: Holder = toml::from_str(
        r#"
        domain = [
            ["A", "first"],
            { value = 2, description = "two" },
            "C",
        ]
        "#,
    )
    .unwrap();

    assert_eq!(holder.domain.describe("a"), Some("first"));
    assert_eq!(holder.domain.describe(2), Some("two"));
    assert_eq!(holder.domain.describe("C"), Some(""));
}
