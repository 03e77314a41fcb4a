//! Value domains: the enumerated, described set of legal values for a column.
//!
//! Lookups go through the exact-match index first. Text values are also
//! indexed case-insensitively, and that index is consulted only when the exact
//! lookup misses. An integral float and the equal integer are the same value.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Export;

/// A value within a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DomainValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DomainValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, DomainValue::Text(s) if s.is_empty())
    }
}

/// Lookup identity of a value. Integral floats key as integers, so `1` and
/// `1.0` name the same entry; other floats compare by bit pattern.
#[derive(PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Integer(i64),
    Float(u64),
    Text(&'a str),
}

impl DomainValue {
    fn key(&self) -> ValueKey<'_> {
        match self {
            DomainValue::Integer(n) => ValueKey::Integer(*n),
            DomainValue::Float(x) if x.fract() == 0.0 && (-9.2e18..9.2e18).contains(x) => {
                ValueKey::Integer(*x as i64)
            }
            DomainValue::Float(x) => ValueKey::Float(x.to_bits()),
            DomainValue::Text(s) => ValueKey::Text(s),
        }
    }
}

impl PartialEq for DomainValue {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for DomainValue {}

impl Hash for DomainValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainValue::Integer(n) => write!(f, "{}", n),
            DomainValue::Float(x) => write!(f, "{}", x),
            DomainValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DomainValue {
    fn from(s: &str) -> Self {
        DomainValue::Text(s.to_string())
    }
}

impl From<String> for DomainValue {
    fn from(s: String) -> Self {
        DomainValue::Text(s)
    }
}

impl From<i64> for DomainValue {
    fn from(n: i64) -> Self {
        DomainValue::Integer(n)
    }
}

impl From<i32> for DomainValue {
    fn from(n: i32) -> Self {
        DomainValue::Integer(n.into())
    }
}

impl From<f64> for DomainValue {
    fn from(x: f64) -> Self {
        DomainValue::Float(x)
    }
}

impl From<&DomainValue> for DomainValue {
    fn from(v: &DomainValue) -> Self {
        v.clone()
    }
}

/// A value paired with its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRepr")]
pub struct ValueDomainItem {
    pub value: DomainValue,
    pub description: String,
}

impl ValueDomainItem {
    pub fn new(value: impl Into<DomainValue>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Accepted spellings of a domain item in catalog files.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRepr {
    Full {
        value: DomainValue,
        #[serde(default)]
        description: String,
    },
    Pair(DomainValue, String),
    Bare(DomainValue),
}

impl From<ItemRepr> for ValueDomainItem {
    fn from(repr: ItemRepr) -> Self {
        match repr {
            ItemRepr::Full { value, description } | ItemRepr::Pair(value, description) => {
                ValueDomainItem { value, description }
            }
            ItemRepr::Bare(value) => ValueDomainItem {
                value,
                description: String::new(),
            },
        }
    }
}

impl<V: Into<DomainValue>, D: Into<String>> From<(V, D)> for ValueDomainItem {
    fn from((value, description): (V, D)) -> Self {
        ValueDomainItem::new(value, description)
    }
}

/// An immutable set of permitted values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ValueDomainItem>", into = "Vec<ValueDomainItem>")]
pub struct ValueDomain {
    items: Vec<ValueDomainItem>,
    exact: HashMap<DomainValue, usize>,
    nocase: HashMap<String, usize>,
}

impl ValueDomain {
    /// Build a domain. Empty text values are skipped; a repeated value keeps
    /// its first description.
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ValueDomainItem>,
    {
        let mut domain = ValueDomain::default();
        for item in items {
            let item: ValueDomainItem = item.into();
            if item.value.is_empty() || domain.exact.contains_key(&item.value) {
                continue;
            }
            let i = domain.items.len();
            domain.exact.insert(item.value.clone(), i);
            if let Some(text) = item.value.as_text() {
                domain.nocase.entry(text.to_lowercase()).or_insert(i);
            }
            domain.items.push(item);
        }
        domain
    }

    fn find(&self, value: &DomainValue) -> Option<&ValueDomainItem> {
        self.exact
            .get(value)
            .or_else(|| {
                value
                    .as_text()
                    .and_then(|text| self.nocase.get(&text.to_lowercase()))
            })
            .map(|&i| &self.items[i])
    }

    /// The description provided for `value`, if it belongs to the domain.
    pub fn describe(&self, value: impl Into<DomainValue>) -> Option<&str> {
        self.find(&value.into()).map(|item| item.description.as_str())
    }

    pub fn contains(&self, value: impl Into<DomainValue>) -> bool {
        self.find(&value.into()).is_some()
    }

    /// The item for `value`, with its declared spelling.
    pub fn get(&self, value: impl Into<DomainValue>) -> Option<&ValueDomainItem> {
        self.find(&value.into())
    }

    /// Values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DomainValue> {
        self.items.iter().map(|item| &item.value)
    }

    pub fn items(&self) -> &[ValueDomainItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PartialEq for ValueDomain {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .items
                .iter()
                .all(|item| other.exact.get(&item.value).map(|&i| &other.items[i]) == Some(item))
    }
}

impl Eq for ValueDomain {}

impl From<Vec<ValueDomainItem>> for ValueDomain {
    fn from(items: Vec<ValueDomainItem>) -> Self {
        ValueDomain::new(items)
    }
}

impl From<ValueDomain> for Vec<ValueDomainItem> {
    fn from(domain: ValueDomain) -> Self {
        domain.items
    }
}

impl<T: Into<ValueDomainItem>> FromIterator<T> for ValueDomain {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ValueDomain::new(iter)
    }
}

impl Export for ValueDomain {
    fn export(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        Some(Value::Array(
            self.items
                .iter()
                .map(|item| json!({"value": item.value, "description": item.description}))
                .collect(),
        ))
    }
}
