//! Source and target data contracts.
//!
//! - [`Source`] describes what is expected from upstream data providers.
//! - [`Target`] describes what downstream consumers are promised.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{Export, Synonyms};

/// Contract with source data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Data for the column is neither requested nor required.
    #[default]
    None,
    /// Data for the column is requested.
    Requested,
    /// Data for the column is required.
    Required,
}

impl Requirement {
    /// Numeric flag value. `Required` includes the `Requested` bit.
    pub fn value(&self) -> u8 {
        match self {
            Requirement::None => 0,
            Requirement::Requested => 1,
            Requirement::Required => 3,
        }
    }

    /// Does this requirement at least request data?
    pub fn is_requested(&self) -> bool {
        self.value() & Requirement::Requested.value() != 0
    }
}

/// 'Source' information defines contracts with data providers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    requirement: Requirement,
    #[serde(default)]
    synonyms: Synonyms,
}

impl Source {
    pub fn new(requirement: Requirement, synonyms: Synonyms) -> Self {
        Self {
            requirement,
            synonyms,
        }
    }

    pub fn required() -> Self {
        Self::new(Requirement::Required, Synonyms::empty())
    }

    pub fn requested() -> Self {
        Self::new(Requirement::Requested, Synonyms::empty())
    }

    pub fn with_synonyms(mut self, synonyms: Synonyms) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    pub fn synonyms(&self) -> &Synonyms {
        &self.synonyms
    }

    /// Is a given name a synonym for this source column?
    pub fn is_synonym(&self, name: &str) -> bool {
        self.synonyms.is_synonym(name)
    }
}

impl Export for Source {
    fn export(&self) -> Option<Value> {
        let mut out = Map::new();
        if self.requirement != Requirement::None {
            out.insert("requirement".into(), json!(self.requirement.value()));
        }
        if !self.synonyms.is_empty() {
            out.insert("synonyms".into(), json!(self.synonyms.iter().collect::<Vec<_>>()));
        }
        (!out.is_empty()).then_some(Value::Object(out))
    }
}

/// How data in a column may be used. Flags combine with `|`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<UsageFlag>", into = "Vec<UsageFlag>")]
pub struct Usage(u8);

/// A single named usage flag, used for (de)serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UsageFlag {
    Search,
    Display,
}

impl Usage {
    /// The data is not used.
    pub const NONE: Usage = Usage(0);
    /// The data is used for searching.
    pub const SEARCH: Usage = Usage(1);
    /// The data is displayed to users.
    pub const DISPLAY: Usage = Usage(2);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Usage) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The individual flags that are set.
    pub fn flags(&self) -> Vec<UsageFlag> {
        let mut flags = Vec::new();
        if self.contains(Usage::SEARCH) {
            flags.push(UsageFlag::Search);
        }
        if self.contains(Usage::DISPLAY) {
            flags.push(UsageFlag::Display);
        }
        flags
    }
}

impl fmt::Debug for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Usage(NONE)");
        }
        let names: Vec<&str> = self
            .flags()
            .iter()
            .map(|flag| match flag {
                UsageFlag::Search => "SEARCH",
                UsageFlag::Display => "DISPLAY",
            })
            .collect();
        write!(f, "Usage({})", names.join(" | "))
    }
}

impl BitOr for Usage {
    type Output = Usage;

    fn bitor(self, rhs: Usage) -> Usage {
        Usage(self.0 | rhs.0)
    }
}

impl BitOrAssign for Usage {
    fn bitor_assign(&mut self, rhs: Usage) {
        self.0 |= rhs.0;
    }
}

impl From<UsageFlag> for Usage {
    fn from(flag: UsageFlag) -> Self {
        match flag {
            UsageFlag::Search => Usage::SEARCH,
            UsageFlag::Display => Usage::DISPLAY,
        }
    }
}

impl FromIterator<Usage> for Usage {
    fn from_iter<I: IntoIterator<Item = Usage>>(iter: I) -> Self {
        iter.into_iter().fold(Usage::NONE, |a, b| a | b)
    }
}

impl From<Vec<UsageFlag>> for Usage {
    fn from(flags: Vec<UsageFlag>) -> Self {
        flags.into_iter().map(Usage::from).collect()
    }
}

impl From<Usage> for Vec<UsageFlag> {
    fn from(usage: Usage) -> Self {
        usage.flags()
    }
}

/// 'Target' information describes contracts with data consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    guaranteed: bool,
    calculated: bool,
    usage: Usage,
}

impl Target {
    pub fn new(guaranteed: bool, calculated: bool, usage: Usage) -> Self {
        Self {
            guaranteed,
            calculated,
            usage,
        }
    }

    /// Is the column guaranteed to contain a non-empty value?
    pub fn guaranteed(&self) -> bool {
        self.guaranteed
    }

    /// May the column's value be generated or modified by a calculation?
    pub fn calculated(&self) -> bool {
        self.calculated
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }
}

impl Export for Target {
    fn export(&self) -> Option<Value> {
        let mut out = Map::new();
        out.insert("guaranteed".into(), json!(self.guaranteed));
        out.insert("calculated".into(), json!(self.calculated));
        if !self.usage.is_empty() {
            out.insert("usage".into(), json!(self.usage.flags()));
        }
        Some(Value::Object(out))
    }
}
