//! Synonym sets for named metadata objects.
//!
//! A synonym is a name pattern. Matching is case-insensitive and anchored at
//! the start of the candidate name, so `alpha[0-9]` matches `Alpha1` and
//! `alpha1_old` but not `old_alpha1`.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// An immutable, ordered set of synonym patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Synonyms {
    patterns: Vec<String>,
    matchers: Vec<Regex>,
}

impl Synonyms {
    pub fn new<I, S>(synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut patterns: Vec<String> = Vec::new();
        for synonym in synonyms {
            let synonym = synonym.into();
            if !patterns.contains(&synonym) {
                patterns.push(synonym);
            }
        }
        let matchers = patterns.iter().filter_map(|p| compile(p)).collect();
        Self { patterns, matchers }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The patterns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|s| s.as_str())
    }

    /// Is `name` matched by any of the patterns?
    pub fn is_synonym(&self, name: &str) -> bool {
        self.matchers.iter().any(|re| re.is_match(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    let build = |source: &str| {
        RegexBuilder::new(&format!("^(?:{})", source))
            .case_insensitive(true)
            .build()
    };
    build(pattern)
        .or_else(|err| {
            tracing::warn!(
                pattern,
                error = %err,
                "synonym is not a valid pattern; matching it literally"
            );
            build(&regex::escape(pattern))
        })
        .ok()
}

impl PartialEq for Synonyms {
    fn eq(&self, other: &Self) -> bool {
        let mine: HashSet<&str> = self.iter().collect();
        let theirs: HashSet<&str> = other.iter().collect();
        mine == theirs
    }
}

impl Eq for Synonyms {}

impl From<Vec<String>> for Synonyms {
    fn from(v: Vec<String>) -> Self {
        Synonyms::new(v)
    }
}

impl From<Synonyms> for Vec<String> {
    fn from(s: Synonyms) -> Self {
        s.patterns
    }
}

impl<S: Into<String>> FromIterator<S> for Synonyms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Synonyms::new(iter)
    }
}
