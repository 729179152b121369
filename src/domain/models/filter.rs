//! Metadata predicates applied during vector search.

use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// A boolean predicate over record metadata.
///
/// An empty `And` matches everything, an empty `Or` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataFilter {
    /// `metadata[key] == value`
    Eq(String, String),
    /// `metadata[key]` is one of `values`
    In(String, Vec<String>),
    /// `key` is present
    Exists(String),
    And(Vec<MetadataFilter>),
    Or(Vec<MetadataFilter>),
    Not(Box<MetadataFilter>),
}

impl MetadataFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq(key.into(), value.into())
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self::Exists(key.into())
    }

    pub fn is_in<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::In(key.into(), values.into_iter().map(Into::into).collect())
    }

    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Parse a CLI-style `key=value` pair into an `Eq` filter.
    pub fn parse_pair(pair: &str) -> Option<Self> {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::eq(key, value.trim()))
    }

    /// Evaluate against a record's metadata.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        match self {
            Self::Eq(key, value) => metadata.get(key) == Some(value.as_str()),
            Self::In(key, values) => metadata
                .get(key)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
            Self::Exists(key) => metadata.contains_key(key),
            Self::And(filters) => filters.iter().all(|f| f.matches(metadata)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(metadata)),
            Self::Not(inner) => !inner.matches(metadata),
        }
    }
}
