//! Product identifiers and their dense integer encoding

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque external product key.
///
/// A dataset's ids are either all numeric or all text (see [`IdKind`]), so
/// they sort numerically or lexically as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Numeric(i64),
    Text(String),
}

/// How the identifiers of one dataset column are typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Numeric,
    Text,
}

impl IdKind {
    /// Numeric only when every value is an integer; one text value makes the
    /// whole column text
    pub fn infer<'a, I>(raws: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        if raws.into_iter().all(|raw| parse_integer(raw).is_some()) {
            IdKind::Numeric
        } else {
            IdKind::Text
        }
    }
}

/// Integers that round-trip, so `"007"` is not one
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .filter(|value| value.to_string() == raw)
}

impl ProductId {
    /// Build an identifier from a cell of a column of kind `kind`
    pub fn parse(raw: &str, kind: IdKind) -> Self {
        match (kind, parse_integer(raw)) {
            (IdKind::Numeric, Some(value)) => ProductId::Numeric(value),
            _ => ProductId::Text(raw.trim().to_string()),
        }
    }

    /// Build an identifier from a single raw value
    pub fn from_raw(raw: &str) -> Self {
        Self::parse(raw, IdKind::infer([raw]))
    }

    /// Compare against a caller-supplied identifier by string form
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            ProductId::Numeric(value) => value.to_string() == raw.trim(),
            ProductId::Text(text) => text == raw.trim(),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Numeric(value) => write!(f, "{}", value),
            ProductId::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for ProductId {
    fn from(raw: &str) -> Self {
        ProductId::from_raw(raw)
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        ProductId::Numeric(value)
    }
}

/// Bijection between product identifiers and dense indices `0..len`.
///
/// Indices are assigned in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct ProductIdMap {
    forward: HashMap<ProductId, usize>,
    reverse: Vec<ProductId>,
}

impl ProductIdMap {
    /// Build the map from identifiers in encounter order; repeats are ignored
    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a ProductId>,
    {
        let mut map = Self::default();
        for id in ids {
            if !map.forward.contains_key(id) {
                map.forward.insert(id.clone(), map.reverse.len());
                map.reverse.push(id.clone());
            }
        }
        map
    }

    /// Dense index for `id`
    pub fn encode(&self, id: &ProductId) -> Option<usize> {
        self.forward.get(id).copied()
    }

    /// Identifier for a dense index
    pub fn decode(&self, index: usize) -> Option<&ProductId> {
        self.reverse.get(index)
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Identifiers ordered by index
    pub fn ids(&self) -> &[ProductId] {
        &self.reverse
    }
}
