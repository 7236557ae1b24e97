// Record identity
//
// Backends assign either numeric or string identifiers; the controller
// never cares which. `RecordId` keeps both forms and round-trips
// through the string representation used in query parameters and URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A record's unique identifier, numeric or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Whether this id matches its query-parameter string form.
    pub fn matches_str(&self, s: &str) -> bool {
        match self {
            Self::Int(n) => s.parse::<i64>() == Ok(*n),
            Self::Str(v) => v == s,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Any entity exposed through CRUD operations.
///
/// Attributes beyond the id are resource-specific and opaque to the
/// controller; the table model reads them through the record's JSON
/// projection instead.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> RecordId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_both_forms() {
        assert_eq!(RecordId::from(7).to_string(), "7");
        assert_eq!(RecordId::from("a-3f").to_string(), "a-3f");
    }

    #[test]
    fn matches_str_compares_canonical_forms() {
        assert!(RecordId::from(7).matches_str("7"));
        assert!(!RecordId::from(7).matches_str("08"));
        assert!(RecordId::from("x").matches_str("x"));
    }

    #[test]
    fn serde_untagged_keeps_numeric_ids_numeric() {
        let id: RecordId = serde_json::from_str("42").expect("parse int id");
        assert_eq!(id, RecordId::Int(42));
        let id: RecordId = serde_json::from_str("\"42\"").expect("parse str id");
        assert_eq!(id, RecordId::Str("42".into()));
    }
}
