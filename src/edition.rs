//! Edition identifiers and their total order
//!
//! An edition is an opaque dotted string (e.g. `"2023"`, `"2023.1"`,
//! `"99997_TEST"`). The order splits both sides on `.` and compares
//! component-wise: a shorter component sorts before a longer one, equal
//! lengths fall back to lexicographic comparison, and a string that is a
//! strict prefix of another sorts first. This gives `"2" < "10"` and
//! `"2023" < "2023.1"`.
//!
//! Every sort, upper-bound search, and range check in this crate goes
//! through this order; mixing it with plain string comparison would
//! silently corrupt the defaults table.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A named revision of the surrounding schema language
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edition(String);

impl Edition {
    /// Create an edition from any string-like value
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the raw edition string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Edition {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Edition {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialOrd for Edition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edition {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs: Vec<&str> = self.0.split('.').collect();
        let rhs: Vec<&str> = other.0.split('.').collect();
        for (a, b) in lhs.iter().zip(rhs.iter()) {
            let by_component = a.len().cmp(&b.len()).then_with(|| a.cmp(b));
            if by_component != Ordering::Equal {
                return by_component;
            }
        }
        // Equal up to the shorter side; the extra components make the
        // longer string more recent.
        lhs.len().cmp(&rhs.len())
    }
}
