use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NetworkError, NetworkResult};

// ============================================================================
// Identity
// ============================================================================

/// Canonical lookup key for a generator or house name.
///
/// Names are unique up to ASCII/Unicode case; the display name keeps the casing
/// it was first declared with, while every map lookup goes through this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NameKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a generator inside one [`Network`](super::Network).
///
/// Entities are never removed, so a handle stays valid for the lifetime of the
/// network that issued it. Handles from another network are meaningless, and
/// the `Network` accessors taking a handle panic when one is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneratorId(pub(crate) usize);

/// Handle to a house inside one [`Network`](super::Network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseId(pub(crate) usize);

impl GeneratorId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl HouseId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Validate a display name: trimmed, non-empty, and free of the characters the
/// text format uses as delimiters.
pub(crate) fn validate_name(name: &str) -> NetworkResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NetworkError::InvalidAttribute("name must not be empty".into()));
    }
    if trimmed.contains(['(', ')', ',']) {
        return Err(NetworkError::InvalidAttribute(format!(
            "name '{}' must not contain '(', ')' or ','",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_is_case_insensitive() {
        assert_eq!(NameKey::new("G1"), NameKey::new("g1"));
        assert_eq!(NameKey::new(" Maison "), NameKey::new("maison"));
        assert_ne!(NameKey::new("G1"), NameKey::new("G2"));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  M1 ").unwrap(), "M1");
        assert!(validate_name("   ").is_err());
        assert!(validate_name("M(1)").is_err());
        assert!(validate_name("A,B").is_err());
    }
}
