//! Checksum utilities for compiled artifact integrity

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 checksum over a serialized artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, data: &[u8]) -> bool {
        let computed = Self::from_bytes(data);
        self.0 == computed.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Checksum {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = br#"{"minimum_edition":"2023"}"#;
        let checksum1 = Checksum::from_bytes(content);
        let checksum2 = Checksum::from_bytes(content);
        assert_eq!(checksum1, checksum2);
    }

    #[test]
    fn test_checksum_different_content() {
        let checksum1 = Checksum::from_bytes(b"row-a");
        let checksum2 = Checksum::from_bytes(b"row-b");
        assert_ne!(checksum1, checksum2);
    }

    #[test]
    fn test_checksum_verification() {
        let content = b"compiled defaults";
        let checksum = Checksum::from_bytes(content);
        assert!(checksum.verify(content));
        assert!(!checksum.verify(b"different content"));
    }
}
