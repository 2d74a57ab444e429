//! # Content Digest
//!
//! SHA-256 digests used to fingerprint derived artifacts (analysis schemas).
//! Two schemas with equal fingerprints have equal canonical JSON forms,
//! which is how idempotent derivation is checked across processes.
//!
//! Canonical form is `serde_json` output of a value whose maps are
//! `BTreeMap`s, so key order is deterministic by construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::RdslError;

/// A 32-byte SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// Raw digest bytes.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// SHA-256 of raw bytes.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    ContentDigest {
        bytes: hasher.finalize().into(),
    }
}

/// SHA-256 of the canonical JSON form of `value`.
///
/// # Errors
///
/// Returns `RdslError::Serialization` if `value` cannot be serialized.
pub fn canonical_digest(value: &impl Serialize) -> Result<ContentDigest, RdslError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(sha256_digest(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_digest(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn display_carries_algorithm_prefix() {
        let d = sha256_digest(b"abc");
        assert!(d.to_string().starts_with("sha256:"));
        assert_eq!(d.to_string().len(), "sha256:".len() + 64);
    }

    #[test]
    fn canonical_digest_ignores_insertion_order() {
        let mut a = BTreeMap::new();
        a.insert("x", 1);
        a.insert("y", 2);
        let mut b = BTreeMap::new();
        b.insert("y", 2);
        b.insert("x", 1);
        assert_eq!(canonical_digest(&a).unwrap(), canonical_digest(&b).unwrap());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Digesting is deterministic.
        #[test]
        fn digest_deterministic(data in prop::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(sha256_digest(&data), sha256_digest(&data));
        }

        /// Hex rendering is always 64 lowercase hex characters.
        #[test]
        fn hex_is_64_chars(data in prop::collection::vec(any::<u8>(), 0..64)) {
            let hex = sha256_digest(&data).to_hex();
            prop_assert_eq!(hex.len(), 64);
            prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
