use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum accepted report hash length in bytes.
///
/// Generous enough for any common digest (SHA-512 is 64 bytes); anything
/// longer is not a hash.
pub const MAX_REPORT_HASH_LEN: usize = 64;

/// Opaque, externally computed digest over the final tally.
///
/// The report service computes the digest; the ledger only stores it,
/// exactly once, at closure. Well-formedness here means non-empty and at
/// most [`MAX_REPORT_HASH_LEN`] bytes — the contents are never verified.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportHash(Vec<u8>);

impl ReportHash {
    /// Accept digest bytes, rejecting empty and oversized input.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, TypeError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TypeError::EmptyHash);
        }
        if bytes.len() > MAX_REPORT_HASH_LEN {
            return Err(TypeError::OversizedHash {
                max: MAX_REPORT_HASH_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// Parse a hex-encoded digest.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Compute a BLAKE3 digest over `data`.
    ///
    /// Convenience for tests and local drivers that stand in for the
    /// report service.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vel-report-v1:");
        hasher.update(data);
        Self(hasher.finalize().as_bytes().to_vec())
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex-encoded digest.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for ReportHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReportHash({}…)", hex::encode(&self.0[..self.0.len().min(4)]))
    }
}

impl fmt::Display for ReportHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_digest_bytes() {
        let hash = ReportHash::from_bytes(vec![0xa3, 0xb2]).unwrap();
        assert_eq!(hash.as_bytes(), &[0xa3, 0xb2]);
    }

    #[test]
    fn rejects_empty_bytes() {
        assert_eq!(ReportHash::from_bytes(vec![]).unwrap_err(), TypeError::EmptyHash);
    }

    #[test]
    fn rejects_oversized_bytes() {
        let err = ReportHash::from_bytes(vec![0u8; 65]).unwrap_err();
        assert_eq!(
            err,
            TypeError::OversizedHash {
                max: MAX_REPORT_HASH_LEN,
                actual: 65,
            }
        );
    }

    #[test]
    fn hex_roundtrip() {
        let hash = ReportHash::from_hex("a3b2c1").unwrap();
        assert_eq!(hash.to_hex(), "a3b2c1");
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(ReportHash::from_hex("zzz"), Err(TypeError::InvalidHex(_))));
        assert_eq!(ReportHash::from_hex("").unwrap_err(), TypeError::EmptyHash);
    }

    #[test]
    fn digest_is_deterministic_and_32_bytes() {
        let h1 = ReportHash::digest(b"tally: 3 vs 2");
        let h2 = ReportHash::digest(b"tally: 3 vs 2");
        assert_eq!(h1, h2);
        assert_eq!(h1.as_bytes().len(), 32);
        assert_ne!(h1, ReportHash::digest(b"tally: 2 vs 3"));
    }

    #[test]
    fn serde_roundtrip() {
        let hash = ReportHash::digest(b"report");
        let json = serde_json::to_string(&hash).unwrap();
        let parsed: ReportHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, parsed);
    }
}
