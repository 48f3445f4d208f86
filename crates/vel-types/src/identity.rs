use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque voter identity.
///
/// A `VoterId` is derived deterministically from externally-authenticated
/// address material (a wallet address or equivalent) using BLAKE3. The same
/// material always produces the same identity. The contract never inspects
/// the material itself — authentication happens before a request reaches
/// the ledger, and the `VoterId` is all that crosses the boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoterId {
    hash: [u8; 32],
}

impl VoterId {
    /// Derive a `VoterId` from raw address bytes.
    pub fn from_address(address: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vel-voter-v1:");
        hasher.update(b"addr:");
        hasher.update(address);
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Derive a `VoterId` from a human-readable label.
    ///
    /// Convenience for tests, demos, and the CLI, where identities are
    /// named ("alice", "bob") rather than addressed. Labels and addresses
    /// live in separate derivation domains and never collide.
    pub fn from_label(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vel-voter-v1:");
        hasher.update(b"label:");
        hasher.update(label.as_bytes());
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Create a random `VoterId` for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::from_address(&bytes)
    }

    /// The raw 32-byte identity hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("vt:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `vt:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("vt:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }

    /// Create from a raw 32-byte hash. Use the derive constructors for
    /// production code.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoterId({})", self.short_id())
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let id1 = VoterId::from_address(&[42u8; 20]);
        let id2 = VoterId::from_address(&[42u8; 20]);
        assert_eq!(id1, id2);
    }

    #[test]
    fn different_addresses_produce_different_ids() {
        let id1 = VoterId::from_address(&[1u8; 20]);
        let id2 = VoterId::from_address(&[2u8; 20]);
        assert_ne!(id1, id2);
    }

    #[test]
    fn labels_and_addresses_never_collide() {
        let label = VoterId::from_label("alice");
        let addr = VoterId::from_address(b"alice");
        assert_ne!(label, addr);
    }

    #[test]
    fn ephemeral_ids_are_unique() {
        let id1 = VoterId::ephemeral();
        let id2 = VoterId::ephemeral();
        assert_ne!(id1, id2);
    }

    #[test]
    fn short_id_format() {
        let id = VoterId::from_label("carol");
        let short = id.short_id();
        assert!(short.starts_with("vt:"));
        assert_eq!(short.len(), 11); // "vt:" + 8 hex chars
    }

    #[test]
    fn hex_roundtrip() {
        let id = VoterId::from_label("dave");
        let parsed = VoterId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn hex_roundtrip_with_prefix() {
        let id = VoterId::from_label("dave");
        let prefixed = format!("vt:{}", id.to_hex());
        let parsed = VoterId::from_hex(&prefixed).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_hex_rejects_short_input() {
        let err = VoterId::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2,
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(matches!(
            VoterId::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let id = VoterId::from_label("erin");
        let json = serde_json::to_string(&id).unwrap();
        let parsed: VoterId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    proptest! {
        #[test]
        fn hex_roundtrip_any_raw(hash in prop::array::uniform32(any::<u8>())) {
            let id = VoterId::from_raw(hash);
            prop_assert_eq!(VoterId::from_hex(&id.to_hex()).unwrap(), id);
        }
    }
}
