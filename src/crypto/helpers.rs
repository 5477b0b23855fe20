//! Cryptographic Helper Functions
//!
//! ## Functions
//!
//! - **Tagged hash**: BIP340-style tagged hashing for Bitcoin protocols
//! - **Leaf serialization**: compact-size prefixed script encoding used by `TapLeaf`

use bitcoin::consensus::encode;
use bitcoin::Script;
use sha2::{Digest, Sha256};

// ============================================================================
// Tagged Hash (BIP340)
// ============================================================================

/// Compute BIP340 tagged hash: SHA256(SHA256(tag) || SHA256(tag) || data)
///
/// This is the standard tagged hash construction used throughout Bitcoin's
/// Taproot/Schnorr implementation for domain separation.
///
/// # Examples
/// - "TapTweak" tag for Taproot key tweaking
/// - "TapLeaf" tag for script leaf commitments
pub fn tagged_hash(tag: &str, data: &[u8]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher.update(data);
    hasher.finalize().into()
}

// ============================================================================
// Leaf Serialization
// ============================================================================

/// Serialize a script with its minimal compact-size length prefix.
///
/// 1 byte for lengths below 0xfd, `0xfd` + u16 LE up to 0xffff, and so on.
pub fn serialize_leaf_script(script: &Script) -> Vec<u8> {
    encode::serialize(&script.to_owned())
}
