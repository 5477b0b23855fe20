//! Signing Key Material
//!
//! Holds the long-term secret and the two key variants the marketplace locks
//! outputs to:
//!
//! - **raw**: the key exactly as decoded from WIF
//! - **tweaked**: `raw + H_TapTweak(xonly(raw))`, the BIP341 key-path-only
//!   output key (no script tree committed)
//!
//! Both are derived once at construction, so every signature in a session
//! uses bit-identical keys.

use super::error::{CosignError, Result};
use bitcoin::key::{PrivateKey, XOnlyPublicKey};
use bitcoin::secp256k1::{All, Keypair, PublicKey, Secp256k1};
use bitcoin::taproot::TapTweakHash;
use std::fmt;

pub struct KeyMaterial {
    secp: Secp256k1<All>,
    raw: Keypair,
    tweaked: Keypair,
}

impl KeyMaterial {
    /// Decode a WIF private key and derive both key variants.
    pub fn from_wif(wif: &str) -> Result<Self> {
        let private_key = PrivateKey::from_wif(wif.trim())?;
        Self::from_private_key(&private_key)
    }

    pub fn from_private_key(private_key: &PrivateKey) -> Result<Self> {
        let secp = Secp256k1::new();
        let raw = Keypair::from_secret_key(&secp, &private_key.inner);
        let tweaked = tap_tweak(&secp, &raw)?;
        Ok(Self { secp, raw, tweaked })
    }

    pub fn raw_key(&self) -> &Keypair {
        &self.raw
    }

    pub fn tweaked_key(&self) -> &Keypair {
        &self.tweaked
    }

    /// Pick the key for one signing instruction.
    pub fn select(&self, disable_tweak_signer: bool) -> &Keypair {
        if disable_tweak_signer {
            &self.raw
        } else {
            &self.tweaked
        }
    }

    /// 33-byte compressed encoding of the raw public key
    pub fn public_key(&self) -> PublicKey {
        self.raw.public_key()
    }

    pub fn x_only_public_key(&self) -> XOnlyPublicKey {
        self.raw.x_only_public_key().0
    }

    pub fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public_key", &self.public_key().to_string())
            .field(
                "tweaked_public_key",
                &self.tweaked.x_only_public_key().0.to_string(),
            )
            .finish_non_exhaustive()
    }
}

/// Tweak a keypair with `H_TapTweak(xonly(pubkey))`.
///
/// `add_xonly_tweak` negates the secret first when the public key has odd Y,
/// so the result matches the x-only output key a verifier derives.
fn tap_tweak(secp: &Secp256k1<All>, raw: &Keypair) -> Result<Keypair> {
    let (internal_key, _) = raw.x_only_public_key();
    let tweak = TapTweakHash::from_key_and_tweak(internal_key, None).to_scalar();
    raw.add_xonly_tweak(secp, &tweak).map_err(CosignError::Tweak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::tagged_hash;
    use bitcoin::key::TapTweak;
    use bitcoin::secp256k1::SecretKey;
    use bitcoin::Network;

    fn key_from_scalar(last_byte: u8) -> KeyMaterial {
        let mut bytes = [0u8; 32];
        bytes[31] = last_byte;
        let secret = SecretKey::from_slice(&bytes).unwrap();
        KeyMaterial::from_private_key(&PrivateKey::new(secret, Network::Bitcoin)).unwrap()
    }

    #[test]
    fn test_from_wif_round_trip() {
        let secret = SecretKey::from_slice(&[7u8; 32]).unwrap();
        let wif = PrivateKey::new(secret, Network::Bitcoin).to_wif();

        let keys = KeyMaterial::from_wif(&wif).unwrap();
        assert_eq!(keys.raw_key().secret_key(), secret);
    }

    #[test]
    fn test_from_wif_rejects_garbage() {
        let err = KeyMaterial::from_wif("not-a-wif").unwrap_err();
        assert!(matches!(err, CosignError::KeyDecode(_)));
    }

    #[test]
    fn test_generator_point_vectors() {
        let keys = key_from_scalar(1);
        assert_eq!(
            keys.x_only_public_key().to_string(),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(
            keys.tweaked_key().x_only_public_key().0.to_string(),
            "da4710964f7852695de2da025290e24af6d8c281de5a0b902b7135fd9fd74d21"
        );
    }

    #[test]
    fn test_tweak_uses_taptweak_tag_over_xonly_key() {
        let keys = key_from_scalar(2);
        let expected = tagged_hash("TapTweak", &keys.x_only_public_key().serialize());
        let computed = TapTweakHash::from_key_and_tweak(keys.x_only_public_key(), None);
        assert_eq!(computed.to_scalar().to_be_bytes(), expected);
    }

    #[test]
    fn test_tweaked_matches_output_key() {
        let keys = key_from_scalar(42);
        let (output_key, _) = keys.x_only_public_key().tap_tweak(keys.secp(), None);
        assert_eq!(
            keys.tweaked_key().x_only_public_key().0,
            output_key.to_inner()
        );
    }

    #[test]
    fn test_raw_and_tweaked_differ() {
        let keys = key_from_scalar(3);
        assert_ne!(
            keys.raw_key().x_only_public_key().0,
            keys.tweaked_key().x_only_public_key().0
        );
    }

    #[test]
    fn test_tweak_is_deterministic() {
        let a = key_from_scalar(9);
        let b = key_from_scalar(9);
        assert_eq!(a.tweaked_key().secret_bytes(), b.tweaked_key().secret_bytes());
    }

    #[test]
    fn test_select() {
        let keys = key_from_scalar(5);
        assert_eq!(keys.select(true).public_key(), keys.raw_key().public_key());
        assert_eq!(keys.select(false).public_key(), keys.tweaked_key().public_key());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keys = key_from_scalar(11);
        let secret_hex = hex::encode(keys.raw_key().secret_bytes());
        let debug = format!("{:?}", keys);
        assert!(!debug.contains(&secret_hex));
    }
}
