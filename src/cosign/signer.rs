//! Input Signing
//!
//! Signs one instruction's input and stores the signature in the slot that
//! matches its spend kind. Key path and script path spends get BIP340 Schnorr
//! signatures with zero aux randomness; legacy spends get RFC6979 ECDSA. Both
//! are deterministic, so signing the same input twice rewrites an identical
//! signature.

use super::error::Result;
use super::instruction::Instruction;
use super::keys::KeyMaterial;
use super::sighash::{resolve, ResolvedSighash};
use super::template::Template;
use bitcoin::secp256k1::Message;
use bitcoin::{ecdsa, taproot, PublicKey};
use tracing::debug;

/// Sign the input named by `instruction`, mutating only that input.
pub fn sign(template: &mut Template, instruction: &Instruction, keys: &KeyMaterial) -> Result<()> {
    let resolved = resolve(template, instruction.index)?;
    let keypair = keys.select(instruction.disable_tweak_signer);
    let secp = keys.secp();
    let msg = Message::from_digest(resolved.digest());

    debug!(
        "template {} input {}: sighash {} (tweaked: {})",
        template.position(),
        instruction.index,
        hex::encode(resolved.digest()),
        !instruction.disable_tweak_signer
    );

    let input = template.input_mut(instruction.index)?;
    match resolved {
        ResolvedSighash::KeyPath { sighash_type, .. } => {
            let signature = secp.sign_schnorr_no_aux_rand(&msg, keypair);
            input.tap_key_sig = Some(taproot::Signature {
                signature,
                sighash_type,
            });
        }
        ResolvedSighash::ScriptPath {
            sighash_type,
            leaf_hash,
            ..
        } => {
            let signature = secp.sign_schnorr_no_aux_rand(&msg, keypair);
            let (x_only, _) = keypair.x_only_public_key();
            input.tap_script_sigs.insert(
                (x_only, leaf_hash),
                taproot::Signature {
                    signature,
                    sighash_type,
                },
            );
        }
        ResolvedSighash::Legacy { sighash_type, .. } => {
            let signature = secp.sign_ecdsa(&msg, &keypair.secret_key());
            input.partial_sigs.insert(
                PublicKey::new(keypair.public_key()),
                ecdsa::Signature {
                    signature,
                    sighash_type,
                },
            );
        }
    }
    template.record_signer(instruction.index, keypair.public_key());

    Ok(())
}
