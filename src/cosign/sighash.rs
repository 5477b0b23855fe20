//! Sighash Resolution
//!
//! Decides, per input, which message gets signed:
//!
//! - **script path**: BIP341 script spend sighash committing to the leaf hash
//!   `H_TapLeaf(version || compactSize(len) || script)`
//! - **key path**: BIP341 key spend sighash
//! - **legacy**: BIP143 (segwit v0) or pre-segwit sighash for ECDSA
//!
//! The transaction digest itself comes from `bitcoin`'s `SighashCache`; this
//! module picks the branch and supplies the leaf commitment.

use super::error::{CosignError, Result};
use super::template::{SpendKind, TapLeaf, Template};
use crate::crypto::{serialize_leaf_script, tagged_hash};
use bitcoin::hashes::Hash;
use bitcoin::sighash::{EcdsaSighashType, Prevouts, SighashCache, TapSighash, TapSighashType};
use bitcoin::taproot::TapLeafHash;
use bitcoin::TxOut;
use tracing::debug;

/// The message to sign for one input, tagged with the spend branch it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSighash {
    KeyPath {
        sighash: TapSighash,
        sighash_type: TapSighashType,
    },
    ScriptPath {
        sighash: TapSighash,
        sighash_type: TapSighashType,
        leaf_hash: TapLeafHash,
    },
    Legacy {
        sighash: [u8; 32],
        sighash_type: EcdsaSighashType,
    },
}

impl ResolvedSighash {
    pub fn digest(&self) -> [u8; 32] {
        match self {
            ResolvedSighash::KeyPath { sighash, .. } => sighash.to_byte_array(),
            ResolvedSighash::ScriptPath { sighash, .. } => sighash.to_byte_array(),
            ResolvedSighash::Legacy { sighash, .. } => *sighash,
        }
    }
}

/// Taproot leaf hash of a script leaf
pub fn leaf_hash(leaf: &TapLeaf) -> TapLeafHash {
    let mut payload = vec![leaf.version.to_consensus()];
    payload.extend_from_slice(&serialize_leaf_script(&leaf.script));
    TapLeafHash::from_byte_array(tagged_hash("TapLeaf", &payload))
}

/// Compute the sighash for input `index` of `template`.
pub fn resolve(template: &Template, index: usize) -> Result<ResolvedSighash> {
    template.check_index(index)?;
    let kind = template
        .spend_kind(index)
        .ok_or(CosignError::InputIndexOutOfRange {
            template: template.position(),
            index,
            inputs: template.input_count(),
        })?;

    match kind {
        SpendKind::ScriptPath { leaf: Some(leaf) } => {
            let leaf_hash = leaf_hash(leaf);
            debug!(
                "template {} input {}: script path leaf hash {}",
                template.position(),
                index,
                leaf_hash
            );
            let sighash_type = taproot_sighash_type(template, index)?;
            let sighash = taproot_sighash(template, index, sighash_type, Some(leaf_hash))?;
            Ok(ResolvedSighash::ScriptPath {
                sighash,
                sighash_type,
                leaf_hash,
            })
        }
        SpendKind::ScriptPath { leaf: None } => Err(CosignError::MissingWitnessData {
            template: template.position(),
            input: index,
        }),
        SpendKind::KeyPath => {
            let sighash_type = taproot_sighash_type(template, index)?;
            let sighash = taproot_sighash(template, index, sighash_type, None)?;
            Ok(ResolvedSighash::KeyPath {
                sighash,
                sighash_type,
            })
        }
        SpendKind::Legacy => legacy_sighash(template, index),
    }
}

fn taproot_sighash_type(template: &Template, index: usize) -> Result<TapSighashType> {
    match template.psbt().inputs[index].sighash_type {
        None => Ok(TapSighashType::Default),
        Some(ty) => ty
            .taproot_hash_ty()
            .map_err(|e| CosignError::InvalidSighashType {
                template: template.position(),
                input: index,
                reason: e.to_string(),
            }),
    }
}

fn ecdsa_sighash_type(template: &Template, index: usize) -> Result<EcdsaSighashType> {
    match template.psbt().inputs[index].sighash_type {
        None => Ok(EcdsaSighashType::All),
        Some(ty) => ty
            .ecdsa_hash_ty()
            .map_err(|e| CosignError::InvalidSighashType {
                template: template.position(),
                input: index,
                reason: e.to_string(),
            }),
    }
}

fn spent_output(template: &Template, index: usize) -> Result<TxOut> {
    template
        .spent_output(index)
        .cloned()
        .ok_or(CosignError::MissingUtxo {
            template: template.position(),
            input: index,
        })
}

fn taproot_sighash(
    template: &Template,
    index: usize,
    sighash_type: TapSighashType,
    leaf_hash: Option<TapLeafHash>,
) -> Result<TapSighash> {
    let anyone_can_pay = matches!(
        sighash_type,
        TapSighashType::AllPlusAnyoneCanPay
            | TapSighashType::NonePlusAnyoneCanPay
            | TapSighashType::SinglePlusAnyoneCanPay
    );

    let all_utxos: Vec<TxOut>;
    let prevouts = if anyone_can_pay {
        Prevouts::One(index, spent_output(template, index)?)
    } else {
        all_utxos = (0..template.input_count())
            .map(|i| spent_output(template, i))
            .collect::<Result<_>>()?;
        Prevouts::All(all_utxos.as_slice())
    };

    let mut cache = SighashCache::new(&template.psbt().unsigned_tx);
    let sighash = match leaf_hash {
        Some(leaf_hash) => {
            cache.taproot_script_spend_signature_hash(index, &prevouts, leaf_hash, sighash_type)
        }
        None => cache.taproot_key_spend_signature_hash(index, &prevouts, sighash_type),
    };
    sighash.map_err(|e| CosignError::Sighash {
        template: template.position(),
        input: index,
        reason: e.to_string(),
    })
}

fn legacy_sighash(template: &Template, index: usize) -> Result<ResolvedSighash> {
    let sighash_type = ecdsa_sighash_type(template, index)?;
    let utxo = spent_output(template, index)?;
    let input = &template.psbt().inputs[index];
    let sighash_err = |reason: String| CosignError::Sighash {
        template: template.position(),
        input: index,
        reason,
    };

    let mut cache = SighashCache::new(&template.psbt().unsigned_tx);
    let sighash = if utxo.script_pubkey.is_p2wpkh() {
        cache
            .p2wpkh_signature_hash(index, &utxo.script_pubkey, utxo.value, sighash_type)
            .map_err(|e| sighash_err(e.to_string()))?
            .to_byte_array()
    } else if let Some(witness_script) = &input.witness_script {
        cache
            .p2wsh_signature_hash(index, witness_script, utxo.value, sighash_type)
            .map_err(|e| sighash_err(e.to_string()))?
            .to_byte_array()
    } else if utxo.script_pubkey.is_p2wsh()
        || input.redeem_script.as_ref().is_some_and(|s| s.is_p2wsh())
    {
        return Err(CosignError::MissingWitnessScript {
            template: template.position(),
            input: index,
        });
    } else if let Some(redeem_script) = input.redeem_script.as_ref().filter(|s| s.is_p2wpkh()) {
        cache
            .p2wpkh_signature_hash(index, redeem_script, utxo.value, sighash_type)
            .map_err(|e| sighash_err(e.to_string()))?
            .to_byte_array()
    } else {
        let script_code = input.redeem_script.as_ref().unwrap_or(&utxo.script_pubkey);
        cache
            .legacy_signature_hash(index, script_code, sighash_type.to_u32())
            .map_err(|e| sighash_err(e.to_string()))?
            .to_byte_array()
    };

    Ok(ResolvedSighash::Legacy {
        sighash,
        sighash_type,
    })
}
