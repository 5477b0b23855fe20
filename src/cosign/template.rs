//! Partially Signed Transaction Templates
//!
//! A template wraps a parsed PSBT together with the spend kind of each of its
//! inputs. The spend kind is decided once here, so signing and extraction
//! never re-inspect which optional PSBT fields happen to be populated.

use super::error::{CosignError, Result};
use bitcoin::psbt::{Input, Psbt};
use bitcoin::secp256k1::PublicKey;
use bitcoin::taproot::LeafVersion;
use bitcoin::{ScriptBuf, TxOut};

/// Tapscript leaf revealed by a script path spend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapLeaf {
    pub script: ScriptBuf,
    pub version: LeafVersion,
}

/// How an input is spent, which decides the sighash, the signature scheme and
/// the slot the signature lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendKind {
    /// Taproot key path: Schnorr signature in `tap_key_sig`
    KeyPath,
    /// Taproot script path: Schnorr signature in `tap_script_sigs`.
    /// `leaf` is `None` when key origins commit to a leaf the input does not
    /// carry and no key path is available.
    ScriptPath { leaf: Option<TapLeaf> },
    /// Pre-taproot spend: ECDSA signature in `partial_sigs`
    Legacy,
}

#[derive(Debug, Clone)]
pub struct Template {
    position: usize,
    psbt: Psbt,
    kinds: Vec<SpendKind>,
    /// Key that last signed each input through this template
    signers: Vec<Option<PublicKey>>,
}

impl Template {
    /// Wrap a parsed PSBT sitting at `position` in its batch.
    pub fn from_psbt(position: usize, psbt: Psbt) -> Self {
        let kinds = (0..psbt.inputs.len())
            .map(|index| classify(&psbt, index))
            .collect();
        let signers = vec![None; psbt.inputs.len()];
        Self {
            position,
            psbt,
            kinds,
            signers,
        }
    }

    /// Parse a hex-serialized PSBT.
    pub fn from_hex(position: usize, psbt_hex: &str) -> Result<Self> {
        let bytes = hex::decode(psbt_hex.trim()).map_err(|e| CosignError::Encoding {
            template: position,
            reason: e.to_string(),
        })?;
        let psbt = Psbt::deserialize(&bytes).map_err(|e| CosignError::Encoding {
            template: position,
            reason: e.to_string(),
        })?;
        Ok(Self::from_psbt(position, psbt))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn psbt(&self) -> &Psbt {
        &self.psbt
    }

    pub fn into_psbt(self) -> Psbt {
        self.psbt
    }

    pub fn input_count(&self) -> usize {
        self.psbt.inputs.len()
    }

    pub fn spend_kind(&self, index: usize) -> Option<&SpendKind> {
        self.kinds.get(index)
    }

    /// Output spent by input `index`, from `witness_utxo` or the previous transaction.
    pub fn spent_output(&self, index: usize) -> Option<&TxOut> {
        spent_output(&self.psbt, index)
    }

    pub(crate) fn input_mut(&mut self, index: usize) -> Result<&mut Input> {
        let inputs = self.psbt.inputs.len();
        let template = self.position;
        self.psbt
            .inputs
            .get_mut(index)
            .ok_or(CosignError::InputIndexOutOfRange {
                template,
                index,
                inputs,
            })
    }

    pub(crate) fn record_signer(&mut self, index: usize, signer: PublicKey) {
        if let Some(slot) = self.signers.get_mut(index) {
            *slot = Some(signer);
        }
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.input_count() {
            Ok(())
        } else {
            Err(CosignError::InputIndexOutOfRange {
                template: self.position,
                index,
                inputs: self.input_count(),
            })
        }
    }

    /// Signature bytes stored for input `index`.
    ///
    /// Reads the key path slot first, then a script path signature, then a
    /// partial signature. Within a list, the entry of the key that signed the
    /// input through this template wins over other parties' entries; without
    /// one the first entry is taken. Empty when nothing is stored.
    pub fn signature(&self, index: usize) -> Vec<u8> {
        let Some(input) = self.psbt.inputs.get(index) else {
            return Vec::new();
        };
        if let Some(sig) = input.tap_key_sig {
            return sig.to_vec();
        }

        let signer = self.signers.get(index).copied().flatten();
        let own_script_sig = signer.and_then(|key| {
            let (x_only, _) = key.x_only_public_key();
            input
                .tap_script_sigs
                .iter()
                .find(|((sig_key, _), _)| *sig_key == x_only)
                .map(|(_, sig)| sig)
        });
        if let Some(sig) = own_script_sig.or_else(|| input.tap_script_sigs.values().next()) {
            return sig.to_vec();
        }

        signer
            .and_then(|key| input.partial_sigs.get(&bitcoin::PublicKey::new(key)))
            .or_else(|| input.partial_sigs.values().next())
            .map(|sig| sig.to_vec())
            .unwrap_or_default()
    }
}

fn spent_output(psbt: &Psbt, index: usize) -> Option<&TxOut> {
    let input = psbt.inputs.get(index)?;
    if let Some(utxo) = &input.witness_utxo {
        return Some(utxo);
    }
    let prevout = psbt.unsigned_tx.input.get(index)?.previous_output;
    input
        .non_witness_utxo
        .as_ref()?
        .output
        .get(prevout.vout as usize)
}

fn classify(psbt: &Psbt, index: usize) -> SpendKind {
    let input = &psbt.inputs[index];

    if let Some((_, (script, version))) = input.tap_scripts.iter().next() {
        return SpendKind::ScriptPath {
            leaf: Some(TapLeaf {
                script: script.clone(),
                version: *version,
            }),
        };
    }

    // Leaf hashes on some origin only force a script path when no key path
    // is on offer: origins may list leaves of other keys in the tree.
    let commits_to_leaf = input
        .tap_key_origins
        .values()
        .any(|(leaf_hashes, _)| !leaf_hashes.is_empty());
    let key_path_origin = input
        .tap_key_origins
        .values()
        .any(|(leaf_hashes, _)| leaf_hashes.is_empty());
    if commits_to_leaf && input.tap_internal_key.is_none() && !key_path_origin {
        return SpendKind::ScriptPath { leaf: None };
    }

    let spends_p2tr = spent_output(psbt, index)
        .map(|utxo| utxo.script_pubkey.is_p2tr())
        .unwrap_or(false);
    if input.tap_internal_key.is_some() || input.tap_merkle_root.is_some() || spends_p2tr {
        return SpendKind::KeyPath;
    }

    SpendKind::Legacy
}
