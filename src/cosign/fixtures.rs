//! Deterministic PSBT fixtures shared by the engine's unit tests.

use super::keys::KeyMaterial;
use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::key::{CompressedPublicKey, PrivateKey};
use bitcoin::psbt::Psbt;
use bitcoin::secp256k1::SecretKey;
use bitcoin::taproot::{LeafVersion, TaprootBuilder, TaprootSpendInfo};
use bitcoin::transaction::Version;
use bitcoin::{Amount, Network, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};

pub const INPUT_VALUE: u64 = 10_000;

/// Key whose secret scalar is `last_byte` (1 gives the generator point)
pub fn keys(last_byte: u8) -> KeyMaterial {
    let mut bytes = [0u8; 32];
    bytes[31] = last_byte;
    let secret = SecretKey::from_slice(&bytes).unwrap();
    KeyMaterial::from_private_key(&PrivateKey::new(secret, Network::Bitcoin)).unwrap()
}

pub fn op_true() -> ScriptBuf {
    ScriptBuf::from_bytes(vec![0x51])
}

pub fn unsigned_tx(inputs: usize) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: (0..inputs)
            .map(|vout| TxIn {
                previous_output: OutPoint::new(Txid::all_zeros(), vout as u32),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: Witness::new(),
            })
            .collect(),
        output: vec![TxOut {
            value: Amount::from_sat(INPUT_VALUE * inputs as u64 / 2),
            script_pubkey: op_true(),
        }],
    }
}

pub fn op_true_spend_info(keys: &KeyMaterial) -> TaprootSpendInfo {
    TaprootBuilder::new()
        .add_leaf(0, op_true())
        .unwrap()
        .finalize(keys.secp(), keys.x_only_public_key())
        .unwrap()
}

fn key_path_utxo(keys: &KeyMaterial) -> TxOut {
    TxOut {
        value: Amount::from_sat(INPUT_VALUE),
        script_pubkey: ScriptBuf::new_p2tr(keys.secp(), keys.x_only_public_key(), None),
    }
}

/// Every input is a key path spend of the key's own P2TR output
pub fn key_path_psbt(keys: &KeyMaterial, inputs: usize) -> Psbt {
    let mut psbt = Psbt::from_unsigned_tx(unsigned_tx(inputs)).unwrap();
    for input in psbt.inputs.iter_mut() {
        input.witness_utxo = Some(key_path_utxo(keys));
        input.tap_internal_key = Some(keys.x_only_public_key());
    }
    psbt
}

/// Every input spends the single `OP_TRUE` leaf of a tree keyed to `keys`
pub fn script_path_psbt(keys: &KeyMaterial, inputs: usize) -> Psbt {
    let mut psbt = Psbt::from_unsigned_tx(unsigned_tx(inputs)).unwrap();
    for index in 0..inputs {
        attach_op_true_leaf(keys, &mut psbt, index);
    }
    psbt
}

/// Input 0 spends the `OP_TRUE` leaf; the remaining inputs are key path spends
pub fn mixed_psbt(keys: &KeyMaterial, inputs: usize) -> Psbt {
    let mut psbt = key_path_psbt(keys, inputs);
    attach_op_true_leaf(keys, &mut psbt, 0);
    psbt
}

pub fn attach_op_true_leaf(keys: &KeyMaterial, psbt: &mut Psbt, index: usize) {
    let spend_info = op_true_spend_info(keys);
    let leaf = (op_true(), LeafVersion::TapScript);
    let control_block = spend_info.control_block(&leaf).unwrap();

    let input = &mut psbt.inputs[index];
    input.witness_utxo = Some(TxOut {
        value: Amount::from_sat(INPUT_VALUE),
        script_pubkey: ScriptBuf::new_p2tr_tweaked(spend_info.output_key()),
    });
    input.tap_internal_key = Some(keys.x_only_public_key());
    input.tap_merkle_root = spend_info.merkle_root();
    input.tap_scripts.insert(control_block, leaf);
}

/// Single native segwit v0 input paying to the raw key
pub fn p2wpkh_psbt(keys: &KeyMaterial) -> Psbt {
    let mut psbt = Psbt::from_unsigned_tx(unsigned_tx(1)).unwrap();
    let wpkh = CompressedPublicKey(keys.public_key()).wpubkey_hash();
    psbt.inputs[0].witness_utxo = Some(TxOut {
        value: Amount::from_sat(INPUT_VALUE),
        script_pubkey: ScriptBuf::new_p2wpkh(&wpkh),
    });
    psbt
}
