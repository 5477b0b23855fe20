//! PSBT builders and keys shared by the integration tests
#![allow(dead_code)]

use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::key::PrivateKey;
use bitcoin::psbt::Psbt;
use bitcoin::secp256k1::SecretKey;
use bitcoin::taproot::{LeafVersion, TaprootBuilder};
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, Network, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
};
use market_cosign::cosign::KeyMaterial;

/// Private key 1, whose public key is the curve generator
pub const GENERATOR_WIF: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";

pub fn keys(last_byte: u8) -> KeyMaterial {
    let mut bytes = [0u8; 32];
    bytes[31] = last_byte;
    let secret = SecretKey::from_slice(&bytes).unwrap();
    KeyMaterial::from_private_key(&PrivateKey::new(secret, Network::Bitcoin)).unwrap()
}

pub fn unsigned_tx(inputs: usize, lock_time: u32) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::from_consensus(lock_time),
        input: (0..inputs)
            .map(|vout| TxIn {
                previous_output: OutPoint::new(Txid::all_zeros(), vout as u32),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: Witness::new(),
            })
            .collect(),
        output: vec![TxOut {
            value: Amount::from_sat(546),
            script_pubkey: ScriptBuf::from_bytes(vec![0x51]),
        }],
    }
}

/// Every input is a key path spend of `keys`' BIP86 output.
pub fn key_path_psbt(keys: &KeyMaterial, inputs: usize) -> Psbt {
    let mut psbt = Psbt::from_unsigned_tx(unsigned_tx(inputs, 0)).unwrap();
    for input in psbt.inputs.iter_mut() {
        input.witness_utxo = Some(TxOut {
            value: Amount::from_sat(1_000),
            script_pubkey: ScriptBuf::new_p2tr(keys.secp(), keys.x_only_public_key(), None),
        });
    }
    psbt
}

/// Input 0 spends an `OP_TRUE` leaf, every other input is a key path spend.
pub fn order_psbt(keys: &KeyMaterial, inputs: usize) -> Psbt {
    let mut psbt = key_path_psbt(keys, inputs);
    psbt.unsigned_tx.lock_time = LockTime::from_consensus(840_000);

    let leaf = (ScriptBuf::from_bytes(vec![0x51]), LeafVersion::TapScript);
    let spend_info = TaprootBuilder::new()
        .add_leaf(0, leaf.0.clone())
        .unwrap()
        .finalize(keys.secp(), keys.x_only_public_key())
        .unwrap();
    let input = &mut psbt.inputs[0];
    input.witness_utxo = Some(TxOut {
        value: Amount::from_sat(1_000),
        script_pubkey: ScriptBuf::new_p2tr_tweaked(spend_info.output_key()),
    });
    input.tap_internal_key = Some(keys.x_only_public_key());
    input.tap_merkle_root = spend_info.merkle_root();
    input
        .tap_scripts
        .insert(spend_info.control_block(&leaf).unwrap(), leaf);
    psbt
}

/// A one-input key path PSBT for the generator key, hex encoded
pub fn key_path_psbt_hex() -> String {
    let keys = KeyMaterial::from_wif(GENERATOR_WIF).unwrap();
    key_path_psbt(&keys, 1).serialize_hex()
}
