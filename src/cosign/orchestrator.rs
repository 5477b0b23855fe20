//! Co-sign Orchestration
//!
//! Drives a whole batch: every template in order, every instruction of a
//! template in order, then one extraction pass over the signed batch. Any
//! error aborts the batch before a matrix is produced.

use super::error::{CosignError, Result};
use super::extract::{extract, SignatureMatrix};
use super::instruction::Instruction;
use super::keys::KeyMaterial;
use super::signer::sign;
use super::template::Template;
use tracing::info;

/// Sign `templates` in place as directed by `instructions` and return the
/// requested signatures.
///
/// `instructions[i]` belongs to `templates[i]`; the group counts must match.
pub fn co_sign(
    keys: &KeyMaterial,
    templates: &mut [Template],
    instructions: &[Vec<Instruction>],
) -> Result<SignatureMatrix> {
    if templates.len() != instructions.len() {
        return Err(CosignError::InstructionCountMismatch {
            templates: templates.len(),
            instructions: instructions.len(),
        });
    }

    for (template, group) in templates.iter_mut().zip(instructions) {
        info!(
            "Signing template {} ({} inputs, locktime {}, {} instructions)",
            template.position(),
            template.input_count(),
            template.psbt().unsigned_tx.lock_time,
            group.len()
        );
        for instruction in group {
            sign(template, instruction, keys)?;
        }
    }

    Ok(extract(templates, instructions))
}

/// Parse hex-serialized templates, then [`co_sign`] them.
pub fn co_sign_encoded(
    keys: &KeyMaterial,
    psbt_hexes: &[String],
    instructions: &[Vec<Instruction>],
) -> Result<SignatureMatrix> {
    let mut templates = psbt_hexes
        .iter()
        .enumerate()
        .map(|(position, psbt_hex)| Template::from_hex(position, psbt_hex))
        .collect::<Result<Vec<_>>>()?;
    co_sign(keys, &mut templates, instructions)
}
