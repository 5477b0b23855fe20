//! Signature Extraction
//!
//! Reads back the signatures requested by each instruction and lays them out
//! one row per template, one slot per input. Inputs without an instruction
//! keep an empty string. No cryptographic work happens here.

use super::instruction::Instruction;
use super::template::Template;
use serde::{Deserialize, Serialize};

/// Hex signatures per template, per input. `""` marks an unsigned input.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SignatureMatrix(Vec<Vec<String>>);

impl SignatureMatrix {
    pub fn rows(&self) -> &[Vec<String>] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Vec<String>> {
        self.0
    }

    /// Number of non-empty slots across every row.
    pub fn signed_count(&self) -> usize {
        self.0
            .iter()
            .flat_map(|row| row.iter())
            .filter(|slot| !slot.is_empty())
            .count()
    }
}

/// Build the signature matrix for `templates`.
///
/// `instructions` is paired with `templates` by position; a template without
/// a matching group yields a row of empty strings.
pub fn extract(templates: &[Template], instructions: &[Vec<Instruction>]) -> SignatureMatrix {
    let rows = templates
        .iter()
        .enumerate()
        .map(|(position, template)| {
            let mut row = vec![String::new(); template.input_count()];
            for instruction in instructions.get(position).into_iter().flatten() {
                if let Some(slot) = row.get_mut(instruction.index) {
                    *slot = hex::encode(template.signature(instruction.index));
                }
            }
            row
        })
        .collect();
    SignatureMatrix(rows)
}
