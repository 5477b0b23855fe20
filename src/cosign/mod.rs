//! Transaction Co-signing Engine
//!
//! Signs the partially signed templates handed back by the marketplace:
//!
//! - **keys**: raw and taproot tweaked signing keys from one WIF secret
//! - **template** / **instruction**: parsed PSBTs and per-input signing requests
//! - **sighash**: key path, script path and legacy sighash resolution
//! - **signer**: writes each signature into the matching PSBT slot
//! - **extract**: reads the requested signatures back as hex
//! - **orchestrator**: runs a whole batch in order

pub mod error;
pub mod extract;
pub mod instruction;
pub mod keys;
pub mod orchestrator;
pub mod sighash;
pub mod signer;
pub mod template;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{CosignError, Result};
pub use extract::{extract, SignatureMatrix};
pub use instruction::Instruction;
pub use keys::KeyMaterial;
pub use orchestrator::{co_sign, co_sign_encoded};
pub use sighash::{leaf_hash, resolve, ResolvedSighash};
pub use signer::sign;
pub use template::{SpendKind, TapLeaf, Template};
