use thiserror::Error;

/// Errors raised by the co-signing engine.
///
/// Every variant is fatal for the invocation that raised it; the engine never
/// retries and never returns a partially populated signature matrix.
#[derive(Debug, Error)]
pub enum CosignError {
    #[error("failed to decode private key: {0}")]
    KeyDecode(#[from] bitcoin::key::FromWifError),

    #[error("failed to derive taproot tweaked key: {0}")]
    Tweak(bitcoin::secp256k1::Error),

    #[error("template {template}: malformed encoding: {reason}")]
    Encoding { template: usize, reason: String },

    #[error("template {template} input {input}: script path spend has no leaf script attached")]
    MissingWitnessData { template: usize, input: usize },

    #[error("template {template} input {input}: P2WSH spend has no witness script attached")]
    MissingWitnessScript { template: usize, input: usize },

    #[error("template {template}: input index {index} out of range ({inputs} inputs)")]
    InputIndexOutOfRange {
        template: usize,
        index: usize,
        inputs: usize,
    },

    #[error("got {instructions} instruction groups for {templates} templates")]
    InstructionCountMismatch { templates: usize, instructions: usize },

    #[error("template {template} input {input}: spent output is unknown")]
    MissingUtxo { template: usize, input: usize },

    #[error("template {template} input {input}: invalid sighash type: {reason}")]
    InvalidSighashType {
        template: usize,
        input: usize,
        reason: String,
    },

    #[error("template {template} input {input}: cannot compute sighash: {reason}")]
    Sighash {
        template: usize,
        input: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, CosignError>;
