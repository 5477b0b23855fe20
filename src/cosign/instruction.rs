use serde::{Deserialize, Serialize};

/// One input to sign within a template, as issued by the marketplace.
///
/// Wire shape: `{ "index": 0, "disableTweakSigner": true }`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub index: usize,
    /// Sign with the raw key instead of the taproot tweaked key
    #[serde(default)]
    pub disable_tweak_signer: bool,
}

impl Instruction {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            disable_tweak_signer: false,
        }
    }

    pub fn untweaked(index: usize) -> Self {
        Self {
            index,
            disable_tweak_signer: true,
        }
    }
}
