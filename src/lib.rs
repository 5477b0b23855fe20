pub mod config;
pub mod cosign;
pub mod crypto;
pub mod market;

/// Result from a command, separating progress output from the copy-paste result
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Human-readable progress output
    pub output: String,
    /// Clean JSON result for copy-pasting
    pub result: String,
}
