//! Cryptographic Primitives
//!
//! Shared building blocks for the co-signing engine:
//!
//! - **helpers**: BIP340 tagged hashing and Taproot leaf serialization

pub mod helpers;

pub use helpers::{serialize_leaf_script, tagged_hash};
