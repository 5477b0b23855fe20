//! Marketplace Client
//!
//! - **api**: response envelope, co-sign request and submission bodies
//! - **transport**: authenticated HTTP transport behind a trait
//! - **orders**: the order flows, each ending in a co-sign round trip

pub mod api;
pub mod orders;
pub mod transport;

pub use api::{CosignRequest, Envelope, MarketError, DEFAULT_BASE_URL};
pub use orders::{OrderSide, DEFAULT_SATOSHIS, DEFAULT_TOKEN_AMOUNT};
pub use transport::{HttpTransport, Transport};
