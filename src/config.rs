//! Runtime configuration and client identity.

use crate::cosign::KeyMaterial;
use crate::market::transport::HttpTransport;
use crate::market::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use bitcoin::{Address, Network};
use std::fmt;

/// Settings resolved from CLI flags and environment variables.
#[derive(Clone)]
pub struct Config {
    /// WIF-encoded signing key (`PRIV_KEY`)
    pub priv_key: Option<String>,
    /// Marketplace API credential (`MARKET_KEY`)
    pub market_key: Option<String>,
    pub base_url: String,
    pub network: Network,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            priv_key: None,
            market_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            network: Network::Bitcoin,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("priv_key", &self.priv_key.as_ref().map(|_| "<redacted>"))
            .field("market_key", &self.market_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("network", &self.network)
            .finish()
    }
}

impl Config {
    pub fn identity(&self) -> Result<Identity> {
        let wif = self
            .priv_key
            .as_deref()
            .context("No signing key configured. Set PRIV_KEY or pass --priv-key.")?;
        let keys = KeyMaterial::from_wif(wif).context("Invalid PRIV_KEY")?;
        Ok(Identity::new(keys, self.network))
    }

    pub fn transport(&self) -> Result<HttpTransport> {
        let market_key = self
            .market_key
            .as_deref()
            .context("No API key configured. Set MARKET_KEY or pass --market-key.")?;
        Ok(HttpTransport::new(&self.base_url, market_key))
    }
}

/// The signing keys plus the address and public key the marketplace knows
/// this client by.
#[derive(Debug)]
pub struct Identity {
    keys: KeyMaterial,
    address: Address,
    network: Network,
}

impl Identity {
    pub fn new(keys: KeyMaterial, network: Network) -> Self {
        let address = Address::p2tr(keys.secp(), keys.x_only_public_key(), None, network);
        Self {
            keys,
            address,
            network,
        }
    }

    pub fn keys(&self) -> &KeyMaterial {
        &self.keys
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Compressed raw public key, hex encoded
    pub fn pub_key_hex(&self) -> String {
        hex::encode(self.keys.public_key().serialize())
    }
}

/// Parse network string to bitcoin::Network
pub fn parse_network(network_str: &str) -> Result<Network> {
    match network_str.to_lowercase().as_str() {
        "mainnet" | "main" | "bitcoin" | "livenet" => Ok(Network::Bitcoin),
        "testnet" | "test" | "testnet3" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" | "local" => Ok(Network::Regtest),
        _ => anyhow::bail!(
            "Unknown network '{}'. Use: mainnet, testnet, signet, or regtest",
            network_str
        ),
    }
}

pub fn network_name(network: Network) -> &'static str {
    match network {
        Network::Bitcoin => "mainnet",
        Network::Testnet => "testnet",
        Network::Signet => "signet",
        Network::Regtest => "regtest",
        _ => "unknown",
    }
}
