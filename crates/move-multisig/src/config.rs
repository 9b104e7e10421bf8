//! Network configuration and presets.

use crate::error::MultisigResult;
use std::time::Duration;
use url::Url;

/// Well-known networks plus an escape hatch for custom nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    MovementMainnet,
    MovementTestnet,
    Local,
}

impl Network {
    /// Parses a network name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "mainnet" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            "devnet" => Some(Network::Devnet),
            "movement" | "movement-mainnet" => Some(Network::MovementMainnet),
            "movement-testnet" | "bardock" => Some(Network::MovementTestnet),
            "local" | "localnet" => Some(Network::Local),
            _ => None,
        }
    }
}

/// Everything the client needs to talk to one network.
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// Display name, used in logs and output headers.
    pub name: String,
    /// Base URL of the fullnode REST API (ends in `/v1`).
    pub fullnode_url: Url,
    /// Explorer base URL, when the network has one.
    pub explorer_url: Option<Url>,
    /// Query string the explorer needs to select this network.
    pub explorer_suffix: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Chain id used when signing transactions.
    pub chain_id: u8,
    /// Treat simulation failures as warnings rather than hard stops.
    ///
    /// Some networks run node software whose simulation endpoint rejects
    /// multisig payloads that execute fine when committed. On those,
    /// simulation is advisory.
    pub lenient_simulation: bool,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl NetworkConfig {
    /// The preset configuration for a well-known network.
    pub fn preset(network: Network) -> Self {
        match network {
            Network::Mainnet => Self {
                name: "mainnet".to_string(),
                fullnode_url: parse_static("https://api.mainnet.aptoslabs.com/v1"),
                explorer_url: Some(parse_static("https://explorer.aptoslabs.com")),
                explorer_suffix: Some("?network=mainnet".to_string()),
                request_timeout: DEFAULT_TIMEOUT,
                chain_id: 1,
                lenient_simulation: false,
            },
            Network::Testnet => Self {
                name: "testnet".to_string(),
                fullnode_url: parse_static("https://api.testnet.aptoslabs.com/v1"),
                explorer_url: Some(parse_static("https://explorer.aptoslabs.com")),
                explorer_suffix: Some("?network=testnet".to_string()),
                request_timeout: DEFAULT_TIMEOUT,
                chain_id: 2,
                lenient_simulation: false,
            },
            Network::Devnet => Self {
                name: "devnet".to_string(),
                fullnode_url: parse_static("https://api.devnet.aptoslabs.com/v1"),
                explorer_url: Some(parse_static("https://explorer.aptoslabs.com")),
                explorer_suffix: Some("?network=devnet".to_string()),
                request_timeout: DEFAULT_TIMEOUT,
                chain_id: 174,
                lenient_simulation: false,
            },
            Network::MovementMainnet => Self {
                name: "movement-mainnet".to_string(),
                fullnode_url: parse_static("https://full.mainnet.movementinfra.xyz/v1"),
                explorer_url: Some(parse_static("https://explorer.movementnetwork.xyz")),
                explorer_suffix: Some("?network=mainnet".to_string()),
                request_timeout: DEFAULT_TIMEOUT,
                chain_id: 126,
                lenient_simulation: true,
            },
            Network::MovementTestnet => Self {
                name: "movement-testnet".to_string(),
                fullnode_url: parse_static("https://full.testnet.movementinfra.xyz/v1"),
                explorer_url: Some(parse_static("https://explorer.movementnetwork.xyz")),
                explorer_suffix: Some("?network=bardock+testnet".to_string()),
                request_timeout: DEFAULT_TIMEOUT,
                chain_id: 250,
                lenient_simulation: true,
            },
            Network::Local => Self {
                name: "local".to_string(),
                fullnode_url: parse_static("http://localhost:8080/v1"),
                explorer_url: None,
                explorer_suffix: None,
                request_timeout: DEFAULT_TIMEOUT,
                chain_id: 4,
                lenient_simulation: false,
            },
        }
    }

    /// A configuration pointing at an arbitrary fullnode URL.
    ///
    /// No explorer, default timeout, strict simulation. The chain id is
    /// discovered from the node at runtime, so 0 here is a placeholder.
    pub fn custom(fullnode_url: &str) -> MultisigResult<Self> {
        Ok(Self {
            name: "custom".to_string(),
            fullnode_url: Url::parse(fullnode_url)?,
            explorer_url: None,
            explorer_suffix: None,
            request_timeout: DEFAULT_TIMEOUT,
            chain_id: 0,
            lenient_simulation: false,
        })
    }

    /// Builds an explorer link for a committed transaction hash.
    pub fn explorer_transaction_link(&self, hash: &str) -> Option<String> {
        let base = self.explorer_url.as_ref()?;
        let suffix = self.explorer_suffix.as_deref().unwrap_or("");
        Some(format!("{base}txn/{hash}{suffix}"))
    }
}

fn parse_static(url: &str) -> Url {
    // Preset URLs are compile-time constants; parsing cannot fail.
    Url::parse(url).unwrap_or_else(|_| panic!("invalid preset URL {url}"))
}
