//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address of the deployed certification contract on Polygon mainnet.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xbc9bb1E472c072B085415481D83f11BBcC629915";

/// Root configuration for the certificate client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CertifyConfig {
    /// Target chain and RPC endpoints.
    pub network: NetworkConfig,

    /// Contract address and explorer.
    pub contract: ContractConfig,

    /// Course-name scan settings.
    pub search: SearchConfig,

    /// Contract read cache.
    pub cache: CacheConfig,

    /// Issuance submission settings.
    pub issuance: IssuanceConfig,

    /// Share link composition.
    pub share: ShareConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl CertifyConfig {
    /// Explorer base URL: explicit override or the network preset's default.
    pub fn explorer_url(&self) -> &str {
        self.contract
            .explorer_url
            .as_deref()
            .unwrap_or_else(|| self.network.preset.explorer_url())
    }
}

/// Networks the client can be built or deployed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkPreset {
    /// Polygon PoS mainnet.
    Polygon,
    /// Polygon Amoy testnet.
    PolygonAmoy,
    /// Local Anvil/Hardhat node.
    Local,
}

impl NetworkPreset {
    /// Preset compiled in through `CERTIFY_NETWORK` at build time, else Polygon.
    pub fn build_default() -> Self {
        option_env!("CERTIFY_NETWORK")
            .and_then(|name| name.parse().ok())
            .unwrap_or(NetworkPreset::Polygon)
    }

    pub fn chain_id(self) -> u64 {
        match self {
            NetworkPreset::Polygon => 137,
            NetworkPreset::PolygonAmoy => 80002,
            NetworkPreset::Local => 31337,
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            NetworkPreset::Polygon => "https://polygon-rpc.com",
            NetworkPreset::PolygonAmoy => "https://rpc-amoy.polygon.technology",
            NetworkPreset::Local => "http://localhost:8545",
        }
    }

    pub fn explorer_url(self) -> &'static str {
        match self {
            NetworkPreset::Polygon => "https://polygonscan.com",
            NetworkPreset::PolygonAmoy => "https://amoy.polygonscan.com",
            NetworkPreset::Local => "http://localhost:4000",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NetworkPreset::Polygon => "polygon",
            NetworkPreset::PolygonAmoy => "polygon-amoy",
            NetworkPreset::Local => "local",
        }
    }
}

impl fmt::Display for NetworkPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polygon" | "matic" | "137" => Ok(NetworkPreset::Polygon),
            "polygon-amoy" | "amoy" | "80002" => Ok(NetworkPreset::PolygonAmoy),
            "local" | "anvil" | "31337" => Ok(NetworkPreset::Local),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Which chain to talk to.
    pub preset: NetworkPreset,

    /// JSON-RPC endpoint URL; the preset's public endpoint when unset.
    pub rpc_url: Option<String>,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,
}

impl NetworkConfig {
    pub fn chain_id(&self) -> u64 {
        self.preset.chain_id()
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.preset.default_rpc_url())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            preset: NetworkPreset::build_default(),
            rpc_url: None,
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
        }
    }
}

/// Contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the certification contract.
    pub address: String,

    /// Block explorer base URL override.
    pub explorer_url: Option<String>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            explorer_url: None,
        }
    }
}

/// Course-name search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum per-id reads in flight during a scan.
    pub scan_concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scan_concurrency: 8,
        }
    }
}

/// Read cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the read cache.
    pub enabled: bool,

    /// Lifetime of answers that change on issuance, in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 15,
        }
    }
}

/// Issuance configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IssuanceConfig {
    /// Maximum time to wait for a transaction to confirm, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Delay before a confirmed form may be cleared, in seconds.
    pub clear_grace_secs: u64,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
            clear_grace_secs: 3,
        }
    }
}

/// Share link configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Intent URL receiving `text` and `url` query parameters.
    pub intent_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            intent_url: "https://twitter.com/intent/tweet".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}
