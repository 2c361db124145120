//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::CertifyConfig;
use crate::config::validation::{validate_config, ConfigIssue};

/// Environment variable selecting the network at deploy time.
pub const NETWORK_ENV_VAR: &str = "CERTIFY_NETWORK";
/// Environment variable overriding the RPC endpoint.
pub const RPC_URL_ENV_VAR: &str = "CERTIFY_RPC_URL";
/// Environment variable overriding the contract address.
pub const CONTRACT_ENV_VAR: &str = "CERTIFY_CONTRACT_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ConfigIssue>),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CertifyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: CertifyConfig = toml::from_str(&content)?;
    finish(config)
}

/// Load from `path` when given, otherwise start from defaults; then apply
/// environment overrides and validate.
pub fn load_or_default(path: Option<&Path>) -> Result<CertifyConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => CertifyConfig::default(),
    };
    finish(config)
}

fn finish(mut config: CertifyConfig) -> Result<CertifyConfig, ConfigError> {
    apply_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    tracing::debug!(
        network = %config.network.preset,
        contract = %config.contract.address,
        "Configuration loaded"
    );
    Ok(config)
}

/// Apply deploy-time overrides read through `lookup`.
pub fn apply_overrides<F>(config: &mut CertifyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(network) = lookup(NETWORK_ENV_VAR) {
        config.network.preset = network.parse().map_err(|message| ConfigError::Env {
            var: NETWORK_ENV_VAR,
            message,
        })?;
    }
    if let Some(rpc_url) = lookup(RPC_URL_ENV_VAR) {
        config.network.rpc_url = Some(rpc_url);
    }
    if let Some(address) = lookup(CONTRACT_ENV_VAR) {
        config.contract.address = address;
    }
    Ok(())
}
