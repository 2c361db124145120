//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency >= 1)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CertifyConfig → Result<(), Vec<ConfigIssue>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use std::fmt;
use std::str::FromStr;

use crate::config::schema::CertifyConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &CertifyConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    if let Err(e) = check_url(config.network.rpc_url(), &["http", "https"]) {
        issues.push(ConfigIssue::new("network.rpc_url", e));
    }
    for url in &config.network.failover_urls {
        if let Err(e) = check_url(url, &["http", "https"]) {
            issues.push(ConfigIssue::new("network.failover_urls", e));
        }
    }
    if config.network.rpc_timeout_secs == 0 {
        issues.push(ConfigIssue::new("network.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.network.confirmation_blocks == 0 {
        issues.push(ConfigIssue::new("network.confirmation_blocks", "must be at least 1"));
    }

    if Address::from_str(&config.contract.address).is_err() {
        issues.push(ConfigIssue::new(
            "contract.address",
            format!("'{}' is not a valid address", config.contract.address),
        ));
    }
    if let Err(e) = check_url(config.explorer_url(), &["http", "https"]) {
        issues.push(ConfigIssue::new("contract.explorer_url", e));
    }

    if config.search.scan_concurrency == 0 {
        issues.push(ConfigIssue::new("search.scan_concurrency", "must be at least 1"));
    }

    if config.issuance.confirmation_timeout_secs == 0 {
        issues.push(ConfigIssue::new(
            "issuance.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.issuance.poll_interval_ms == 0 {
        issues.push(ConfigIssue::new("issuance.poll_interval_ms", "must be greater than 0"));
    }

    if let Err(e) = check_url(&config.share.intent_url, &["http", "https"]) {
        issues.push(ConfigIssue::new("share.intent_url", e));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        issues.push(ConfigIssue::new(
            "observability.log_level",
            format!("'{}' is not one of {}", config.observability.log_level, LOG_LEVELS.join(", ")),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn check_url(raw: &str, schemes: &[&str]) -> Result<(), String> {
    let url = url::Url::parse(raw).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;
    if !schemes.contains(&url.scheme()) {
        return Err(format!("'{}' must use one of: {}", raw, schemes.join(", ")));
    }
    Ok(())
}
