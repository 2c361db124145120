//! Chain-specific types and error definitions.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Re-export NetworkConfig from config module to avoid duplication
pub use crate::config::schema::{NetworkConfig, NetworkPreset};

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Identifier of a minted certificate.
///
/// The contract assigns ids sequentially starting at 1, so zero is never a
/// valid id and is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TokenId(u64);

impl TokenId {
    /// Create a token id, returning `None` for zero.
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn to_u256(self) -> U256 {
        U256::from(self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected token id input (zero, negative, or not an integer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid certificate id")]
pub struct InvalidTokenId(pub String);

impl FromStr for TokenId {
    type Err = InvalidTokenId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        trimmed
            .parse::<u64>()
            .ok()
            .and_then(TokenId::new)
            .ok_or_else(|| InvalidTokenId(s.to_string()))
    }
}

impl TryFrom<u64> for TokenId {
    type Error = InvalidTokenId;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        TokenId::new(value).ok_or_else(|| InvalidTokenId(value.to_string()))
    }
}

impl From<TokenId> for u64 {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

impl TryFrom<U256> for TokenId {
    type Error = BlockchainError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        let raw = u256_to_u64(value, "token id")?;
        TokenId::new(raw).ok_or_else(|| BlockchainError::Decode("token id 0 returned by contract".to_string()))
    }
}

/// Narrow a contract integer to `u64`.
pub fn u256_to_u64(value: U256, what: &str) -> BlockchainResult<u64> {
    u64::try_from(value)
        .map_err(|_| BlockchainError::Decode(format!("{} {} does not fit in 64 bits", what, value)))
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Contract execution reverted (unknown id, unauthorized caller, ...).
    #[error("Execution reverted: {0}")]
    Reverted(String),

    /// Contract returned data that does not match the interface.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Gateway answered a call with an output of the wrong shape.
    #[error("Unexpected output for {function}")]
    UnexpectedOutput { function: &'static str },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Capability not available (e.g. submitting without a signer).
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

impl BlockchainError {
    /// Whether the failure is a deterministic contract revert.
    pub fn is_revert(&self) -> bool {
        matches!(self, BlockchainError::Reverted(_))
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Final state of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is confirmed with required block depth.
    Confirmed {
        block_number: u64,
        /// Token minted by the transaction, recovered from its Transfer log.
        minted: Option<TokenId>,
    },
    /// Transaction failed or was dropped.
    Failed(String),
}
