//! Blockchain integration subsystem (the chain gateway).
//!
//! # Data Flow
//! ```text
//! Environment (issuer private key) + NetworkConfig
//!     → wallet.rs (signing identity)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → contract.rs (fixed ABI: encode calls, decode returns)
//!     → transaction.rs (sign, broadcast, confirm)
//!     → gateway.rs (ChainGateway: call / submit / wait_for_confirmation)
//!     → cache.rs (reads keyed by function + arguments)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Without a wallet the gateway is read-only

pub mod cache;
pub mod client;
pub mod contract;
pub mod explorer;
pub mod gateway;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use cache::{CachedGateway, ReadCache};
pub use client::BlockchainClient;
pub use contract::{CallOutput, CertificationDetails, ContractCall, ContractWrite};
pub use explorer::Explorer;
pub use gateway::{ChainGateway, ContractGateway};
pub use transaction::TxSubmitter;
pub use types::{BlockchainError, BlockchainResult, ChainId, ConfirmationStatus, TokenId};
pub use wallet::Wallet;
