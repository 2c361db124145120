//! Client for a soulbound certificate contract.
//!
//! Reads, searches and issues non-transferable course certificates stored
//! on an EVM chain.

pub mod app;
pub mod blockchain;
pub mod certificates;
pub mod config;
pub mod error;
pub mod issuance;
pub mod observability;
pub mod presentation;
pub mod search;
pub mod session;
pub mod validation;

pub use app::AppContext;
pub use config::schema::CertifyConfig;
pub use error::{ErrorKind, ErrorReport};
