//! User-facing error reports.
//!
//! Subsystem errors stay typed; at the edge each one collapses into a
//! `(kind, message)` pair for display.

use serde::Serialize;
use std::fmt;

use crate::blockchain::types::BlockchainError;
use crate::certificates::repository::RepositoryError;
use crate::config::ConfigError;
use crate::issuance::workflow::IssuanceError;
use crate::search::engine::SearchError;
use crate::validation::ValidationError;

/// Error categories shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input; nothing reached the chain.
    Validation,
    ChainRead,
    ChainWrite,
    /// Absent result. Not a failure.
    NotFound,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::ChainRead => "chain_read",
            ErrorKind::ChainWrite => "chain_write",
            ErrorKind::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorReport {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", what))
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ErrorReport {}

impl From<ValidationError> for ErrorReport {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorKind::Validation, err.to_string())
    }
}

impl From<BlockchainError> for ErrorReport {
    fn from(err: BlockchainError) -> Self {
        Self::new(ErrorKind::ChainRead, err.to_string())
    }
}

impl From<RepositoryError> for ErrorReport {
    fn from(err: RepositoryError) -> Self {
        Self::new(ErrorKind::ChainRead, err.to_string())
    }
}

impl From<SearchError> for ErrorReport {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(e) => e.into(),
            SearchError::ChainRead(e) => e.into(),
        }
    }
}

impl From<IssuanceError> for ErrorReport {
    fn from(err: IssuanceError) -> Self {
        match err {
            IssuanceError::Validation(e) => e.into(),
            IssuanceError::AlreadyPending => Self::new(ErrorKind::Validation, err.to_string()),
            IssuanceError::Rejected(message) => Self::new(ErrorKind::ChainWrite, message),
        }
    }
}

impl From<ConfigError> for ErrorReport {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Validation, err.to_string())
    }
}
