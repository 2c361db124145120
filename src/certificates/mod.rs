//! Certificate repository.
//!
//! # Data Flow
//! ```text
//! ChainGateway::call(ContractCall)
//!     → repository.rs (typed reads, revert → not found)
//!     → types.rs (Certificate, ContractInfo)
//! ```

pub mod repository;
pub mod types;

pub use repository::{CertificateRepository, RepositoryError, RepositoryResult};
pub use types::{AchievementLevel, Certificate, ContractInfo};
