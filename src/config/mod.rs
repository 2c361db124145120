//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! build-time CERTIFY_NETWORK (compiled-in default network)
//!     → config file (TOML, optional)
//!     → loader.rs (parse, apply CERTIFY_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → CertifyConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Exactly one network per process; no runtime chain switching
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    CacheConfig, CertifyConfig, ContractConfig, IssuanceConfig, NetworkConfig, NetworkPreset,
    ObservabilityConfig, SearchConfig, ShareConfig,
};
