//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and gauges via `metrics`)
//! ```
//!
//! # Design Decisions
//! - Structured fields (function, tx_hash, token_id) instead of formatted text
//! - Submission UUIDs correlate the broadcast and confirmation log lines
//! - Private keys and form contents beyond the recipient are never logged

pub mod logging;
pub mod metrics;
