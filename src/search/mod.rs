//! Certificate search.
//!
//! # Data Flow
//! ```text
//! raw input
//!     → query.rs (owner address | course text)
//!     → engine.rs
//!         owner:  getCertifications → per-id reads, contract order
//!         course: totalCertifications → concurrent per-id reads → filter → sort by id
//!     → coordinator.rs (stale results discarded)
//!     → share.rs (link for certificates the viewer owns)
//! ```
//!
//! # Design Decisions
//! - A failed per-id read skips that id and is reported as a warning
//! - The course scan is exhaustive; there is no off-chain index

pub mod coordinator;
pub mod engine;
pub mod query;
pub mod share;

pub use coordinator::{SearchCoordinator, SearchOutcome, SearchTicket};
pub use engine::{SearchEngine, SearchError, SearchReport, SearchResult};
pub use query::{SearchMode, SearchQuery};
pub use share::{ShareComposer, ShareLink};
