//! Certificate issuance.
//!
//! # Data Flow
//! ```text
//! IssuanceForm
//!     → form.rs (validation, no chain access)
//!     → workflow.rs (single in-flight submission)
//!         → ChainGateway::submit            status: PendingApproval
//!         → ChainGateway::wait_for_confirmation
//!                                           status: PendingConfirmation
//!         → ReadCache::invalidate_for       status: Confirmed | Failed
//! ```

pub mod form;
pub mod workflow;

pub use form::{IssuanceForm, IssuanceRequest};
pub use workflow::{IssuanceError, IssuanceReceipt, IssuanceStatus, IssuanceWorkflow};
