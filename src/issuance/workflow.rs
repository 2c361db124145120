//! Issuance workflow: validate, submit, follow to confirmation.

use alloy::primitives::TxHash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::blockchain::cache::ReadCache;
use crate::blockchain::gateway::ChainGateway;
use crate::blockchain::types::{BlockchainError, ConfirmationStatus, TokenId};
use crate::config::IssuanceConfig;
use crate::issuance::form::IssuanceForm;
use crate::observability::metrics;
use crate::validation::ValidationError;

/// Progress of the current submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuanceStatus {
    /// Nothing submitted (or the last result was acknowledged).
    Idle,
    /// Waiting for the wallet to sign and broadcast.
    PendingApproval,
    /// Broadcast; waiting for the chain.
    PendingConfirmation { tx_hash: TxHash },
    /// Mined. The form may be cleared once `clear_after` has elapsed.
    Confirmed {
        tx_hash: TxHash,
        block_number: u64,
        token_id: Option<TokenId>,
        clear_after: Duration,
    },
    /// Terminal failure; resubmitting is a new user action.
    Failed { message: String },
}

impl IssuanceStatus {
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            IssuanceStatus::PendingApproval | IssuanceStatus::PendingConfirmation { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An issuance is already in progress")]
    AlreadyPending,

    #[error("{0}")]
    Rejected(String),
}

/// Outcome of a confirmed issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub token_id: Option<TokenId>,
    /// Grace period before the form should be cleared.
    pub clear_after: Duration,
}

/// Submits certificates one at a time.
///
/// Who may issue is decided by the contract; an unauthorized caller simply
/// sees a rejected submission.
pub struct IssuanceWorkflow<G> {
    gateway: G,
    cache: Option<ReadCache>,
    clear_grace: Duration,
    in_flight: AtomicBool,
    status: watch::Sender<IssuanceStatus>,
}

/// Clears the in-flight flag when a submission ends, even if its future is
/// dropped midway.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<G: ChainGateway> IssuanceWorkflow<G> {
    pub fn new(gateway: G, config: &IssuanceConfig) -> Self {
        let (status, _) = watch::channel(IssuanceStatus::Idle);
        Self {
            gateway,
            cache: None,
            clear_grace: Duration::from_secs(config.clear_grace_secs),
            in_flight: AtomicBool::new(false),
            status,
        }
    }

    /// Invalidate affected entries of `cache` whenever an issuance confirms.
    pub fn with_cache(mut self, cache: ReadCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Observe status transitions.
    pub fn subscribe(&self) -> watch::Receiver<IssuanceStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> IssuanceStatus {
        self.status.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Acknowledge a finished submission and return to `Idle`.
    pub fn reset(&self) {
        if !self.is_pending() {
            self.status.send_replace(IssuanceStatus::Idle);
        }
    }

    /// Validate `form` and issue a certificate.
    ///
    /// Validation errors and a concurrent submission are refused before any
    /// chain interaction.
    pub async fn issue(&self, form: &IssuanceForm) -> Result<IssuanceReceipt, IssuanceError> {
        let request = form.validate()?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(IssuanceError::AlreadyPending);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let write = request.to_write();
        self.status.send_replace(IssuanceStatus::PendingApproval);

        let tx_hash = match self.gateway.submit(write.clone()).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => return Err(self.fail(&e)),
        };
        self.status
            .send_replace(IssuanceStatus::PendingConfirmation { tx_hash });

        match self.gateway.wait_for_confirmation(tx_hash).await {
            Ok(ConfirmationStatus::Confirmed {
                block_number,
                minted,
            }) => {
                if let Some(cache) = &self.cache {
                    cache.invalidate_for(&write);
                }
                metrics::record_submission("confirmed");
                tracing::info!(
                    tx_hash = %tx_hash,
                    block_number = block_number,
                    token_id = ?minted.map(TokenId::get),
                    recipient = %request.recipient,
                    "Certificate issued"
                );

                let receipt = IssuanceReceipt {
                    tx_hash,
                    block_number,
                    token_id: minted,
                    clear_after: self.clear_grace,
                };
                self.status.send_replace(IssuanceStatus::Confirmed {
                    tx_hash,
                    block_number,
                    token_id: minted,
                    clear_after: self.clear_grace,
                });
                Ok(receipt)
            }
            Ok(ConfirmationStatus::Failed(reason)) => {
                Err(self.fail(&BlockchainError::Reverted(reason)))
            }
            Err(e) => Err(self.fail(&e)),
        }
    }

    fn fail(&self, error: &BlockchainError) -> IssuanceError {
        let message = user_message(error);
        tracing::warn!(error = %error, "Issuance failed");
        metrics::record_submission("failed");
        self.status.send_replace(IssuanceStatus::Failed {
            message: message.clone(),
        });
        IssuanceError::Rejected(message)
    }
}

/// One user-facing sentence per failure, whatever the cause.
fn user_message(error: &BlockchainError) -> String {
    match error {
        BlockchainError::Reverted(reason) => format!("Transaction rejected: {}", reason),
        BlockchainError::NotAvailable(_) | BlockchainError::Wallet(_) => {
            "Connect an issuer wallet to issue certificates".to_string()
        }
        BlockchainError::ConfirmationTimeout(secs) => format!(
            "Transaction was not confirmed within {} seconds; check the explorer before retrying",
            secs
        ),
        other => format!("Transaction failed: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_states() {
        assert!(IssuanceStatus::PendingApproval.is_pending());
        assert!(IssuanceStatus::PendingConfirmation {
            tx_hash: TxHash::ZERO
        }
        .is_pending());
        assert!(!IssuanceStatus::Idle.is_pending());
        assert!(!IssuanceStatus::Failed {
            message: "x".into()
        }
        .is_pending());
    }

    #[test]
    fn test_user_messages() {
        let msg = user_message(&BlockchainError::Reverted("OwnableUnauthorizedAccount".into()));
        assert_eq!(msg, "Transaction rejected: OwnableUnauthorizedAccount");

        let msg = user_message(&BlockchainError::NotAvailable("no wallet".into()));
        assert!(msg.contains("issuer wallet"));
    }

    #[test]
    fn test_guard_releases_flag() {
        let flag = AtomicBool::new(true);
        {
            let _guard = InFlightGuard(&flag);
        }
        assert!(!flag.load(Ordering::Acquire));
    }
}
