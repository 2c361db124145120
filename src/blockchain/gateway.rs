//! The chain gateway: this crate's only boundary to the chain and wallet.

use alloy::primitives::{Address, TxHash};
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contract::{CallOutput, ContractCall, ContractWrite};
use crate::blockchain::transaction::TxSubmitter;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::observability::metrics;

/// Read and write access to the certification contract.
///
/// Reads are side-effect free and may run concurrently. Writes return as soon
/// as the transaction is broadcast; confirmation is observed separately.
pub trait ChainGateway: Send + Sync {
    /// Execute a view function.
    fn call(&self, call: ContractCall) -> impl Future<Output = BlockchainResult<CallOutput>> + Send;

    /// Sign and broadcast a state-changing function.
    fn submit(&self, write: ContractWrite) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Follow a broadcast transaction to confirmation or failure.
    fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<ConfirmationStatus>> + Send;
}

impl<G: ChainGateway> ChainGateway for Arc<G> {
    fn call(&self, call: ContractCall) -> impl Future<Output = BlockchainResult<CallOutput>> + Send {
        (**self).call(call)
    }

    fn submit(&self, write: ContractWrite) -> impl Future<Output = BlockchainResult<TxHash>> + Send {
        (**self).submit(write)
    }

    fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<ConfirmationStatus>> + Send {
        (**self).wait_for_confirmation(tx_hash)
    }
}

/// Gateway backed by JSON-RPC providers and an optional issuer wallet.
#[derive(Debug, Clone)]
pub struct ContractGateway {
    client: BlockchainClient,
    contract: Address,
    /// `None` in read-only mode.
    submitter: Option<TxSubmitter>,
    confirmation_timeout_secs: u64,
}

impl ContractGateway {
    /// Create a read-only gateway.
    pub fn read_only(client: BlockchainClient, contract: Address, confirmation_timeout_secs: u64) -> Self {
        Self {
            client,
            contract,
            submitter: None,
            confirmation_timeout_secs,
        }
    }

    /// Attach a signing wallet, enabling [`ChainGateway::submit`].
    pub fn with_submitter(mut self, submitter: TxSubmitter) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    /// Address of the signing wallet, if any.
    pub fn signer_address(&self) -> Option<Address> {
        self.submitter.as_ref().map(TxSubmitter::address)
    }

    fn submitter(&self) -> BlockchainResult<&TxSubmitter> {
        self.submitter
            .as_ref()
            .ok_or_else(|| BlockchainError::NotAvailable("no issuer wallet connected".to_string()))
    }
}

impl ChainGateway for ContractGateway {
    async fn call(&self, call: ContractCall) -> BlockchainResult<CallOutput> {
        let function = call.function_name();
        let result = match self.client.call_contract(self.contract, call.encode()).await {
            Ok(data) => call.decode_output(&data),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => metrics::record_contract_call(function, "ok"),
            Err(e) if e.is_revert() => {
                tracing::debug!(function = function, error = %e, "Contract call reverted");
                metrics::record_contract_call(function, "reverted");
            }
            Err(e) => {
                tracing::warn!(function = function, error = %e, "Contract call failed");
                metrics::record_contract_call(function, "error");
            }
        }
        result
    }

    async fn submit(&self, write: ContractWrite) -> BlockchainResult<TxHash> {
        let submitter = self.submitter()?;
        let submission_id = Uuid::new_v4();
        tracing::info!(
            submission_id = %submission_id,
            function = write.function_name(),
            recipient = %write.recipient(),
            "Submitting transaction"
        );

        let result = submitter.submit(self.contract, write.encode()).await;
        match &result {
            Ok(tx_hash) => {
                tracing::info!(submission_id = %submission_id, tx_hash = %tx_hash, "Transaction accepted")
            }
            Err(e) => {
                tracing::warn!(submission_id = %submission_id, error = %e, "Transaction rejected")
            }
        }
        result
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        self.submitter()?
            .wait_for_confirmation(tx_hash, self.contract, self.confirmation_timeout_secs)
            .await
    }
}
