//! Transaction submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Sign and broadcast contract writes through the issuer wallet
//! - Monitor confirmations until the configured depth is reached
//! - Recover the minted token id from the receipt logs
//!
//! Broadcast failures are never retried here; resubmission is a fresh user
//! action.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::{revert_reason, BlockchainClient};
use crate::blockchain::contract::ICertificationNFT;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus, TokenId};
use crate::blockchain::wallet::Wallet;

/// Signs and broadcasts transactions, then follows them to finality.
#[derive(Clone)]
pub struct TxSubmitter {
    client: BlockchainClient,
    wallet: Wallet,
    /// Provider with wallet, nonce, gas and chain-id fillers.
    provider: Arc<dyn Provider + Send + Sync>,
    poll_interval: Duration,
}

impl TxSubmitter {
    /// Create a submitter bound to the client's primary endpoint.
    pub fn new(client: BlockchainClient, wallet: Wallet, poll_interval: Duration) -> BlockchainResult<Self> {
        let rpc_url = client.config().rpc_url().to_string();
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let provider = Arc::new(
            ProviderBuilder::new()
                .wallet(wallet.ethereum_wallet())
                .connect_http(url),
        ) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            client,
            wallet,
            provider,
            poll_interval,
        })
    }

    /// Sign and broadcast a call to `to`, returning as soon as the node
    /// accepted the transaction.
    ///
    /// Gas estimation runs the call first, so an unauthorized issuer surfaces
    /// here as [`BlockchainError::Reverted`].
    pub async fn submit(&self, to: Address, data: Bytes) -> BlockchainResult<TxHash> {
        let tx = TransactionRequest::default()
            .with_from(self.wallet.address())
            .with_to(to)
            .with_input(data)
            .with_chain_id(self.wallet.chain_id());

        let pending = match timeout(self.client.timeout_duration(), self.provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => {
                return Err(match revert_reason(&e) {
                    Some(reason) => BlockchainError::Reverted(reason),
                    None => BlockchainError::Rpc(e.to_string()),
                });
            }
            Err(_) => {
                return Err(BlockchainError::Rpc("Transaction submission timed out".to_string()));
            }
        };

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, from = %self.wallet.address(), "Transaction broadcast");
        Ok(tx_hash)
    }

    /// Wait for a transaction to be confirmed.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `contract` - Contract whose mint event carries the new token id
    /// * `timeout_secs` - Maximum time to wait for confirmation
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        contract: Address,
        timeout_secs: u64,
    ) -> BlockchainResult<ConfirmationStatus> {
        let required_confirmations = self.client.confirmation_blocks().max(1);
        let timeout_duration = Duration::from_secs(timeout_secs);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Ok(ConfirmationStatus::Failed(
                        "Transaction reverted".to_string(),
                    ));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block counts as the first confirmation
                let confirmations = (current_block.saturating_sub(tx_block) + 1) as u32;

                if confirmations >= required_confirmations {
                    return Ok(ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                        minted: minted_token(&receipt, contract),
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
        }
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

impl std::fmt::Debug for TxSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxSubmitter")
            .field("address", &self.wallet.address())
            .field("chain_id", &self.wallet.chain_id())
            .finish()
    }
}

/// Token id of the mint `Transfer(0x0, to, id)` emitted by `contract`.
fn minted_token(receipt: &TransactionReceipt, contract: Address) -> Option<TokenId> {
    receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == contract)
        .filter_map(|log| log.log_decode::<ICertificationNFT::Transfer>().ok())
        .find(|decoded| decoded.inner.data.from == Address::ZERO)
        .and_then(|decoded| TokenId::try_from(decoded.inner.data.tokenId).ok())
}
