//! Read cache keyed by contract function and arguments.
//!
//! Immutable answers (certificate details, owner of a minted id, collection
//! name/symbol) are kept for the life of the process. Answers that change when
//! a certificate is issued expire after a TTL and are dropped explicitly when
//! an issuance is confirmed.

use alloy::primitives::{Address, TxHash};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::blockchain::contract::{CallOutput, ContractCall, ContractWrite};
use crate::blockchain::gateway::ChainGateway;
use crate::blockchain::types::{BlockchainResult, ConfirmationStatus};
use crate::config::CacheConfig;
use crate::observability::metrics;

#[derive(Debug, Clone)]
struct CacheEntry {
    output: CallOutput,
    stored_at: Instant,
}

/// A thread-safe cache of contract read results.
#[derive(Debug, Clone)]
pub struct ReadCache {
    inner: Arc<DashMap<ContractCall, CacheEntry>>,
    ttl: Duration,
    enabled: bool,
}

impl ReadCache {
    /// Create a new empty cache. `ttl` applies to mutable answers only.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
            enabled: true,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(Duration::from_secs(config.ttl_secs))
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached answer for `call`, if present and fresh.
    pub fn get(&self, call: &ContractCall) -> Option<CallOutput> {
        if !self.enabled {
            return None;
        }
        let entry = self.inner.get(call)?;
        if !call.is_immutable() && entry.stored_at.elapsed() >= self.ttl {
            drop(entry);
            self.inner.remove(call);
            return None;
        }
        Some(entry.output.clone())
    }

    pub fn insert(&self, call: ContractCall, output: CallOutput) {
        if !self.enabled {
            return;
        }
        self.inner.insert(
            call,
            CacheEntry {
                output,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry a confirmed `write` may have changed.
    pub fn invalidate_for(&self, write: &ContractWrite) {
        let recipient = write.recipient();
        let before = self.inner.len();
        self.inner.retain(|call, _| !affected_by_issuance(call, recipient));
        tracing::debug!(
            recipient = %recipient,
            removed = before.saturating_sub(self.inner.len()),
            "Invalidated cached reads after write confirmation"
        );
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn affected_by_issuance(call: &ContractCall, recipient: Address) -> bool {
    match call {
        ContractCall::TotalCertifications => true,
        ContractCall::GetCertifications { holder } => *holder == recipient,
        ContractCall::VerifyCertification { holder, .. } => *holder == recipient,
        _ => false,
    }
}

/// Gateway decorator that answers reads from a [`ReadCache`].
///
/// Reverts are not cached: an unknown id may be minted later.
#[derive(Debug, Clone)]
pub struct CachedGateway<G> {
    inner: G,
    cache: ReadCache,
}

impl<G: ChainGateway> CachedGateway<G> {
    pub fn new(inner: G, cache: ReadCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &ReadCache {
        &self.cache
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: ChainGateway> ChainGateway for CachedGateway<G> {
    async fn call(&self, call: ContractCall) -> BlockchainResult<CallOutput> {
        if let Some(hit) = self.cache.get(&call) {
            metrics::record_cache_lookup(true);
            return Ok(hit);
        }
        metrics::record_cache_lookup(false);

        let output = self.inner.call(call.clone()).await?;
        self.cache.insert(call, output.clone());
        Ok(output)
    }

    async fn submit(&self, write: ContractWrite) -> BlockchainResult<TxHash> {
        self.inner.submit(write).await
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        self.inner.wait_for_confirmation(tx_hash).await
    }
}
