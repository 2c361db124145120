//! Application wiring.
//!
//! Builds every component from a validated [`CertifyConfig`] and hands them
//! out by reference. There is no global state: the context is the only owner.

use alloy::primitives::Address;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::cache::{CachedGateway, ReadCache};
use crate::blockchain::client::BlockchainClient;
use crate::blockchain::explorer::Explorer;
use crate::blockchain::gateway::{ChainGateway, ContractGateway};
use crate::blockchain::transaction::TxSubmitter;
use crate::blockchain::types::BlockchainError;
use crate::blockchain::wallet::{Wallet, PRIVATE_KEY_ENV_VAR};
use crate::certificates::repository::CertificateRepository;
use crate::certificates::types::Certificate;
use crate::config::{CertifyConfig, ConfigError};
use crate::issuance::workflow::IssuanceWorkflow;
use crate::search::coordinator::SearchCoordinator;
use crate::search::engine::SearchEngine;
use crate::search::share::{ShareComposer, ShareLink};
use crate::session::WalletSession;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("Invalid contract address: {0}")]
    Contract(#[from] ValidationError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Every component, wired over one gateway.
pub struct AppContext<G> {
    pub config: CertifyConfig,
    pub contract: Address,
    pub explorer: Explorer,
    pub repository: CertificateRepository<G>,
    pub search: SearchEngine<G>,
    pub coordinator: SearchCoordinator,
    pub issuance: IssuanceWorkflow<G>,
    pub session: WalletSession,
    pub share: ShareComposer,
}

/// Gateway used against a live network.
pub type LiveGateway = Arc<CachedGateway<ContractGateway>>;

impl AppContext<LiveGateway> {
    /// Connect to the configured network.
    ///
    /// When `CERTIFY_ISSUER_PRIVATE_KEY` is set the issuer wallet is loaded and
    /// connected to the session; otherwise the context is read-only.
    pub async fn connect(config: CertifyConfig) -> Result<Self, StartupError> {
        let contract = Address::from_str(config.contract.address.trim())
            .map_err(|_| ValidationError::InvalidAddress(config.contract.address.clone()))?;
        let client = BlockchainClient::new(config.network.clone()).await?;

        let mut gateway = ContractGateway::read_only(
            client.clone(),
            contract,
            config.issuance.confirmation_timeout_secs,
        );

        let wallet = match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => {
                Some(Wallet::from_private_key(&key, config.network.chain_id())?)
            }
            _ => None,
        };
        if let Some(wallet) = &wallet {
            let submitter = TxSubmitter::new(
                client,
                wallet.clone(),
                Duration::from_millis(config.issuance.poll_interval_ms),
            )?;
            gateway = gateway.with_submitter(submitter);
        } else {
            tracing::info!("No issuer wallet configured; running read-only");
        }

        let cache = ReadCache::from_config(&config.cache);
        let gateway = Arc::new(CachedGateway::new(gateway, cache.clone()));
        let context = Self::with_gateway(config, contract, gateway, cache)?;

        if let Some(wallet) = wallet {
            context.session.connect(wallet.address(), wallet.chain_id())?;
        }
        Ok(context)
    }
}

impl<G: ChainGateway + Clone> AppContext<G> {
    /// Wire every component over `gateway`.
    ///
    /// `cache` is the cache `gateway` reads through; confirmed issuances
    /// invalidate it.
    pub fn with_gateway(
        config: CertifyConfig,
        contract: Address,
        gateway: G,
        cache: ReadCache,
    ) -> Result<Self, StartupError> {
        let explorer = Explorer::new(config.explorer_url())?;
        let share = ShareComposer::new(&config.share.intent_url, explorer.clone(), contract)?;
        let repository = CertificateRepository::new(gateway.clone(), contract);
        let search = SearchEngine::new(repository.clone(), config.search.scan_concurrency);
        let issuance = IssuanceWorkflow::new(gateway, &config.issuance).with_cache(cache);
        let session = WalletSession::new(config.network.chain_id());

        Ok(Self {
            config,
            contract,
            explorer,
            repository,
            search,
            coordinator: SearchCoordinator::new(),
            issuance,
            session,
            share,
        })
    }

    /// Share link for `certificate`, if the connected wallet owns it.
    pub fn share_link(&self, certificate: &Certificate) -> Option<ShareLink> {
        self.share.compose(certificate, self.session.address())
    }
}
