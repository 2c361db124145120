//! Shared utilities for integration tests: an in-memory certification
//! contract behind the `ChainGateway` trait.

#![allow(dead_code)]

use alloy::primitives::{address, Address, TxHash};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use certify_client::blockchain::cache::{CachedGateway, ReadCache};
use certify_client::blockchain::contract::{CallOutput, CertificationDetails, ContractCall, ContractWrite};
use certify_client::blockchain::gateway::ChainGateway;
use certify_client::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus, TokenId};
use certify_client::config::CertifyConfig;
use certify_client::AppContext;

/// Contract owner; the only account allowed to issue.
pub const ISSUER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const ALICE: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
pub const BOB: Address = address!("3c44cdddb6a900fa2b585dd299e03d12fa4293bc");
pub const CONTRACT: Address = address!("bc9bb1e472c072b085415481d83f11bbcc629915");

pub const BASE_TIMESTAMP: u64 = 1_700_000_000;

#[derive(Debug, Clone)]
struct Minted {
    details: CertificationDetails,
    owner: Address,
}

#[derive(Debug, Default)]
struct ChainState {
    minted: Vec<Minted>,
    pending: HashMap<TxHash, ContractWrite>,
    block: u64,
    next_tx: u8,
}

/// In-memory stand-in for the deployed contract.
#[derive(Debug)]
pub struct FakeChain {
    state: Mutex<ChainState>,
    signer: Mutex<Option<Address>>,
    failing: Mutex<HashSet<u64>>,
    reverting: Mutex<HashSet<u64>>,
    delays: Mutex<HashMap<u64, Duration>>,
    confirm_gate: Mutex<Option<watch::Receiver<bool>>>,
    call_log: Mutex<Vec<&'static str>>,
    submits: AtomicUsize,
}

impl FakeChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ChainState::default()),
            signer: Mutex::new(None),
            failing: Mutex::new(HashSet::new()),
            reverting: Mutex::new(HashSet::new()),
            delays: Mutex::new(HashMap::new()),
            confirm_gate: Mutex::new(None),
            call_log: Mutex::new(Vec::new()),
            submits: AtomicUsize::new(0),
        })
    }

    /// Mint directly, bypassing issuance. Returns the new id.
    pub fn seed(&self, owner: Address, course: &str, recipient: &str) -> TokenId {
        let mut state = self.state.lock().unwrap();
        let id = state.minted.len() as u64 + 1;
        state.minted.push(Minted {
            details: CertificationDetails {
                course_name: course.to_string(),
                recipient_name: recipient.to_string(),
                achievement_level: "Completion".to_string(),
                issue_date: BASE_TIMESTAMP + id,
                token_uri: String::new(),
            },
            owner,
        });
        TokenId::new(id).unwrap()
    }

    /// Account that signs submissions; `None` makes the chain read-only.
    pub fn set_signer(&self, signer: Option<Address>) {
        *self.signer.lock().unwrap() = signer;
    }

    /// Details reads for `id` fail with a transport error.
    pub fn fail_reads(&self, id: u64) {
        self.failing.lock().unwrap().insert(id);
    }

    /// Details reads for `id` revert although the id is within supply.
    pub fn revert_reads(&self, id: u64) {
        self.reverting.lock().unwrap().insert(id);
    }

    /// Details reads for `id` take `delay`.
    pub fn delay_reads(&self, id: u64, delay: Duration) {
        self.delays.lock().unwrap().insert(id, delay);
    }

    /// Hold confirmations until `true` is sent on the returned channel.
    pub fn hold_confirmations(&self) -> watch::Sender<bool> {
        let (tx, rx) = watch::channel(false);
        *self.confirm_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    pub fn calls_to(&self, function: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|name| **name == function)
            .count()
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.state.lock().unwrap().minted.len() as u64
    }

    fn lookup(&self, token_id: TokenId) -> BlockchainResult<Minted> {
        let state = self.state.lock().unwrap();
        let index = token_id.get() as usize - 1;
        state
            .minted
            .get(index)
            .cloned()
            .ok_or_else(|| BlockchainError::Reverted("ERC721NonexistentToken".to_string()))
    }
}

impl ChainGateway for FakeChain {
    async fn call(&self, call: ContractCall) -> BlockchainResult<CallOutput> {
        self.call_log.lock().unwrap().push(call.function_name());

        match call {
            ContractCall::Name => Ok(CallOutput::Text("CertificationNFT".to_string())),
            ContractCall::Symbol => Ok(CallOutput::Text("CERT".to_string())),
            ContractCall::TotalCertifications => Ok(CallOutput::Count(self.total())),
            ContractCall::GetCertifications { holder } => {
                let state = self.state.lock().unwrap();
                let ids = state
                    .minted
                    .iter()
                    .enumerate()
                    .filter(|(_, minted)| minted.owner == holder)
                    .filter_map(|(index, _)| TokenId::new(index as u64 + 1))
                    .collect();
                Ok(CallOutput::TokenIds(ids))
            }
            ContractCall::GetCertificationDetails { token_id } => {
                let delay = self.delays.lock().unwrap().get(&token_id.get()).copied();
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                if self.failing.lock().unwrap().contains(&token_id.get()) {
                    return Err(BlockchainError::Rpc("connection reset by peer".to_string()));
                }
                if self.reverting.lock().unwrap().contains(&token_id.get()) {
                    return Err(BlockchainError::Reverted("ERC721NonexistentToken".to_string()));
                }
                Ok(CallOutput::Details(self.lookup(token_id)?.details))
            }
            ContractCall::OwnerOf { token_id } => Ok(CallOutput::Owner(self.lookup(token_id)?.owner)),
            ContractCall::VerifyCertification { holder, course_name } => {
                let state = self.state.lock().unwrap();
                let held = state
                    .minted
                    .iter()
                    .any(|minted| minted.owner == holder && minted.details.course_name == course_name);
                Ok(CallOutput::Flag(held))
            }
        }
    }

    async fn submit(&self, write: ContractWrite) -> BlockchainResult<TxHash> {
        self.submits.fetch_add(1, Ordering::SeqCst);

        let signer = *self.signer.lock().unwrap();
        match signer {
            None => Err(BlockchainError::NotAvailable("no issuer wallet connected".to_string())),
            Some(signer) if signer != ISSUER => Err(BlockchainError::Reverted(format!(
                "OwnableUnauthorizedAccount({})",
                signer
            ))),
            Some(_) => {
                let mut state = self.state.lock().unwrap();
                state.next_tx += 1;
                let tx_hash = TxHash::with_last_byte(state.next_tx);
                state.pending.insert(tx_hash, write);
                Ok(tx_hash)
            }
        }
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let gate = self.confirm_gate.lock().unwrap().clone();
        if let Some(mut gate) = gate {
            gate.wait_for(|open| *open)
                .await
                .map_err(|_| BlockchainError::Rpc("gate closed".to_string()))?;
        }

        let mut state = self.state.lock().unwrap();
        let Some(write) = state.pending.remove(&tx_hash) else {
            return Ok(ConfirmationStatus::Failed("Transaction dropped".to_string()));
        };

        let ContractWrite::IssueCertification {
            recipient,
            course_name,
            recipient_name,
            achievement_level,
            token_uri,
        } = write;

        state.block += 1;
        let id = state.minted.len() as u64 + 1;
        state.minted.push(Minted {
            details: CertificationDetails {
                course_name,
                recipient_name,
                achievement_level,
                issue_date: BASE_TIMESTAMP + id,
                token_uri,
            },
            owner: recipient,
        });

        Ok(ConfirmationStatus::Confirmed {
            block_number: state.block,
            minted: TokenId::new(id),
        })
    }
}

/// Gateway with a read cache in front of `chain`.
pub fn cached(chain: &Arc<FakeChain>, ttl: Duration) -> (Arc<CachedGateway<Arc<FakeChain>>>, ReadCache) {
    let cache = ReadCache::new(ttl);
    (Arc::new(CachedGateway::new(Arc::clone(chain), cache.clone())), cache)
}

/// Default configuration (Polygon, chain 137).
pub fn test_config() -> CertifyConfig {
    CertifyConfig::default()
}

/// Application context over `chain`, without a cache.
pub fn context(chain: &Arc<FakeChain>) -> AppContext<Arc<FakeChain>> {
    AppContext::with_gateway(test_config(), CONTRACT, Arc::clone(chain), ReadCache::disabled())
        .unwrap()
}

pub fn ids(certificates: &[certify_client::certificates::Certificate]) -> Vec<u64> {
    certificates.iter().map(|c| c.token_id.get()).collect()
}
