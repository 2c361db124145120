//! Typed reads over the chain gateway.

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::contract::ContractCall;
use crate::blockchain::gateway::ChainGateway;
use crate::blockchain::types::{BlockchainError, TokenId};
use crate::certificates::types::{Certificate, ContractInfo};

/// A read failed for a reason other than "does not exist".
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Chain read failed: {0}")]
    ChainRead(#[from] BlockchainError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Read-only access to certificates.
///
/// Every method is idempotent and side-effect free. An id that was never
/// minted is reported as `None`, not as an error.
#[derive(Debug, Clone)]
pub struct CertificateRepository<G> {
    gateway: G,
    contract: Address,
}

impl<G: ChainGateway> CertificateRepository<G> {
    pub fn new(gateway: G, contract: Address) -> Self {
        Self { gateway, contract }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Current `totalCertifications()`.
    pub async fn get_total_count(&self) -> RepositoryResult<u64> {
        let call = ContractCall::TotalCertifications;
        let function = call.function_name();
        Ok(self.gateway.call(call).await?.into_count(function)?)
    }

    /// Fetch one certificate, or `None` if the id was never minted.
    ///
    /// Details and owner are read concurrently.
    pub async fn get_certificate(&self, token_id: TokenId) -> RepositoryResult<Option<Certificate>> {
        let details_call = ContractCall::GetCertificationDetails { token_id };
        let details_fn = details_call.function_name();

        let (details, owner) = tokio::join!(
            self.gateway.call(details_call),
            self.get_owner_of(token_id)
        );

        let details = match details {
            Ok(output) => output.into_details(details_fn)?,
            Err(e) if e.is_revert() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match owner? {
            Some(owner) => Ok(Some(Certificate::from_details(token_id, details, owner))),
            None => Ok(None),
        }
    }

    /// Ids held by `holder`, in the order the contract returns them.
    pub async fn get_owned_ids(&self, holder: Address) -> RepositoryResult<Vec<TokenId>> {
        let call = ContractCall::GetCertifications { holder };
        let function = call.function_name();
        Ok(self.gateway.call(call).await?.into_token_ids(function)?)
    }

    /// Owner of `token_id`, or `None` if the id was never minted.
    pub async fn get_owner_of(&self, token_id: TokenId) -> RepositoryResult<Option<Address>> {
        let call = ContractCall::OwnerOf { token_id };
        let function = call.function_name();
        match self.gateway.call(call).await {
            Ok(output) => Ok(Some(output.into_owner(function)?)),
            Err(e) if e.is_revert() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Exact (case-sensitive) course check performed by the contract.
    pub async fn verify(&self, holder: Address, course_name: &str) -> RepositoryResult<bool> {
        let call = ContractCall::VerifyCertification {
            holder,
            course_name: course_name.to_string(),
        };
        let function = call.function_name();
        Ok(self.gateway.call(call).await?.into_flag(function)?)
    }

    /// Collection name, symbol and current supply.
    pub async fn contract_info(&self) -> RepositoryResult<ContractInfo> {
        let (name, symbol, total) = tokio::join!(
            self.gateway.call(ContractCall::Name),
            self.gateway.call(ContractCall::Symbol),
            self.get_total_count()
        );

        Ok(ContractInfo {
            address: self.contract,
            name: name?.into_text("name")?,
            symbol: symbol?.into_text("symbol")?,
            total: total?,
        })
    }
}
