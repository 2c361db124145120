//! Block explorer links.

use alloy::primitives::{Address, TxHash};
use url::Url;

use crate::blockchain::types::TokenId;

/// Builds links into an Etherscan-style block explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explorer {
    base: Url,
}

impl Explorer {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn address_url(&self, address: Address) -> String {
        self.join(&format!("address/{}", address))
    }

    pub fn tx_url(&self, tx_hash: TxHash) -> String {
        self.join(&format!("tx/{}", tx_hash))
    }

    pub fn token_url(&self, contract: Address, token_id: TokenId) -> String {
        self.join(&format!("token/{}?a={}", contract, token_id))
    }

    fn join(&self, path: &str) -> String {
        // Base already ends with '/', so join cannot fail for these relative paths
        self.base
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base, path))
    }
}
