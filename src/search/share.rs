//! Ownership-gated share links.

use alloy::primitives::Address;
use serde::Serialize;
use url::Url;

use crate::blockchain::explorer::Explorer;
use crate::certificates::types::Certificate;

/// A pre-filled post announcing a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub text: String,
    /// Explorer page of the token.
    pub target: String,
    /// Intent URL carrying `text` and `target`.
    pub url: String,
}

/// Composes share links. Purely local; never touches the chain.
#[derive(Debug, Clone)]
pub struct ShareComposer {
    intent_url: Url,
    explorer: Explorer,
    contract: Address,
}

impl ShareComposer {
    pub fn new(intent_url: &str, explorer: Explorer, contract: Address) -> Result<Self, url::ParseError> {
        Ok(Self {
            intent_url: Url::parse(intent_url)?,
            explorer,
            contract,
        })
    }

    /// Share link for `certificate`, offered only when `viewer` owns it.
    pub fn compose(&self, certificate: &Certificate, viewer: Option<Address>) -> Option<ShareLink> {
        if !certificate.is_owned_by(viewer) {
            return None;
        }

        let text = format!(
            "I earned the \"{}\" certificate ({}) as a soulbound NFT. Verified on-chain:",
            certificate.course_name, certificate.achievement_level
        );
        let target = self.explorer.token_url(self.contract, certificate.token_id);

        let mut url = self.intent_url.clone();
        url.query_pairs_mut()
            .append_pair("text", &text)
            .append_pair("url", &target);

        Some(ShareLink {
            text,
            target,
            url: url.into(),
        })
    }
}
