//! Issuance form input and its validation.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::blockchain::contract::ContractWrite;
use crate::validation::{parse_address, require_text, ValidationError};

/// Raw form fields as entered by the issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceForm {
    pub recipient_address: String,
    pub course_name: String,
    pub recipient_name: String,
    pub achievement_level: String,
    /// Optional metadata URI (`ipfs://…` or `https://…`).
    pub metadata_uri: String,
}

impl IssuanceForm {
    /// Check every field; nothing touches the chain until this succeeds.
    pub fn validate(&self) -> Result<IssuanceRequest, ValidationError> {
        let recipient = parse_address(&self.recipient_address)?;
        let course_name = require_text("Course name", &self.course_name)?;
        let recipient_name = require_text("Recipient name", &self.recipient_name)?;
        let achievement_level = require_text("Achievement level", &self.achievement_level)?;
        let metadata_uri = Some(self.metadata_uri.trim().to_string()).filter(|uri| !uri.is_empty());

        Ok(IssuanceRequest {
            recipient,
            course_name,
            recipient_name,
            achievement_level,
            metadata_uri,
        })
    }

    /// Empty every field (after a confirmed issuance).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A validated issuance, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceRequest {
    pub recipient: Address,
    pub course_name: String,
    pub recipient_name: String,
    pub achievement_level: String,
    pub metadata_uri: Option<String>,
}

impl IssuanceRequest {
    pub fn to_write(&self) -> ContractWrite {
        ContractWrite::IssueCertification {
            recipient: self.recipient,
            course_name: self.course_name.clone(),
            recipient_name: self.recipient_name.clone(),
            achievement_level: self.achievement_level.clone(),
            token_uri: self.metadata_uri.clone().unwrap_or_default(),
        }
    }
}
