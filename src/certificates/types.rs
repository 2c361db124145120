//! Certificate data model.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::contract::CertificationDetails;
use crate::blockchain::types::TokenId;

/// A minted, soulbound certificate as read from the contract.
///
/// Every field is fixed at mint; the client never mutates a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub token_id: TokenId,
    pub course_name: String,
    pub recipient_name: String,
    /// Opaque text; the contract does not enforce [`AchievementLevel`].
    pub achievement_level: String,
    /// Unix timestamp (seconds) of issuance.
    pub issue_date: u64,
    pub metadata_uri: Option<String>,
    pub owner: Address,
}

impl Certificate {
    pub fn from_details(token_id: TokenId, details: CertificationDetails, owner: Address) -> Self {
        let metadata_uri = Some(details.token_uri).filter(|uri| !uri.trim().is_empty());
        Self {
            token_id,
            course_name: details.course_name,
            recipient_name: details.recipient_name,
            achievement_level: details.achievement_level,
            issue_date: details.issue_date,
            metadata_uri,
            owner,
        }
    }

    /// Case-insensitive substring match on the course name.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn course_matches(&self, needle_lower: &str) -> bool {
        self.course_name.to_lowercase().contains(needle_lower)
    }

    /// Whether `viewer` owns this certificate.
    ///
    /// Addresses compare by value, so differences in hex letter case (e.g.
    /// checksummed vs lowercase input) do not matter.
    pub fn is_owned_by(&self, viewer: Option<Address>) -> bool {
        viewer == Some(self.owner)
    }
}

/// Collection-level information shown on the landing view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub total: u64,
}

/// Levels offered by the issuance form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Participation,
    Completion,
    Excellence,
}

impl AchievementLevel {
    pub const ALL: [AchievementLevel; 7] = [
        AchievementLevel::Beginner,
        AchievementLevel::Intermediate,
        AchievementLevel::Advanced,
        AchievementLevel::Expert,
        AchievementLevel::Participation,
        AchievementLevel::Completion,
        AchievementLevel::Excellence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AchievementLevel::Beginner => "Beginner",
            AchievementLevel::Intermediate => "Intermediate",
            AchievementLevel::Advanced => "Advanced",
            AchievementLevel::Expert => "Expert",
            AchievementLevel::Participation => "Participation",
            AchievementLevel::Completion => "Completion",
            AchievementLevel::Excellence => "Excellence",
        }
    }
}

impl fmt::Display for AchievementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AchievementLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown achievement level '{}'", wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(course: &str, uri: &str) -> CertificationDetails {
        CertificationDetails {
            course_name: course.to_string(),
            recipient_name: "Ada".to_string(),
            achievement_level: "Gold Star".to_string(),
            issue_date: 1_700_000_000,
            token_uri: uri.to_string(),
        }
    }

    #[test]
    fn test_from_details() {
        let id = TokenId::new(1).unwrap();
        let cert = Certificate::from_details(id, details("Rust", ""), Address::ZERO);
        assert!(cert.metadata_uri.is_none());
        // Level is kept verbatim even though it is not a known level
        assert_eq!(cert.achievement_level, "Gold Star");

        let cert = Certificate::from_details(id, details("Rust", "ipfs://abc"), Address::ZERO);
        assert_eq!(cert.metadata_uri.as_deref(), Some("ipfs://abc"));
    }

    #[test]
    fn test_course_match_is_case_insensitive_substring() {
        let id = TokenId::new(1).unwrap();
        let cert = Certificate::from_details(
            id,
            details("Blockchain Development Bootcamp", ""),
            Address::ZERO,
        );
        assert!(cert.course_matches("block"));
        assert!(cert.course_matches("development boot"));
        assert!(!cert.course_matches("cooking"));
    }

    #[test]
    fn test_ownership() {
        let owner = Address::repeat_byte(0xab);
        let cert = Certificate::from_details(TokenId::new(2).unwrap(), details("X", ""), owner);
        assert!(cert.is_owned_by(Some(owner)));
        assert!(!cert.is_owned_by(Some(Address::repeat_byte(0xcd))));
        assert!(!cert.is_owned_by(None));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("expert".parse::<AchievementLevel>(), Ok(AchievementLevel::Expert));
        assert_eq!(" Completion ".parse::<AchievementLevel>(), Ok(AchievementLevel::Completion));
        assert!("Legendary".parse::<AchievementLevel>().is_err());
        assert_eq!(AchievementLevel::Excellence.to_string(), "Excellence");
    }
}
