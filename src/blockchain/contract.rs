//! Certification contract interface.
//!
//! The ABI is owned by the deployed contract; this module only mirrors it.
//! Reads are expressed as [`ContractCall`] values so they can be hashed into
//! cache keys, and decoded into a uniform [`CallOutput`].

use alloy::primitives::{Address, Bytes};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Serialize;

use crate::blockchain::types::{u256_to_u64, BlockchainError, BlockchainResult, TokenId};

sol! {
    interface ICertificationNFT {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function totalCertifications() external view returns (uint256);
        function getCertifications(address holder) external view returns (uint256[] memory);
        function getCertificationDetails(uint256 tokenId)
            external
            view
            returns (
                string memory courseName,
                string memory recipientName,
                string memory achievementLevel,
                uint256 issueDate,
                string memory tokenURI
            );
        function ownerOf(uint256 tokenId) external view returns (address);
        function verifyCertification(address holder, string memory courseName) external view returns (bool);
        function issueCertification(
            address recipient,
            string memory courseName,
            string memory recipientName,
            string memory achievementLevel,
            string memory tokenURI
        ) external returns (uint256);

        /// ERC-721 transfer; emitted with `from == 0` on mint.
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
    }
}

/// A read-only contract function together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContractCall {
    Name,
    Symbol,
    TotalCertifications,
    GetCertifications { holder: Address },
    GetCertificationDetails { token_id: TokenId },
    OwnerOf { token_id: TokenId },
    VerifyCertification { holder: Address, course_name: String },
}

impl ContractCall {
    /// Solidity function name, used for logs and metrics labels.
    pub fn function_name(&self) -> &'static str {
        match self {
            ContractCall::Name => "name",
            ContractCall::Symbol => "symbol",
            ContractCall::TotalCertifications => "totalCertifications",
            ContractCall::GetCertifications { .. } => "getCertifications",
            ContractCall::GetCertificationDetails { .. } => "getCertificationDetails",
            ContractCall::OwnerOf { .. } => "ownerOf",
            ContractCall::VerifyCertification { .. } => "verifyCertification",
        }
    }

    /// Calls whose answer can never change once it exists.
    ///
    /// Certificates are soulbound and immutable, so details and owner of a
    /// minted id are stable; so are the collection name and symbol.
    pub fn is_immutable(&self) -> bool {
        matches!(
            self,
            ContractCall::Name
                | ContractCall::Symbol
                | ContractCall::GetCertificationDetails { .. }
                | ContractCall::OwnerOf { .. }
        )
    }

    /// ABI-encode the call data.
    pub fn encode(&self) -> Bytes {
        let data = match self {
            ContractCall::Name => ICertificationNFT::nameCall {}.abi_encode(),
            ContractCall::Symbol => ICertificationNFT::symbolCall {}.abi_encode(),
            ContractCall::TotalCertifications => {
                ICertificationNFT::totalCertificationsCall {}.abi_encode()
            }
            ContractCall::GetCertifications { holder } => {
                ICertificationNFT::getCertificationsCall { holder: *holder }.abi_encode()
            }
            ContractCall::GetCertificationDetails { token_id } => {
                ICertificationNFT::getCertificationDetailsCall {
                    tokenId: token_id.to_u256(),
                }
                .abi_encode()
            }
            ContractCall::OwnerOf { token_id } => ICertificationNFT::ownerOfCall {
                tokenId: token_id.to_u256(),
            }
            .abi_encode(),
            ContractCall::VerifyCertification {
                holder,
                course_name,
            } => ICertificationNFT::verifyCertificationCall {
                holder: *holder,
                courseName: course_name.clone(),
            }
            .abi_encode(),
        };
        data.into()
    }

    /// Decode raw return data for this call.
    pub fn decode_output(&self, data: &[u8]) -> BlockchainResult<CallOutput> {
        let function = self.function_name();
        let decode_err =
            |e: alloy::sol_types::Error| BlockchainError::Decode(format!("{}: {}", function, e));

        let output = match self {
            ContractCall::Name => CallOutput::Text(
                ICertificationNFT::nameCall::abi_decode_returns(data).map_err(decode_err)?,
            ),
            ContractCall::Symbol => CallOutput::Text(
                ICertificationNFT::symbolCall::abi_decode_returns(data).map_err(decode_err)?,
            ),
            ContractCall::TotalCertifications => {
                let total = ICertificationNFT::totalCertificationsCall::abi_decode_returns(data)
                    .map_err(decode_err)?;
                CallOutput::Count(u256_to_u64(total, "totalCertifications")?)
            }
            ContractCall::GetCertifications { .. } => {
                let raw = ICertificationNFT::getCertificationsCall::abi_decode_returns(data)
                    .map_err(decode_err)?;
                let ids = raw
                    .into_iter()
                    .map(TokenId::try_from)
                    .collect::<BlockchainResult<Vec<_>>>()?;
                CallOutput::TokenIds(ids)
            }
            ContractCall::GetCertificationDetails { .. } => {
                let ret = ICertificationNFT::getCertificationDetailsCall::abi_decode_returns(data)
                    .map_err(decode_err)?;
                CallOutput::Details(CertificationDetails {
                    course_name: ret.courseName,
                    recipient_name: ret.recipientName,
                    achievement_level: ret.achievementLevel,
                    issue_date: u256_to_u64(ret.issueDate, "issueDate")?,
                    token_uri: ret.tokenURI,
                })
            }
            ContractCall::OwnerOf { .. } => CallOutput::Owner(
                ICertificationNFT::ownerOfCall::abi_decode_returns(data).map_err(decode_err)?,
            ),
            ContractCall::VerifyCertification { .. } => CallOutput::Flag(
                ICertificationNFT::verifyCertificationCall::abi_decode_returns(data)
                    .map_err(decode_err)?,
            ),
        };
        Ok(output)
    }
}

/// Raw per-token fields as returned by `getCertificationDetails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificationDetails {
    pub course_name: String,
    pub recipient_name: String,
    pub achievement_level: String,
    pub issue_date: u64,
    pub token_uri: String,
}

/// Decoded result of a [`ContractCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutput {
    Count(u64),
    Text(String),
    TokenIds(Vec<TokenId>),
    Details(CertificationDetails),
    Owner(Address),
    Flag(bool),
}

impl CallOutput {
    pub fn into_count(self, function: &'static str) -> BlockchainResult<u64> {
        match self {
            CallOutput::Count(n) => Ok(n),
            _ => Err(BlockchainError::UnexpectedOutput { function }),
        }
    }

    pub fn into_text(self, function: &'static str) -> BlockchainResult<String> {
        match self {
            CallOutput::Text(s) => Ok(s),
            _ => Err(BlockchainError::UnexpectedOutput { function }),
        }
    }

    pub fn into_token_ids(self, function: &'static str) -> BlockchainResult<Vec<TokenId>> {
        match self {
            CallOutput::TokenIds(ids) => Ok(ids),
            _ => Err(BlockchainError::UnexpectedOutput { function }),
        }
    }

    pub fn into_details(self, function: &'static str) -> BlockchainResult<CertificationDetails> {
        match self {
            CallOutput::Details(d) => Ok(d),
            _ => Err(BlockchainError::UnexpectedOutput { function }),
        }
    }

    pub fn into_owner(self, function: &'static str) -> BlockchainResult<Address> {
        match self {
            CallOutput::Owner(a) => Ok(a),
            _ => Err(BlockchainError::UnexpectedOutput { function }),
        }
    }

    pub fn into_flag(self, function: &'static str) -> BlockchainResult<bool> {
        match self {
            CallOutput::Flag(b) => Ok(b),
            _ => Err(BlockchainError::UnexpectedOutput { function }),
        }
    }
}

/// A state-changing contract function together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractWrite {
    IssueCertification {
        recipient: Address,
        course_name: String,
        recipient_name: String,
        achievement_level: String,
        token_uri: String,
    },
}

impl ContractWrite {
    pub fn function_name(&self) -> &'static str {
        match self {
            ContractWrite::IssueCertification { .. } => "issueCertification",
        }
    }

    /// Address whose on-chain view changes when this write lands.
    pub fn recipient(&self) -> Address {
        match self {
            ContractWrite::IssueCertification { recipient, .. } => *recipient,
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            ContractWrite::IssueCertification {
                recipient,
                course_name,
                recipient_name,
                achievement_level,
                token_uri,
            } => ICertificationNFT::issueCertificationCall {
                recipient: *recipient,
                courseName: course_name.clone(),
                recipientName: recipient_name.clone(),
                achievementLevel: achievement_level.clone(),
                tokenURI: token_uri.clone(),
            }
            .abi_encode()
            .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use alloy::sol_types::SolValue;

    fn id(n: u64) -> TokenId {
        TokenId::new(n).unwrap()
    }

    #[test]
    fn test_selectors_match_interface() {
        let data = ContractCall::TotalCertifications.encode();
        assert_eq!(
            &data[..4],
            ICertificationNFT::totalCertificationsCall::SELECTOR.as_slice()
        );

        let data = ContractCall::OwnerOf { token_id: id(7) }.encode();
        assert_eq!(&data[..4], ICertificationNFT::ownerOfCall::SELECTOR.as_slice());
        assert_eq!(data.len(), 4 + 32);
    }

    #[test]
    fn test_decode_count() {
        let data = U256::from(3u64).abi_encode();
        let out = ContractCall::TotalCertifications.decode_output(&data).unwrap();
        assert_eq!(out, CallOutput::Count(3));
    }

    #[test]
    fn test_decode_details() {
        let data = (
            "Web3 Basics".to_string(),
            "Ada".to_string(),
            "Beginner".to_string(),
            U256::from(1_700_000_000u64),
            String::new(),
        )
            .abi_encode_params();
        let out = ContractCall::GetCertificationDetails { token_id: id(1) }
            .decode_output(&data)
            .unwrap()
            .into_details("getCertificationDetails")
            .unwrap();
        assert_eq!(out.course_name, "Web3 Basics");
        assert_eq!(out.recipient_name, "Ada");
        assert_eq!(out.issue_date, 1_700_000_000);
        assert!(out.token_uri.is_empty());
    }

    #[test]
    fn test_decode_token_ids_keeps_contract_order() {
        let data = vec![U256::from(4u64), U256::from(2u64)].abi_encode();
        let holder = Address::ZERO;
        let ids = ContractCall::GetCertifications { holder }
            .decode_output(&data)
            .unwrap()
            .into_token_ids("getCertifications")
            .unwrap();
        assert_eq!(ids, vec![id(4), id(2)]);
    }

    #[test]
    fn test_decode_garbage_is_error() {
        let out = ContractCall::TotalCertifications.decode_output(&[1, 2, 3]);
        assert!(matches!(out, Err(BlockchainError::Decode(_))));
    }

    #[test]
    fn test_unexpected_output_shape() {
        let err = CallOutput::Flag(true).into_count("totalCertifications").unwrap_err();
        assert!(err.to_string().contains("totalCertifications"));
    }

    #[test]
    fn test_immutability_classification() {
        assert!(ContractCall::OwnerOf { token_id: id(1) }.is_immutable());
        assert!(!ContractCall::TotalCertifications.is_immutable());
        assert!(!ContractCall::GetCertifications {
            holder: Address::ZERO
        }
        .is_immutable());
    }

    #[test]
    fn test_issue_encoding() {
        let write = ContractWrite::IssueCertification {
            recipient: Address::repeat_byte(0xaa),
            course_name: "X".into(),
            recipient_name: "Bob".into(),
            achievement_level: "Completion".into(),
            token_uri: String::new(),
        };
        let data = write.encode();
        assert_eq!(
            &data[..4],
            ICertificationNFT::issueCertificationCall::SELECTOR.as_slice()
        );
        assert_eq!(write.recipient(), Address::repeat_byte(0xaa));
        assert_eq!(write.function_name(), "issueCertification");
    }
}
