//! Client-side input validation.
//!
//! Runs before any chain interaction; a failure here never reaches the
//! gateway.

use alloy::primitives::Address;
use std::str::FromStr;
use thiserror::Error;

use crate::blockchain::types::InvalidTokenId;

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid wallet address")]
    InvalidAddress(String),

    #[error("{0} is required")]
    EmptyField(&'static str),

    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error(transparent)]
    InvalidTokenId(#[from] InvalidTokenId),
}

/// Parse an account address.
///
/// Requires the `0x` prefix and 40 hex digits. All-lowercase and
/// all-uppercase digits are accepted as is; mixed case must be a valid
/// EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidAddress(input.to_string());

    let hex = trimmed.strip_prefix("0x").ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(trimmed, None).map_err(|_| invalid())
    } else {
        Address::from_str(trimmed).map_err(|_| invalid())
    }
}

/// Required field text, kept as entered; blank input counts as empty.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        // Lowercase, uppercase, and a correct checksum
        assert!(parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").is_ok());
        assert!(parse_address("0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266").is_ok());
        assert!(parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").is_ok());
        assert!(parse_address("  0xbc9bb1E472c072B085415481D83f11BBcC629915 ").is_ok());
    }

    #[test]
    fn test_invalid_addresses() {
        for input in [
            "not-an-address",
            "",
            "0x",
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb9226",
            "0xg39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            // Broken checksum
            "0xf39Fd6e51aad88F6F4ce6aB8827279cfffB92266",
        ] {
            assert!(
                matches!(parse_address(input), Err(ValidationError::InvalidAddress(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_case_insensitive_equality() {
        let lower = parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        let mixed = parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Course name", "Rust 101 ").unwrap(), "Rust 101 ");
        assert_eq!(
            require_text("Course name", "   "),
            Err(ValidationError::EmptyField("Course name"))
        );
    }
}
