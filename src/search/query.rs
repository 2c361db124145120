//! Search query classification.

use alloy::primitives::Address;
use serde::Serialize;
use std::fmt;

use crate::validation::{parse_address, ValidationError};

/// How to interpret raw search input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// `0x…` is an owner, anything else a course name.
    #[default]
    Auto,
    Owner,
    Course,
}

/// A validated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum SearchQuery {
    /// Certificates held by an address.
    Owner(Address),
    /// Certificates whose course name contains the text (case-insensitive).
    Course(String),
}

impl SearchQuery {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::with_mode(input, SearchMode::Auto)
    }

    pub fn with_mode(input: &str, mode: SearchMode) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        match mode {
            SearchMode::Owner => Ok(SearchQuery::Owner(parse_address(trimmed)?)),
            SearchMode::Course => Ok(SearchQuery::Course(trimmed.to_string())),
            SearchMode::Auto if trimmed.starts_with("0x") => {
                Ok(SearchQuery::Owner(parse_address(trimmed)?))
            }
            SearchMode::Auto => Ok(SearchQuery::Course(trimmed.to_string())),
        }
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchQuery::Owner(address) => write!(f, "owner {}", address),
            SearchQuery::Course(text) => write!(f, "course \"{}\"", text),
        }
    }
}
