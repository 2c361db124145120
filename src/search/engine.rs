//! Owner search and course-name scan.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;

use crate::blockchain::gateway::ChainGateway;
use crate::blockchain::types::TokenId;
use crate::certificates::repository::{CertificateRepository, RepositoryError};
use crate::certificates::types::Certificate;
use crate::observability::metrics;
use crate::search::query::SearchQuery;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ChainRead(#[from] RepositoryError),
}

pub type SearchResult<T> = Result<T, SearchError>;

/// Results of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub query: SearchQuery,
    pub certificates: Vec<Certificate>,
    /// Ids whose read failed or reverted and were left out.
    pub skipped: Vec<TokenId>,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Non-fatal notice when some ids could not be read.
    pub fn warning(&self) -> Option<String> {
        if self.skipped.is_empty() {
            return None;
        }
        let ids: Vec<String> = self.skipped.iter().map(|id| format!("#{}", id)).collect();
        Some(format!(
            "{} certificate(s) could not be loaded and were skipped: {}",
            self.skipped.len(),
            ids.join(", ")
        ))
    }
}

/// Finds certificates by owner or by course name.
#[derive(Debug, Clone)]
pub struct SearchEngine<G> {
    repository: CertificateRepository<G>,
    concurrency: usize,
}

impl<G: ChainGateway> SearchEngine<G> {
    pub fn new(repository: CertificateRepository<G>, concurrency: usize) -> Self {
        Self {
            repository,
            concurrency: concurrency.max(1),
        }
    }

    pub fn repository(&self) -> &CertificateRepository<G> {
        &self.repository
    }

    pub async fn search(&self, query: SearchQuery) -> SearchResult<SearchReport> {
        match query {
            SearchQuery::Owner(owner) => {
                let ids = self.repository.get_owned_ids(owner).await?;
                let (certificates, skipped) = self.fetch_in_order(ids).await;
                tracing::debug!(owner = %owner, found = certificates.len(), "Owner search done");
                Ok(SearchReport {
                    query,
                    certificates,
                    skipped,
                })
            }
            SearchQuery::Course(ref text) => {
                let (certificates, skipped) = self.scan_courses(text).await?;
                Ok(SearchReport {
                    query,
                    certificates,
                    skipped,
                })
            }
        }
    }

    /// Fetch `ids` keeping their order; unreadable ids are skipped.
    async fn fetch_in_order(&self, ids: Vec<TokenId>) -> (Vec<Certificate>, Vec<TokenId>) {
        let results: Vec<_> = stream::iter(ids)
            .map(|id| async move { (id, self.repository.get_certificate(id).await) })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut certificates = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (id, result) in results {
            match result {
                Ok(Some(certificate)) => certificates.push(certificate),
                Ok(None) => {
                    tracing::warn!(token_id = %id, "Owned id has no certificate");
                    skipped.push(id);
                }
                Err(e) => {
                    tracing::warn!(token_id = %id, error = %e, "Skipping unreadable certificate");
                    skipped.push(id);
                }
            }
        }
        (certificates, skipped)
    }

    /// Walk every id in `1..=total` and keep case-insensitive course matches.
    ///
    /// Reads run concurrently and complete in any order; the result is sorted
    /// by id. Failing the total count is fatal; failing or reverting on a single id is not.
    async fn scan_courses(&self, text: &str) -> SearchResult<(Vec<Certificate>, Vec<TokenId>)> {
        let needle = text.to_lowercase();
        let total = self.repository.get_total_count().await?;
        tracing::debug!(total = total, query = %text, "Scanning certificates");

        let results: Vec<_> = stream::iter((1..=total).filter_map(TokenId::new))
            .map(|id| async move { (id, self.repository.get_certificate(id).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut matches = Vec::new();
        let mut skipped = Vec::new();
        let mut fetched = 0usize;
        for (id, result) in results {
            match result {
                Ok(Some(certificate)) => {
                    fetched += 1;
                    if certificate.course_matches(&needle) {
                        matches.push(certificate);
                    }
                }
                Ok(None) => {
                    tracing::warn!(token_id = %id, "Id within supply is not readable");
                    skipped.push(id);
                }
                Err(e) => {
                    tracing::warn!(token_id = %id, error = %e, "Skipping unreadable certificate");
                    skipped.push(id);
                }
            }
        }

        matches.sort_by_key(|certificate| certificate.token_id);
        skipped.sort();
        metrics::record_scan(fetched, skipped.len());
        Ok((matches, skipped))
    }
}
