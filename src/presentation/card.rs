//! Certificate cards and search result listings.

use alloy::primitives::Address;
use chrono::DateTime;
use std::fmt::Write;

use crate::blockchain::explorer::Explorer;
use crate::certificates::types::Certificate;
use crate::search::engine::SearchReport;
use crate::search::share::ShareLink;

/// `0x1234...abcd` form of an address.
pub fn short_address(address: Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Issue date as e.g. `March 5, 2024` (UTC).
pub fn format_issue_date(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| format!("@{}", timestamp))
}

/// Render one certificate.
pub fn render_card(
    certificate: &Certificate,
    explorer: &Explorer,
    contract: Address,
    share: Option<&ShareLink>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{}  {}", certificate.token_id, certificate.course_name);
    let _ = writeln!(out, "    Soulbound Certificate");
    let _ = writeln!(out, "    Awarded to:        {}", certificate.recipient_name);
    let _ = writeln!(out, "    Achievement Level: {}", certificate.achievement_level);
    let _ = writeln!(out, "    Issue Date:        {}", format_issue_date(certificate.issue_date));
    let _ = writeln!(
        out,
        "    Owner:             {} ({})",
        short_address(certificate.owner),
        explorer.address_url(certificate.owner)
    );
    if let Some(uri) = &certificate.metadata_uri {
        let _ = writeln!(out, "    Metadata:          {}", uri);
    }
    let _ = writeln!(
        out,
        "    Token:             {}",
        explorer.token_url(contract, certificate.token_id)
    );
    if let Some(link) = share {
        let _ = writeln!(out, "    Share:             {}", link.url);
    }
    let _ = write!(out, "    Non-transferable \u{2022} Verified on-chain");
    out
}

/// Render a search result list; `share` decides per certificate whether a
/// share link is offered.
pub fn render_report<F>(
    report: &SearchReport,
    explorer: &Explorer,
    contract: Address,
    share: F,
) -> String
where
    F: Fn(&Certificate) -> Option<ShareLink>,
{
    let mut out = String::new();
    if report.is_empty() {
        let _ = writeln!(out, "No certificates found for {}.", report.query);
    } else {
        let _ = writeln!(
            out,
            "{} certificate(s) for {}:",
            report.certificates.len(),
            report.query
        );
        for certificate in &report.certificates {
            let link = share(certificate);
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", render_card(certificate, explorer, contract, link.as_ref()));
        }
    }
    if let Some(warning) = report.warning() {
        let _ = writeln!(out);
        let _ = writeln!(out, "warning: {}", warning);
    }
    out
}
