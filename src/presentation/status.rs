//! Status lines, contract stats and error reports.

use std::fmt::Write;

use crate::blockchain::explorer::Explorer;
use crate::certificates::types::ContractInfo;
use crate::config::NetworkPreset;
use crate::error::{ErrorKind, ErrorReport};
use crate::issuance::workflow::IssuanceStatus;
use crate::presentation::card::short_address;

pub fn render_status(status: &IssuanceStatus, explorer: &Explorer) -> String {
    match status {
        IssuanceStatus::Idle => "Ready".to_string(),
        IssuanceStatus::PendingApproval => "Waiting for wallet approval...".to_string(),
        IssuanceStatus::PendingConfirmation { tx_hash } => format!(
            "Transaction submitted, waiting for confirmation: {}",
            explorer.tx_url(*tx_hash)
        ),
        IssuanceStatus::Confirmed {
            tx_hash,
            block_number,
            token_id,
            ..
        } => {
            let minted = token_id
                .map(|id| format!(" as #{}", id))
                .unwrap_or_default();
            format!(
                "Certificate issued{} in block {}: {}",
                minted,
                block_number,
                explorer.tx_url(*tx_hash)
            )
        }
        IssuanceStatus::Failed { message } => format!("Issuance failed: {}", message),
    }
}

pub fn render_info(info: &ContractInfo, network: NetworkPreset, explorer: &Explorer) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", info.name, info.symbol);
    let _ = writeln!(out, "  Network:              {} (chain {})", network, network.chain_id());
    let _ = writeln!(
        out,
        "  Contract:             {} ({})",
        short_address(info.address),
        explorer.address_url(info.address)
    );
    let _ = write!(out, "  Certificates issued:  {}", info.total);
    out
}

pub fn render_error(report: &ErrorReport) -> String {
    match report.kind {
        ErrorKind::NotFound => report.message.clone(),
        ErrorKind::Validation => format!("invalid input: {}", report.message),
        ErrorKind::ChainRead => format!("could not read from the chain: {}", report.message),
        ErrorKind::ChainWrite => format!("transaction failed: {}", report.message),
    }
}
