//! Metrics collection.
//!
//! # Metrics
//! - `certify_contract_calls_total` (counter): view calls by function, outcome
//! - `certify_cache_lookups_total` (counter): read cache hits and misses
//! - `certify_scan_ids_total` (counter): ids fetched or skipped by course scans
//! - `certify_submissions_total` (counter): issuance outcomes
//! - `certify_wallet_connected` (gauge): 1=connected, 0=disconnected
//!
//! Recording goes through the `metrics` facade; nothing is exported unless
//! the embedding process installs a recorder.

use metrics::{counter, gauge};

pub fn record_contract_call(function: &'static str, outcome: &'static str) {
    counter!("certify_contract_calls_total", "function" => function, "outcome" => outcome)
        .increment(1);
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("certify_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_scan(fetched: usize, skipped: usize) {
    counter!("certify_scan_ids_total", "result" => "fetched").increment(fetched as u64);
    counter!("certify_scan_ids_total", "result" => "skipped").increment(skipped as u64);
}

pub fn record_submission(outcome: &'static str) {
    counter!("certify_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_wallet_connected(connected: bool) {
    gauge!("certify_wallet_connected").set(if connected { 1.0 } else { 0.0 });
}
