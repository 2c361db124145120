//! Wallet session.
//!
//! # States
//! ```text
//! Disconnected → Connected: connect(address, chain_id) on the configured chain
//! Connected → Connected: connect() with another account
//! Connected → Disconnected: disconnect()
//! ```

pub mod state;

pub use state::{ConnectedWallet, SessionEvent, WalletSession};
