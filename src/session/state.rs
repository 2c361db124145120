//! Wallet connection state.

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::blockchain::types::BlockchainError;
use crate::observability::metrics;

/// A connected wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectedWallet {
    pub address: Address,
    pub chain_id: u64,
}

/// Session lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Connected(Address),
    Disconnected,
}

/// Which wallet, if any, is viewing and acting.
///
/// One session per process, handed by reference to whoever needs the viewer
/// identity. A wallet on another chain is refused.
pub struct WalletSession {
    expected_chain_id: u64,
    current: ArcSwapOption<ConnectedWallet>,
    events: broadcast::Sender<SessionEvent>,
}

impl WalletSession {
    pub fn new(expected_chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            expected_chain_id,
            current: ArcSwapOption::empty(),
            events,
        }
    }

    /// Connect `address`, replacing any previous wallet.
    pub fn connect(&self, address: Address, chain_id: u64) -> Result<(), BlockchainError> {
        if chain_id != self.expected_chain_id {
            tracing::warn!(
                expected = self.expected_chain_id,
                actual = chain_id,
                "Refusing wallet on wrong chain"
            );
            return Err(BlockchainError::ChainMismatch {
                expected: self.expected_chain_id,
                actual: chain_id,
            });
        }

        self.current
            .store(Some(Arc::new(ConnectedWallet { address, chain_id })));
        metrics::record_wallet_connected(true);
        tracing::info!(address = %address, chain_id = chain_id, "Wallet connected");
        let _ = self.events.send(SessionEvent::Connected(address));
        Ok(())
    }

    pub fn disconnect(&self) {
        if self.current.swap(None).is_some() {
            metrics::record_wallet_connected(false);
            tracing::info!("Wallet disconnected");
            let _ = self.events.send(SessionEvent::Disconnected);
        }
    }

    pub fn current(&self) -> Option<ConnectedWallet> {
        self.current.load_full().map(|wallet| *wallet)
    }

    /// Address of the connected wallet.
    pub fn address(&self) -> Option<Address> {
        self.current().map(|wallet| wallet.address)
    }

    pub fn is_connected(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn expected_chain_id(&self) -> u64 {
        self.expected_chain_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("expected_chain_id", &self.expected_chain_id)
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const OWNER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    #[test]
    fn test_connect_and_disconnect() {
        let session = WalletSession::new(137);
        assert!(!session.is_connected());
        assert_eq!(session.address(), None);

        session.connect(OWNER, 137).unwrap();
        assert!(session.is_connected());
        assert_eq!(session.address(), Some(OWNER));

        session.disconnect();
        assert!(!session.is_connected());
    }

    #[test]
    fn test_wrong_chain_refused() {
        let session = WalletSession::new(137);
        let err = session.connect(OWNER, 1).unwrap_err();
        assert!(matches!(
            err,
            BlockchainError::ChainMismatch {
                expected: 137,
                actual: 1
            }
        ));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_events() {
        let session = WalletSession::new(31337);
        let mut events = session.subscribe();

        session.connect(OWNER, 31337).unwrap();
        session.disconnect();
        // Second disconnect is a no-op.
        session.disconnect();

        assert_eq!(events.recv().await.unwrap(), SessionEvent::Connected(OWNER));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Disconnected);
        assert!(events.try_recv().is_err());
    }
}
