//! Wallet collaborator.
//!
//! The contribution flow only reads the wallet's identity and asks it to connect
//! or switch networks; how that happens is up to the implementation.

mod simulated;

pub use simulated::{SimulatedWallet, WalletStatus};

/// Account and chain currently reported by the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkIdentity {
    pub account_address: Option<String>,
    pub chain_id: Option<u64>,
}

pub trait Wallet: Send + Sync {
    fn current_account(&self) -> Option<String>;

    fn current_chain_id(&self) -> Option<u64>;

    fn is_connecting(&self) -> bool;

    /// Ask the wallet to connect. No-op while connecting or once connected.
    fn request_connect(&self);

    fn request_network_switch(&self, target_chain_id: u64);

    fn identity(&self) -> NetworkIdentity {
        NetworkIdentity {
            account_address: self.current_account(),
            chain_id: self.current_chain_id(),
        }
    }
}
