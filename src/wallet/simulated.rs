//! In-memory wallet used by the CLI, the terminal UI, and tests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use super::{NetworkIdentity, Wallet};
use crate::config::WalletConfig;

/// Identity plus connection progress, published to subscribers on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletStatus {
    pub identity: NetworkIdentity,
    pub connecting: bool,
}

#[derive(Debug, Clone)]
pub struct SimulatedWallet {
    status: Arc<watch::Sender<WalletStatus>>,
    connect_account: String,
    connect_chain_id: u64,
    connect_delay: Duration,
    switch_delay: Duration,
}

impl SimulatedWallet {
    /// A disconnected wallet that connects to the configured account on request.
    pub fn from_config(cfg: &WalletConfig) -> Self {
        Self::with_status(
            WalletStatus::default(),
            cfg.account.clone(),
            cfg.chain_id,
            Duration::from_millis(cfg.connect_delay_ms),
            Duration::from_millis(cfg.switch_delay_ms),
        )
    }

    /// A wallet already connected to `account` on `chain_id`; requests apply instantly.
    pub fn connected(account: impl Into<String>, chain_id: u64) -> Self {
        let account = account.into();
        Self::with_status(
            WalletStatus {
                identity: NetworkIdentity {
                    account_address: Some(account.clone()),
                    chain_id: Some(chain_id),
                },
                connecting: false,
            },
            account,
            chain_id,
            Duration::ZERO,
            Duration::ZERO,
        )
    }

    /// A disconnected wallet whose connect request yields `account` on `chain_id` instantly.
    pub fn disconnected(account: impl Into<String>, chain_id: u64) -> Self {
        Self::with_status(
            WalletStatus::default(),
            account.into(),
            chain_id,
            Duration::ZERO,
            Duration::ZERO,
        )
    }

    fn with_status(
        status: WalletStatus,
        connect_account: String,
        connect_chain_id: u64,
        connect_delay: Duration,
        switch_delay: Duration,
    ) -> Self {
        let (tx, _rx) = watch::channel(status);
        Self {
            status: Arc::new(tx),
            connect_account,
            connect_chain_id,
            connect_delay,
            switch_delay,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletStatus> {
        self.status.subscribe()
    }

    /// Simulate the user disconnecting from the wallet extension.
    pub fn disconnect(&self) {
        info!("wallet disconnected");
        self.status.send_modify(|s| {
            s.identity = NetworkIdentity::default();
            s.connecting = false;
        });
    }

    /// Simulate the user changing network from inside the wallet.
    pub fn set_chain_id(&self, chain_id: u64) {
        info!(chain_id, "wallet network changed");
        self.status.send_modify(|s| {
            if s.identity.account_address.is_some() {
                s.identity.chain_id = Some(chain_id);
            }
        });
    }

    /// Simulate the user switching to a different account.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_account(&self, account: impl Into<String>) {
        let account = account.into();
        info!(%account, "wallet account changed");
        self.status.send_modify(|s| {
            s.identity.account_address = Some(account);
            if s.identity.chain_id.is_none() {
                s.identity.chain_id = Some(self.connect_chain_id);
            }
        });
    }

    fn apply_after(&self, delay: Duration, apply: impl FnOnce(&mut WalletStatus) + Send + 'static) {
        let status = Arc::clone(&self.status);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) if !delay.is_zero() => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    status.send_modify(apply);
                });
            }
            _ => status.send_modify(apply),
        }
    }
}

impl Wallet for SimulatedWallet {
    fn current_account(&self) -> Option<String> {
        self.status.borrow().identity.account_address.clone()
    }

    fn current_chain_id(&self) -> Option<u64> {
        self.status.borrow().identity.chain_id
    }

    fn is_connecting(&self) -> bool {
        self.status.borrow().connecting
    }

    fn request_connect(&self) {
        let already = {
            let s = self.status.borrow();
            s.connecting || s.identity.account_address.is_some()
        };
        if already {
            debug!("connect requested while already connecting or connected");
            return;
        }

        info!(account = %self.connect_account, "wallet connect requested");
        self.status.send_modify(|s| s.connecting = true);

        let account = self.connect_account.clone();
        let chain_id = self.connect_chain_id;
        self.apply_after(self.connect_delay, move |s| {
            s.identity.account_address = Some(account);
            s.identity.chain_id = Some(chain_id);
            s.connecting = false;
        });
    }

    fn request_network_switch(&self, target_chain_id: u64) {
        if self.status.borrow().identity.account_address.is_none() {
            debug!("network switch requested without a connected account");
            return;
        }

        info!(target_chain_id, "wallet network switch requested");
        self.apply_after(self.switch_delay, move |s| {
            if s.identity.account_address.is_some() {
                s.identity.chain_id = Some(target_chain_id);
            }
        });
    }
}
