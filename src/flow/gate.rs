//! Wallet and network readiness checks.

use thiserror::Error;

use crate::wallet::NetworkIdentity;

/// Chain the campaign contracts are deployed on (Sepolia test network).
pub const TARGET_CHAIN_ID: u64 = 11_155_111;

/// Structural blockers: the form is replaced by a guidance prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("no wallet")]
    NoWallet,

    #[error("wrong network")]
    WrongNetwork,
}

impl PreconditionError {
    /// The single action the user can take to clear this blocker.
    pub fn remedy(&self) -> Remedy {
        match self {
            PreconditionError::NoWallet => Remedy::ConnectWallet,
            PreconditionError::WrongNetwork => Remedy::SwitchNetwork(TARGET_CHAIN_ID),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remedy {
    ConnectWallet,
    SwitchNetwork(u64),
}

/// Outcome of evaluating the gate against a live identity snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    Ready { account: String },
    Blocked(PreconditionError),
}

impl GateStatus {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_ready(&self) -> bool {
        matches!(self, GateStatus::Ready { .. })
    }
}

/// Evaluate readiness. Callers pass a fresh identity on every check; nothing is cached.
pub fn evaluate(identity: &NetworkIdentity) -> GateStatus {
    let Some(account) = identity
        .account_address
        .as_deref()
        .filter(|a| !a.trim().is_empty())
    else {
        return GateStatus::Blocked(PreconditionError::NoWallet);
    };

    if identity.chain_id != Some(TARGET_CHAIN_ID) {
        return GateStatus::Blocked(PreconditionError::WrongNetwork);
    }

    GateStatus::Ready {
        account: account.to_string(),
    }
}
