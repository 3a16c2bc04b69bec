//! Contribution collaborator.
//!
//! Executes a contribution against a campaign. The flow treats every
//! implementation as a black box that either resolves or fails.

mod client;
mod simulated;

use async_trait::async_trait;
use thiserror::Error;

use crate::flow::ContributionAmount;

pub use client::HttpContributions;
pub use simulated::SimulatedContributions;

/// Errors raised by contribution backends. Never shown verbatim to the user.
#[derive(Error, Debug)]
pub enum ContributionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend rejected contribution: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Simulated failure: {0}")]
    Simulated(String),

    #[error("Invalid contribution URL: {0}")]
    InvalidUrl(String),

    #[error("Contribution task ended unexpectedly: {0}")]
    Interrupted(String),
}

#[async_trait]
pub trait ContributionService: Send + Sync {
    async fn submit_contribution(
        &self,
        campaign_id: &str,
        amount: ContributionAmount,
        from_account: &str,
    ) -> Result<(), ContributionError>;
}
