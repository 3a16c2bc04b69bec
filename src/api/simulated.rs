//! Offline contribution backend for demos and local runs.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{ContributionError, ContributionService};
use crate::config::SimulationConfig;
use crate::flow::ContributionAmount;

pub struct SimulatedContributions {
    latency: Duration,
    fail: bool,
}

impl SimulatedContributions {
    pub fn new(latency: Duration, fail: bool) -> Self {
        Self { latency, fail }
    }

    pub fn from_config(cfg: &SimulationConfig) -> Self {
        Self::new(Duration::from_millis(cfg.latency_ms), cfg.fail)
    }
}

#[async_trait]
impl ContributionService for SimulatedContributions {
    async fn submit_contribution(
        &self,
        campaign_id: &str,
        amount: ContributionAmount,
        from_account: &str,
    ) -> Result<(), ContributionError> {
        tokio::time::sleep(self.latency).await;

        if self.fail {
            return Err(ContributionError::Simulated(format!(
                "campaign {campaign_id} refused {amount} from {from_account}"
            )));
        }

        info!(campaign_id, %amount, from_account, "simulated contribution settled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn resolves_after_latency() {
        let backend = SimulatedContributions::new(Duration::from_millis(1200), false);
        let start = tokio::time::Instant::now();
        let amount = ContributionAmount::parse("1").unwrap();

        backend
            .submit_contribution("camp", amount, "0xabc")
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1200));
    }

    #[tokio::test]
    async fn failing_mode_rejects() {
        let backend = SimulatedContributions::new(Duration::ZERO, true);
        let amount = ContributionAmount::parse("1").unwrap();

        let err = backend
            .submit_contribution("camp", amount, "0xabc")
            .await
            .unwrap_err();
        assert!(matches!(err, ContributionError::Simulated(_)));
    }
}
