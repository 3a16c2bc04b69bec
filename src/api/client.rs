//! HTTP contribution backend.
//!
//! Posts contributions to the campaign service. A failed attempt is never
//! retried here: the user decides whether to submit again.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, info};

use super::{ContributionError, ContributionService};
use crate::config::ApiConfig;
use crate::flow::{ContributionAmount, FeeSplit, FEE_RATE};
use crate::idempotency;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Serialize)]
struct ContributionPayload<'a> {
    from_account: &'a str,
    amount: ContributionAmount,
    platform_fee: f64,
    net_to_campaign: f64,
    fee_rate: f64,
    submitted_at: DateTime<Utc>,
}

pub struct HttpContributions {
    client: Client,
    base_url: String,
}

impl HttpContributions {
    pub fn from_config(cfg: &ApiConfig) -> Self {
        Self::with_settings(&cfg.base_url, cfg.timeout_seconds, cfg.verify_ssl)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_url(base_url: &str) -> Self {
        Self::with_settings(base_url, 30, true)
    }

    fn with_settings(base_url: &str, timeout_seconds: u64, verify_ssl: bool) -> Self {
        let timeout = Duration::from_secs(timeout_seconds.max(1));
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .unwrap_or_else(|_| Client::new());

        HttpContributions {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The campaign id is a single path segment, percent-encoded as-is.
    fn contributions_url(&self, campaign_id: &str) -> Result<Url, ContributionError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ContributionError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ContributionError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "campaigns", campaign_id, "contributions"]);
        Ok(url)
    }
}

#[async_trait]
impl ContributionService for HttpContributions {
    async fn submit_contribution(
        &self,
        campaign_id: &str,
        amount: ContributionAmount,
        from_account: &str,
    ) -> Result<(), ContributionError> {
        let split = FeeSplit::for_amount(amount);
        let payload = ContributionPayload {
            from_account,
            amount,
            platform_fee: split.platform_fee,
            net_to_campaign: split.net_to_campaign,
            fee_rate: FEE_RATE,
            submitted_at: Utc::now(),
        };
        let key = idempotency::new_contribution_key();
        let url = self.contributions_url(campaign_id)?;
        debug!(%url, %key, "posting contribution");

        let response = self
            .client
            .post(url)
            .header(IDEMPOTENCY_HEADER, &key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(campaign_id, %amount, "contribution accepted by backend");
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ContributionError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return DEFAULT_API_URL.to_string();
    }
    trimmed.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Json, Path};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde_json::Value;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Received {
        campaign_id: String,
        idempotency_key: Option<String>,
        body: Value,
    }

    async fn spawn_server(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (addr, handle)
    }

    fn recording_backend(status: StatusCode, seen: Arc<Mutex<Vec<Received>>>) -> Router {
        Router::new().route(
            "/api/campaigns/:campaign_id/contributions",
            post(
                move |Path(campaign_id): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
                    let seen = Arc::clone(&seen);
                    async move {
                        seen.lock().await.push(Received {
                            campaign_id,
                            idempotency_key: headers
                                .get(IDEMPOTENCY_HEADER)
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string),
                            body,
                        });
                        (status, "backend says no")
                    }
                },
            ),
        )
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/"),
            "https://api.example.com"
        );
        assert_eq!(normalize_base_url("  "), DEFAULT_API_URL);
    }

    #[test]
    fn test_contributions_url() {
        let client = HttpContributions::with_url("https://api.example.com/");
        assert_eq!(
            client.contributions_url("camp-7").unwrap().as_str(),
            "https://api.example.com/api/campaigns/camp-7/contributions"
        );

        let nested = HttpContributions::with_url("https://api.example.com/v2/");
        assert_eq!(
            nested.contributions_url("camp-7").unwrap().as_str(),
            "https://api.example.com/v2/api/campaigns/camp-7/contributions"
        );
    }

    #[test]
    fn campaign_id_stays_one_path_segment() {
        let client = HttpContributions::with_url("https://api.example.com");
        let url = client.contributions_url("a/../../admin?x=1#").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/campaigns/a%2F..%2F..%2Fadmin%3Fx=1%23/contributions"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let padded = client.contributions_url(" camp ").unwrap();
        assert_eq!(
            padded.as_str(),
            "https://api.example.com/api/campaigns/%20camp%20/contributions"
        );
    }

    #[tokio::test]
    async fn invalid_base_url_is_reported() {
        let client = HttpContributions::with_url("not a url");
        let amount = ContributionAmount::parse("1").unwrap();
        let err = client
            .submit_contribution("camp", amount, "0xabc")
            .await
            .unwrap_err();
        assert!(matches!(err, ContributionError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn posts_contribution_with_fee_split() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (addr, handle) =
            spawn_server(recording_backend(StatusCode::CREATED, Arc::clone(&seen))).await;

        let client = HttpContributions::with_url(&format!("http://{addr}"));
        let amount = ContributionAmount::parse("2").unwrap();
        client
            .submit_contribution("camp-1", amount, "0xabc")
            .await
            .unwrap();

        let seen = seen.lock().await;
        assert_eq!(seen.len(), 1);
        let req = &seen[0];
        assert_eq!(req.campaign_id, "camp-1");
        assert!(req
            .idempotency_key
            .as_deref()
            .is_some_and(|k| k.starts_with("campaign-contribute-")));
        assert_eq!(req.body["from_account"], "0xabc");
        assert_eq!(req.body["amount"], 2.0);
        assert_eq!(req.body["platform_fee"], 0.1);
        assert_eq!(req.body["net_to_campaign"], 1.9);
        assert_eq!(req.body["fee_rate"], 0.05);
        assert!(req.body["submitted_at"].is_string());

        handle.abort();
    }

    #[tokio::test]
    async fn campaign_id_reaches_backend_unchanged() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (addr, handle) =
            spawn_server(recording_backend(StatusCode::CREATED, Arc::clone(&seen))).await;

        let client = HttpContributions::with_url(&format!("http://{addr}"));
        let amount = ContributionAmount::parse("1").unwrap();
        client
            .submit_contribution("spring/2025?draft", amount, "0xabc")
            .await
            .unwrap();

        assert_eq!(seen.lock().await[0].campaign_id, "spring/2025?draft");
        handle.abort();
    }

    #[tokio::test]
    async fn non_success_status_is_rejected_without_retry() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (addr, handle) = spawn_server(recording_backend(
            StatusCode::INTERNAL_SERVER_ERROR,
            Arc::clone(&seen),
        ))
        .await;

        let client = HttpContributions::with_url(&format!("http://{addr}"));
        let amount = ContributionAmount::parse("1.5").unwrap();
        let err = client
            .submit_contribution("camp-1", amount, "0xabc")
            .await
            .unwrap_err();

        match err {
            ContributionError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend says no");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(seen.lock().await.len(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Bind and drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpContributions::with_url(&format!("http://{addr}"));
        let amount = ContributionAmount::parse("1").unwrap();
        let err = client
            .submit_contribution("camp-1", amount, "0xabc")
            .await
            .unwrap_err();
        assert!(matches!(err, ContributionError::Network(_)));
    }
}
