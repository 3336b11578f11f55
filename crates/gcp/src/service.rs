//! Service seams used by the risk-analysis flow.
//!
//! The flow only talks to the cloud through these two traits, so tests
//! can substitute in-memory fakes for [`DlpApi`](crate::DlpApi) and
//! [`PubSubApi`](crate::PubSubApi).

use async_trait::async_trait;
use dlp_risk_core::job::DlpJob;
use dlp_risk_core::request::RiskJobRequest;

use crate::messages::ReceivedMessage;

/// Errors from a remote Google Cloud API.
///
/// Carries the service's reply unchanged; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body, usually a `google.rpc.Status` JSON object.
        body: String,
    },
}

/// Creates and fetches DLP risk-analysis jobs.
#[async_trait]
pub trait RiskJobService: Send + Sync {
    /// Submit a job. Single attempt.
    async fn create_risk_job(&self, request: &RiskJobRequest) -> Result<DlpJob, ServiceError>;

    /// Fetch the current job record by its full resource name.
    async fn get_job(&self, name: &str) -> Result<DlpJob, ServiceError>;
}

/// Pull-based notification channel (one pub/sub subscription).
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Pull up to `max_messages` messages. May return an empty batch.
    async fn pull(&self, max_messages: u32) -> Result<Vec<ReceivedMessage>, ServiceError>;

    /// Acknowledge the given messages by ack id.
    async fn acknowledge(&self, ack_ids: &[String]) -> Result<(), ServiceError>;
}
