//! REST client for the DLP v2 job endpoints.
//!
//! Wraps job creation and retrieval using [`reqwest`].

use async_trait::async_trait;
use dlp_risk_core::job::DlpJob;
use dlp_risk_core::request::{RiskAnalysisJobConfig, RiskJobRequest};
use serde::Serialize;

use crate::client::{endpoint, parse_response, GcpClientConfig};
use crate::service::{RiskJobService, ServiceError};

/// HTTP client for the DLP API.
pub struct DlpApi {
    client: reqwest::Client,
    api_url: String,
    access_token: String,
}

/// Body of `POST /v2/{parent}/dlpJobs`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDlpJobBody<'a> {
    risk_job: &'a RiskAnalysisJobConfig,
}

impl DlpApi {
    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &GcpClientConfig) -> Self {
        Self {
            client,
            api_url: config.dlp_url.clone(),
            access_token: config.access_token.clone(),
        }
    }

    /// Submit a risk-analysis job under `request.parent`.
    ///
    /// Returns the job record with its service-assigned name and initial
    /// state (usually `PENDING`).
    pub async fn create_job(&self, request: &RiskJobRequest) -> Result<DlpJob, ServiceError> {
        let body = CreateDlpJobBody {
            risk_job: &request.job,
        };

        let response = self
            .client
            .post(endpoint(
                &self.api_url,
                &format!("v2/{}/dlpJobs", request.parent),
            ))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let job: DlpJob = parse_response(response).await?;
        tracing::info!(
            job_name = %job.name,
            state = %job.state,
            parent = %request.parent,
            "Risk analysis job created",
        );
        Ok(job)
    }

    /// Retrieve a job by resource name, e.g. `projects/p/dlpJobs/r-1`.
    pub async fn fetch_job(&self, name: &str) -> Result<DlpJob, ServiceError> {
        let response = self
            .client
            .get(endpoint(&self.api_url, &format!("v2/{name}")))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let job: DlpJob = parse_response(response).await?;
        tracing::debug!(job_name = %job.name, state = %job.state, "Fetched DLP job");
        Ok(job)
    }
}

#[async_trait]
impl RiskJobService for DlpApi {
    async fn create_risk_job(&self, request: &RiskJobRequest) -> Result<DlpJob, ServiceError> {
        self.create_job(request).await
    }

    async fn get_job(&self, name: &str) -> Result<DlpJob, ServiceError> {
        self.fetch_job(name).await
    }
}
