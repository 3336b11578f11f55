use std::sync::Arc;

use dlp_risk_core::job::DlpJob;
use dlp_risk_core::report::{render_report, Report};
use dlp_risk_core::request::{RequestBuilder, RiskJobRequest};
use dlp_risk_core::CoreError;
use dlp_risk_gcp::service::{NotificationSource, RiskJobService, ServiceError};
use dlp_risk_gcp::waiter::{wait_for_job, WaitConfig, WaitError, WaitSummary};
use tokio_util::sync::CancellationToken;

/// Caller-supplied inputs for one privacy metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricInput {
    KAnonymity {
        quasi_ids: Vec<String>,
    },
    KMap {
        quasi_ids: Vec<String>,
        info_types: Vec<String>,
        region_code: Option<String>,
    },
    LDiversity {
        quasi_ids: Vec<String>,
        sensitive_attribute: String,
    },
    NumericalStats {
        column: String,
    },
    CategoricalStats {
        column: String,
    },
}

impl MetricInput {
    /// Validate and build the create-job request for this metric.
    pub fn build(&self, builder: &RequestBuilder) -> Result<RiskJobRequest, CoreError> {
        match self {
            MetricInput::KAnonymity { quasi_ids } => builder.k_anonymity(quasi_ids),
            MetricInput::KMap {
                quasi_ids,
                info_types,
                region_code,
            } => builder.k_map(quasi_ids, info_types, region_code.as_deref()),
            MetricInput::LDiversity {
                quasi_ids,
                sensitive_attribute,
            } => builder.l_diversity(quasi_ids, sensitive_attribute),
            MetricInput::NumericalStats { column } => builder.numerical_stats(column),
            MetricInput::CategoricalStats { column } => builder.categorical_stats(column),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Rejected before anything was sent.
    #[error(transparent)]
    Request(#[from] CoreError),

    #[error("Failed to create risk analysis job: {0}")]
    Submit(#[source] ServiceError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error("Failed to fetch job {name}: {source}")]
    Fetch {
        name: String,
        #[source]
        source: ServiceError,
    },
}

/// Everything a finished flow produced.
#[derive(Debug)]
pub struct FlowOutcome {
    /// The job as re-fetched after the notification.
    pub job: DlpJob,
    pub report: Report,
    pub wait: WaitSummary,
}

/// One risk-analysis run against injected services.
pub struct RiskFlow {
    jobs: Arc<dyn RiskJobService>,
    notifications: Arc<dyn NotificationSource>,
    wait: WaitConfig,
}

impl RiskFlow {
    pub fn new(
        jobs: Arc<dyn RiskJobService>,
        notifications: Arc<dyn NotificationSource>,
        wait: WaitConfig,
    ) -> Self {
        Self {
            jobs,
            notifications,
            wait,
        }
    }

    /// Validate `input`, then run the flow. Invalid input fails before
    /// any service call.
    pub async fn run_metric(
        &self,
        builder: &RequestBuilder,
        input: &MetricInput,
        cancel: &CancellationToken,
    ) -> Result<FlowOutcome, FlowError> {
        let request = input.build(builder)?;
        self.run(&request, cancel).await
    }

    /// Submit `request`, wait for its notification, re-fetch and report.
    pub async fn run(
        &self,
        request: &RiskJobRequest,
        cancel: &CancellationToken,
    ) -> Result<FlowOutcome, FlowError> {
        let metric = request.job.privacy_metric.kind();

        let submitted = self
            .jobs
            .create_risk_job(request)
            .await
            .map_err(FlowError::Submit)?;
        tracing::info!(
            job_name = %submitted.name,
            state = %submitted.state,
            %metric,
            "Job submitted",
        );

        let wait = wait_for_job(
            self.notifications.as_ref(),
            &submitted.name,
            &self.wait,
            cancel,
        )
        .await?;

        let job = self
            .jobs
            .get_job(&submitted.name)
            .await
            .map_err(|source| FlowError::Fetch {
                name: submitted.name.clone(),
                source,
            })?;
        tracing::info!(job_name = %job.name, state = %job.state, "Job fetched");

        let report = render_report(&job, metric);
        Ok(FlowOutcome { job, report, wait })
    }
}
