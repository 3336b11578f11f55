//! In-memory fakes for the DLP job service and the pub/sub subscription.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dlp_risk_core::job::{
    DlpJob, JobState, KAnonymityEquivalenceClass, KAnonymityHistogramBucket, KAnonymityResult,
    RiskDetails,
};
use dlp_risk_core::request::{BigQueryTable, RequestBuilder, RiskJobRequest};
use dlp_risk_core::Value;
use dlp_risk_gcp::messages::{PubsubMessage, ReceivedMessage, JOB_NAME_ATTRIBUTE};
use dlp_risk_gcp::service::{NotificationSource, RiskJobService, ServiceError};
use dlp_risk_gcp::waiter::WaitConfig;

pub const JOB_NAME: &str = "projects/caller/dlpJobs/r-1001";

/// Records every call and answers with scripted jobs.
pub struct FakeJobService {
    pub created: Mutex<Vec<RiskJobRequest>>,
    pub fetched: Mutex<Vec<String>>,
    /// Returned by `get_job`.
    pub finished: DlpJob,
    pub reject_create: bool,
}

impl FakeJobService {
    pub fn new(finished: DlpJob) -> Arc<Self> {
        Arc::new(Self {
            created: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
            finished,
            reject_create: false,
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            created: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
            finished: DlpJob::default(),
            reject_create: true,
        })
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl RiskJobService for FakeJobService {
    async fn create_risk_job(&self, request: &RiskJobRequest) -> Result<DlpJob, ServiceError> {
        self.created.lock().unwrap().push(request.clone());
        if self.reject_create {
            return Err(ServiceError::ApiError {
                status: 429,
                body: r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#.into(),
            });
        }
        Ok(DlpJob {
            name: JOB_NAME.into(),
            state: JobState::Pending,
            ..Default::default()
        })
    }

    async fn get_job(&self, name: &str) -> Result<DlpJob, ServiceError> {
        self.fetched.lock().unwrap().push(name.to_string());
        Ok(self.finished.clone())
    }
}

/// Serves scripted batches, then empty pulls.
#[derive(Default)]
pub struct FakeSubscription {
    batches: Mutex<VecDeque<Vec<ReceivedMessage>>>,
    pub pulls: Mutex<u32>,
    pub acked: Mutex<Vec<String>>,
    pub fail_ack: bool,
}

impl FakeSubscription {
    pub fn new(batches: Vec<Vec<ReceivedMessage>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            ..Default::default()
        })
    }

    /// Same batches, but every acknowledge call fails.
    pub fn failing_ack(batches: Vec<Vec<ReceivedMessage>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            fail_ack: true,
            ..Default::default()
        })
    }

    pub fn acked(&self) -> Vec<String> {
        self.acked.lock().unwrap().clone()
    }

    pub fn pull_count(&self) -> u32 {
        *self.pulls.lock().unwrap()
    }
}

#[async_trait]
impl NotificationSource for FakeSubscription {
    async fn pull(&self, _max_messages: u32) -> Result<Vec<ReceivedMessage>, ServiceError> {
        *self.pulls.lock().unwrap() += 1;
        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn acknowledge(&self, ack_ids: &[String]) -> Result<(), ServiceError> {
        if self.fail_ack {
            return Err(ServiceError::ApiError {
                status: 403,
                body: r#"{"error":{"code":403,"status":"PERMISSION_DENIED"}}"#.into(),
            });
        }
        self.acked.lock().unwrap().extend_from_slice(ack_ids);
        Ok(())
    }
}

/// A completion notification naming `job_name`, as the DLP service sends it.
pub fn notification(ack_id: &str, job_name: &str) -> ReceivedMessage {
    ReceivedMessage {
        ack_id: ack_id.into(),
        message: PubsubMessage {
            attributes: HashMap::from([(JOB_NAME_ATTRIBUTE.to_string(), job_name.to_string())]),
            ..Default::default()
        },
    }
}

pub fn builder() -> RequestBuilder {
    RequestBuilder::new(
        "caller",
        BigQueryTable {
            project_id: "bigquery-public-data".into(),
            dataset_id: "samples".into(),
            table_id: "natality".into(),
        },
        "dlp-risk",
    )
}

pub fn wait_config() -> WaitConfig {
    WaitConfig {
        timeout: Duration::from_secs(60),
        max_messages: 10,
        idle_delay: Duration::from_millis(5),
    }
}

/// A finished k-anonymity job with `n` buckets of `m` classes each.
pub fn done_k_anonymity(n: usize, m: usize) -> DlpJob {
    let buckets = (0..n)
        .map(|b| KAnonymityHistogramBucket {
            equivalence_class_size_lower_bound: b as i64 + 1,
            equivalence_class_size_upper_bound: b as i64 + 1,
            bucket_size: m as i64,
            bucket_values: (0..m)
                .map(|v| KAnonymityEquivalenceClass {
                    quasi_ids_values: vec![Value::String(format!("state-{v}")), Value::Integer(0)],
                    equivalence_class_size: b as i64 + 1,
                })
                .collect(),
            bucket_value_count: m as i64,
        })
        .collect();

    DlpJob {
        name: JOB_NAME.into(),
        state: JobState::Done,
        risk_details: Some(RiskDetails {
            k_anonymity_result: Some(KAnonymityResult {
                equivalence_class_histogram_buckets: buckets,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
