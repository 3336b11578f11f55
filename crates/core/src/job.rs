//! The DLP job record as returned by create and get calls.
//!
//! Only the parts of the record the reporter needs are modelled; unknown
//! fields are ignored. Counts are protobuf `int64` and go through
//! [`crate::int64`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Lifecycle state of a DLP job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    #[default]
    #[serde(rename = "JOB_STATE_UNSPECIFIED")]
    Unspecified,
    Pending,
    Running,
    Done,
    Canceled,
    Failed,
    Active,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Unspecified => "JOB_STATE_UNSPECIFIED",
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Done => "DONE",
            JobState::Canceled => "CANCELED",
            JobState::Failed => "FAILED",
            JobState::Active => "ACTIVE",
            JobState::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A DLP job handle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlpJob {
    /// Service-assigned resource name, e.g. `projects/p/dlpJobs/r-123`.
    pub name: String,
    #[serde(default)]
    pub state: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_details: Option<RiskDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JobError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// An error the service recorded while running the job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobError {
    #[serde(default)]
    pub details: Status,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<DateTime<Utc>>,
}

/// `google.rpc.Status` payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
}

/// Result of a risk-analysis job; one field is set, matching the metric.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_anonymity_result: Option<KAnonymityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_map_estimation_result: Option<KMapEstimationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l_diversity_result: Option<LDiversityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numerical_stats_result: Option<NumericalStatsResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_stats_result: Option<CategoricalStatsResult>,
}

// ---- k-anonymity ----

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KAnonymityResult {
    #[serde(default)]
    pub equivalence_class_histogram_buckets: Vec<KAnonymityHistogramBucket>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KAnonymityHistogramBucket {
    #[serde(default, with = "crate::int64")]
    pub equivalence_class_size_lower_bound: i64,
    #[serde(default, with = "crate::int64")]
    pub equivalence_class_size_upper_bound: i64,
    #[serde(default, with = "crate::int64")]
    pub bucket_size: i64,
    #[serde(default)]
    pub bucket_values: Vec<KAnonymityEquivalenceClass>,
    #[serde(default, with = "crate::int64")]
    pub bucket_value_count: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KAnonymityEquivalenceClass {
    #[serde(default)]
    pub quasi_ids_values: Vec<Value>,
    #[serde(default, with = "crate::int64")]
    pub equivalence_class_size: i64,
}

// ---- k-map ----

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KMapEstimationResult {
    #[serde(default)]
    pub k_map_estimation_histogram: Vec<KMapEstimationHistogramBucket>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KMapEstimationHistogramBucket {
    #[serde(default, with = "crate::int64")]
    pub min_anonymity: i64,
    #[serde(default, with = "crate::int64")]
    pub max_anonymity: i64,
    #[serde(default, with = "crate::int64")]
    pub bucket_size: i64,
    #[serde(default)]
    pub bucket_values: Vec<KMapEstimationQuasiIdValues>,
    #[serde(default, with = "crate::int64")]
    pub bucket_value_count: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KMapEstimationQuasiIdValues {
    #[serde(default)]
    pub quasi_ids_values: Vec<Value>,
    #[serde(default, with = "crate::int64")]
    pub estimated_anonymity: i64,
}

// ---- l-diversity ----

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LDiversityResult {
    #[serde(default)]
    pub sensitive_value_frequency_histogram_buckets: Vec<LDiversityHistogramBucket>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LDiversityHistogramBucket {
    #[serde(default, with = "crate::int64")]
    pub sensitive_value_frequency_lower_bound: i64,
    #[serde(default, with = "crate::int64")]
    pub sensitive_value_frequency_upper_bound: i64,
    #[serde(default, with = "crate::int64")]
    pub bucket_size: i64,
    #[serde(default)]
    pub bucket_values: Vec<LDiversityEquivalenceClass>,
    #[serde(default, with = "crate::int64")]
    pub bucket_value_count: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LDiversityEquivalenceClass {
    #[serde(default)]
    pub quasi_ids_values: Vec<Value>,
    #[serde(default, with = "crate::int64")]
    pub equivalence_class_size: i64,
    #[serde(default, with = "crate::int64")]
    pub num_distinct_sensitive_values: i64,
    #[serde(default)]
    pub top_sensitive_values: Vec<ValueFrequency>,
}

/// A value and how many times it occurs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueFrequency {
    #[serde(default)]
    pub value: Value,
    #[serde(default, with = "crate::int64")]
    pub count: i64,
}

// ---- numerical / categorical ----

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericalStatsResult {
    #[serde(default)]
    pub min_value: Value,
    #[serde(default)]
    pub max_value: Value,
    /// Quantiles from 0% to 100%, one per percent.
    #[serde(default)]
    pub quantile_values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalStatsResult {
    #[serde(default)]
    pub value_frequency_histogram_buckets: Vec<CategoricalStatsHistogramBucket>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalStatsHistogramBucket {
    #[serde(default, with = "crate::int64")]
    pub value_frequency_lower_bound: i64,
    #[serde(default, with = "crate::int64")]
    pub value_frequency_upper_bound: i64,
    #[serde(default, with = "crate::int64")]
    pub bucket_size: i64,
    #[serde(default)]
    pub bucket_values: Vec<ValueFrequency>,
    #[serde(default, with = "crate::int64")]
    pub bucket_value_count: i64,
}

impl DlpJob {
    /// Parse a job record from its JSON representation.
    pub fn from_json(text: &str) -> Result<Self, crate::CoreError> {
        Ok(serde_json::from_str(text)?)
    }
}
