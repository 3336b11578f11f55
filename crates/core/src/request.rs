//! Risk-analysis job descriptors and the builder that validates them.
//!
//! The serialized shape follows the JSON mapping of the DLP v2
//! `RiskAnalysisJobConfig` message, so a [`RiskJobRequest`] can be sent
//! to the service as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Region used for k-map estimation when the caller does not pick one.
pub const DEFAULT_REGION_CODE: &str = "US";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A column reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldId {
    pub name: String,
}

/// A DLP info type, e.g. `AGE` or `US_ZIP_5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoType {
    pub name: String,
}

/// A k-map quasi-identifier: a column plus the info type describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedField {
    pub field: FieldId,
    pub info_type: InfoType,
}

/// Fully-qualified BigQuery table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BigQueryTable {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KAnonymityConfig {
    pub quasi_ids: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KMapEstimationConfig {
    pub quasi_ids: Vec<TaggedField>,
    pub region_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LDiversityConfig {
    pub quasi_ids: Vec<FieldId>,
    pub sensitive_attribute: FieldId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericalStatsConfig {
    pub field: FieldId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStatsConfig {
    pub field: FieldId,
}

/// The privacy metric to compute. Exactly one per job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivacyMetric {
    #[serde(rename = "kAnonymityConfig")]
    KAnonymity(KAnonymityConfig),
    #[serde(rename = "kMapEstimationConfig")]
    KMap(KMapEstimationConfig),
    #[serde(rename = "lDiversityConfig")]
    LDiversity(LDiversityConfig),
    #[serde(rename = "numericalStatsConfig")]
    NumericalStats(NumericalStatsConfig),
    #[serde(rename = "categoricalStatsConfig")]
    CategoricalStats(CategoricalStatsConfig),
}

/// Publish a notification to a pub/sub topic once the job finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishToPubSub {
    /// Full topic resource name, `projects/{project}/topics/{topic}`.
    pub topic: String,
}

/// Post-completion action attached to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    PubSub(PublishToPubSub),
}

/// The job description sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysisJobConfig {
    pub privacy_metric: PrivacyMetric,
    pub source_table: BigQueryTable,
    pub actions: Vec<Action>,
}

/// A validated create-job request: the parent resource plus the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskJobRequest {
    /// `projects/{calling project}`.
    pub parent: String,
    pub job: RiskAnalysisJobConfig,
}

// ---------------------------------------------------------------------------
// MetricKind
// ---------------------------------------------------------------------------

/// Which privacy metric a job computes, without its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    KAnonymity,
    KMap,
    LDiversity,
    NumericalStats,
    CategoricalStats,
}

impl PrivacyMetric {
    pub fn kind(&self) -> MetricKind {
        match self {
            PrivacyMetric::KAnonymity(_) => MetricKind::KAnonymity,
            PrivacyMetric::KMap(_) => MetricKind::KMap,
            PrivacyMetric::LDiversity(_) => MetricKind::LDiversity,
            PrivacyMetric::NumericalStats(_) => MetricKind::NumericalStats,
            PrivacyMetric::CategoricalStats(_) => MetricKind::CategoricalStats,
        }
    }

    /// Number of quasi-identifier columns, zero for single-column metrics.
    pub fn quasi_id_count(&self) -> usize {
        match self {
            PrivacyMetric::KAnonymity(c) => c.quasi_ids.len(),
            PrivacyMetric::KMap(c) => c.quasi_ids.len(),
            PrivacyMetric::LDiversity(c) => c.quasi_ids.len(),
            PrivacyMetric::NumericalStats(_) | PrivacyMetric::CategoricalStats(_) => 0,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKind::KAnonymity => "k-anonymity",
            MetricKind::KMap => "k-map estimation",
            MetricKind::LDiversity => "l-diversity",
            MetricKind::NumericalStats => "numerical stats",
            MetricKind::CategoricalStats => "categorical stats",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Resource names
// ---------------------------------------------------------------------------

pub fn project_name(project_id: &str) -> String {
    format!("projects/{project_id}")
}

pub fn topic_name(project_id: &str, topic_id: &str) -> String {
    format!("projects/{project_id}/topics/{topic_id}")
}

pub fn subscription_name(project_id: &str, subscription_id: &str) -> String {
    format!("projects/{project_id}/subscriptions/{subscription_id}")
}

// ---------------------------------------------------------------------------
// RequestBuilder
// ---------------------------------------------------------------------------

/// Builds [`RiskJobRequest`]s for one calling project, table and topic.
///
/// Every `*` method validates its input and returns
/// [`CoreError::InvalidArgument`] without side effects on failure.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    calling_project: String,
    table: BigQueryTable,
    topic_id: String,
}

impl RequestBuilder {
    /// * `calling_project` - project that owns the job and the topic.
    /// * `table`           - table to analyze, possibly in another project.
    /// * `topic_id`        - short topic id notified when the job ends.
    pub fn new(
        calling_project: impl Into<String>,
        table: BigQueryTable,
        topic_id: impl Into<String>,
    ) -> Self {
        Self {
            calling_project: calling_project.into(),
            table,
            topic_id: topic_id.into(),
        }
    }

    pub fn k_anonymity(&self, quasi_ids: &[String]) -> Result<RiskJobRequest, CoreError> {
        let quasi_ids = field_ids(quasi_ids)?;
        self.build(PrivacyMetric::KAnonymity(KAnonymityConfig { quasi_ids }))
    }

    /// The i-th info type describes the i-th quasi-identifier, so both
    /// lists must have the same length.
    pub fn k_map(
        &self,
        quasi_ids: &[String],
        info_types: &[String],
        region_code: Option<&str>,
    ) -> Result<RiskJobRequest, CoreError> {
        if quasi_ids.len() != info_types.len() {
            return Err(CoreError::InvalidArgument(format!(
                "Number of info types ({}) and number of quasi-identifiers ({}) must be equal",
                info_types.len(),
                quasi_ids.len()
            )));
        }
        let fields = field_ids(quasi_ids)?;
        let mut tagged = Vec::with_capacity(fields.len());
        for (field, info_type) in fields.into_iter().zip(info_types) {
            require_non_blank("info type", info_type)?;
            tagged.push(TaggedField {
                field,
                info_type: InfoType {
                    name: info_type.clone(),
                },
            });
        }

        let region_code = region_code.unwrap_or(DEFAULT_REGION_CODE);
        require_non_blank("region code", region_code)?;

        self.build(PrivacyMetric::KMap(KMapEstimationConfig {
            quasi_ids: tagged,
            region_code: region_code.to_string(),
        }))
    }

    pub fn l_diversity(
        &self,
        quasi_ids: &[String],
        sensitive_attribute: &str,
    ) -> Result<RiskJobRequest, CoreError> {
        let quasi_ids = field_ids(quasi_ids)?;
        require_non_blank("sensitive attribute", sensitive_attribute)?;
        self.build(PrivacyMetric::LDiversity(LDiversityConfig {
            quasi_ids,
            sensitive_attribute: FieldId {
                name: sensitive_attribute.to_string(),
            },
        }))
    }

    pub fn numerical_stats(&self, column: &str) -> Result<RiskJobRequest, CoreError> {
        require_non_blank("column", column)?;
        self.build(PrivacyMetric::NumericalStats(NumericalStatsConfig {
            field: FieldId {
                name: column.to_string(),
            },
        }))
    }

    pub fn categorical_stats(&self, column: &str) -> Result<RiskJobRequest, CoreError> {
        require_non_blank("column", column)?;
        self.build(PrivacyMetric::CategoricalStats(CategoricalStatsConfig {
            field: FieldId {
                name: column.to_string(),
            },
        }))
    }

    fn build(&self, privacy_metric: PrivacyMetric) -> Result<RiskJobRequest, CoreError> {
        require_non_blank("calling project id", &self.calling_project)?;
        require_non_blank("table project id", &self.table.project_id)?;
        require_non_blank("dataset id", &self.table.dataset_id)?;
        require_non_blank("table id", &self.table.table_id)?;
        require_non_blank("topic id", &self.topic_id)?;

        Ok(RiskJobRequest {
            parent: project_name(&self.calling_project),
            job: RiskAnalysisJobConfig {
                privacy_metric,
                source_table: self.table.clone(),
                actions: vec![Action::PubSub(PublishToPubSub {
                    topic: topic_name(&self.calling_project, &self.topic_id),
                })],
            },
        })
    }
}

fn require_non_blank(what: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidArgument(format!("{what} must not be empty")));
    }
    Ok(())
}

fn field_ids(names: &[String]) -> Result<Vec<FieldId>, CoreError> {
    if names.is_empty() {
        return Err(CoreError::InvalidArgument(
            "At least one quasi-identifier is required".to_string(),
        ));
    }
    names
        .iter()
        .map(|name| {
            require_non_blank("quasi-identifier", name)?;
            Ok(FieldId { name: name.clone() })
        })
        .collect()
}
