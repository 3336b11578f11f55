//! Pub/Sub pull message types.
//!
//! The DLP service publishes one message per finished job to the topic
//! named in the job's actions. The job's resource name travels in the
//! [`JOB_NAME_ATTRIBUTE`] message attribute.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attribute carrying the finished job's resource name.
pub const JOB_NAME_ATTRIBUTE: &str = "DlpJobName";

/// Response of `POST /v1/{subscription}:pull`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    /// Absent when no messages were available.
    #[serde(default)]
    pub received_messages: Vec<ReceivedMessage>,
}

/// A message together with the ack id needed to acknowledge it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub ack_id: String,
    pub message: PubsubMessage,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
    /// Base64-encoded payload. Not needed for matching, kept opaque.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub publish_time: Option<DateTime<Utc>>,
}

/// Body of `POST /v1/{subscription}:pull`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub max_messages: u32,
}

/// Body of `POST /v1/{subscription}:acknowledge`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest<'a> {
    pub ack_ids: &'a [String],
}

impl ReceivedMessage {
    /// Build a message carrying only a job-name attribute.
    #[cfg(test)]
    pub(crate) fn for_job(ack_id: impl Into<String>, job_name: impl Into<String>) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(JOB_NAME_ATTRIBUTE.to_string(), job_name.into());
        Self {
            ack_id: ack_id.into(),
            message: PubsubMessage {
                attributes,
                ..Default::default()
            },
        }
    }

    /// The job name this notification refers to, if any.
    pub fn job_name(&self) -> Option<&str> {
        self.message
            .attributes
            .get(JOB_NAME_ATTRIBUTE)
            .map(String::as_str)
    }
}

/// Parse a pull response body.
pub fn parse_pull_response(text: &str) -> Result<PullResponse, serde_json::Error> {
    serde_json::from_str(text)
}
