//! Notification-driven wait for a submitted job.
//!
//! [`wait_for_job`] pulls from a [`NotificationSource`] until a message
//! names the submitted job. Every pulled message is acknowledged exactly
//! once, whether or not it matches. The wait ends early when the
//! deadline passes or the [`CancellationToken`] is triggered.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::messages::ReceivedMessage;
use crate::service::{NotificationSource, ServiceError};

/// Tunables for [`wait_for_job`].
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Give up after this long without a matching notification.
    pub timeout: Duration,
    /// Maximum messages requested per pull.
    pub max_messages: u32,
    /// Pause after an empty pull before pulling again.
    pub idle_delay: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            max_messages: 10,
            idle_delay: Duration::from_secs(1),
        }
    }
}

/// Counters describing a successful wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitSummary {
    /// Pull calls made, including empty ones.
    pub pulls: u32,
    /// Messages acknowledged, the match included.
    pub acknowledged: usize,
    /// Messages that referred to another job or to none.
    pub ignored: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// Pull or acknowledge failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("No notification for the job within {0:?}")]
    TimedOut(Duration),

    #[error("Wait cancelled")]
    Cancelled,
}

/// Block until a notification for `job_name` arrives.
///
/// Matching is exact string equality on the job-name attribute and does
/// not depend on arrival order. A batch containing the match is fully
/// acknowledged before returning.
pub async fn wait_for_job(
    source: &dyn NotificationSource,
    job_name: &str,
    config: &WaitConfig,
    cancel: &CancellationToken,
) -> Result<WaitSummary, WaitError> {
    let deadline = deadline_after(config.timeout);
    let mut summary = WaitSummary::default();

    tracing::info!(
        job_name,
        timeout_secs = config.timeout.as_secs(),
        "Waiting for job completion notification",
    );

    loop {
        let batch = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WaitError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => {
                return Err(WaitError::TimedOut(config.timeout));
            }
            pulled = source.pull(config.max_messages) => pulled?,
        };
        summary.pulls += 1;

        if batch.is_empty() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WaitError::Cancelled),
                _ = tokio::time::sleep_until(deadline) => {
                    return Err(WaitError::TimedOut(config.timeout));
                }
                _ = tokio::time::sleep(config.idle_delay) => {}
            }
            continue;
        }

        let matched = scan_batch(&batch, job_name, &mut summary);

        // Whole batch, matched or not. Not raced with cancellation.
        let ack_ids: Vec<String> = batch.into_iter().map(|m| m.ack_id).collect();
        source.acknowledge(&ack_ids).await?;
        summary.acknowledged += ack_ids.len();

        if matched {
            tracing::info!(
                job_name,
                pulls = summary.pulls,
                acknowledged = summary.acknowledged,
                "Job completion notification received",
            );
            return Ok(summary);
        }
    }
}

/// Timeouts too large to represent are clamped to roughly thirty years.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(FAR_FUTURE_SECS))
}

const FAR_FUTURE_SECS: u64 = 86_400 * 365 * 30;

/// Log each message and report whether any of them names `job_name`.
fn scan_batch(batch: &[ReceivedMessage], job_name: &str, summary: &mut WaitSummary) -> bool {
    let mut matched = false;
    for msg in batch {
        match msg.job_name() {
            Some(name) if name == job_name => matched = true,
            Some(name) => {
                summary.ignored += 1;
                tracing::debug!(expected = job_name, got = name, "Notification for another job");
            }
            None => {
                summary.ignored += 1;
                tracing::warn!(
                    message_id = %msg.message.message_id,
                    "Notification without a job name attribute",
                );
            }
        }
    }
    matched
}
