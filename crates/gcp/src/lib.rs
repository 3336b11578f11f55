//! Google Cloud REST clients for DLP risk analysis.
//!
//! Provides the DLP job API wrapper, a pub/sub pull/ack client, the
//! injectable service traits both implement, and the completion waiter
//! that watches a subscription for a job's notification.

pub mod api;
pub mod client;
pub mod messages;
pub mod pubsub;
pub mod service;
pub mod waiter;

pub use api::DlpApi;
pub use client::GcpClientConfig;
pub use pubsub::PubSubApi;
pub use service::{NotificationSource, RiskJobService, ServiceError};
pub use waiter::{wait_for_job, WaitConfig, WaitError, WaitSummary};
