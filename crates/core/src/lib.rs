//! Domain types for DLP risk-analysis jobs.
//!
//! - [`request`] builds the job descriptor sent to the service.
//! - [`job`] models the job record returned by the service.
//! - [`value`] is the typed cell value carried in histogram buckets.
//! - [`report`] turns a finished job into printable report lines.

pub mod error;
pub mod int64;
pub mod job;
pub mod report;
pub mod request;
pub mod value;

pub use error::CoreError;
pub use job::{DlpJob, JobState};
pub use report::{render_report, Report, ReportLine};
pub use request::{MetricKind, RequestBuilder, RiskJobRequest};
pub use value::Value;
