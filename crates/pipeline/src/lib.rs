//! Risk-analysis flow: build -> submit -> wait -> fetch -> report.
//!
//! [`RiskFlow`] wires the request builder, the DLP job service, the
//! completion waiter and the reporter together. Services are injected
//! as trait objects so the whole flow can run against fakes.

pub mod flow;

pub use flow::{FlowError, FlowOutcome, MetricInput, RiskFlow};
