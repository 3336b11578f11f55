//! Human-readable rendering of a finished (or unfinished) job.
//!
//! [`render_report`] branches on the job state:
//!
//! - `DONE`   -> the histogram (or stats) for the requested metric
//! - `FAILED` -> one line per recorded error
//! - other    -> a single notice
//!
//! A failed job is ordinary output, not an error.

use std::fmt;

use crate::job::{
    CategoricalStatsResult, DlpJob, JobState, KAnonymityResult, KMapEstimationResult,
    LDiversityResult, NumericalStatsResult, ValueFrequency,
};
use crate::request::MetricKind;
use crate::value::{format_values, Value};

/// One printable line of a report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    /// Opens a histogram bucket.
    BucketHeader(String),
    /// A value bucket (or a stats value) inside the current section.
    Value(String),
    /// Detail payload of one job error.
    Error(String),
    /// Informational message; no results follow.
    Notice(String),
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::BucketHeader(text) => f.write_str(text),
            ReportLine::Value(text) => write!(f, "   {text}"),
            ReportLine::Error(text) => write!(f, "Job error: {text}"),
            ReportLine::Notice(text) => f.write_str(text),
        }
    }
}

/// Ordered report lines for one job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    lines: Vec<ReportLine>,
}

impl Report {
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn bucket_headers(&self) -> usize {
        self.count(|l| matches!(l, ReportLine::BucketHeader(_)))
    }

    pub fn value_lines(&self) -> usize {
        self.count(|l| matches!(l, ReportLine::Value(_)))
    }

    pub fn error_lines(&self) -> usize {
        self.count(|l| matches!(l, ReportLine::Error(_)))
    }

    pub fn notices(&self) -> usize {
        self.count(|l| matches!(l, ReportLine::Notice(_)))
    }

    fn count(&self, pred: impl Fn(&ReportLine) -> bool) -> usize {
        self.lines.iter().filter(|l| pred(l)).count()
    }

    fn push(&mut self, line: ReportLine) {
        self.lines.push(line);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Render the report for `job`, which was submitted to compute `metric`.
pub fn render_report(job: &DlpJob, metric: MetricKind) -> Report {
    let mut report = Report::default();

    match job.state {
        JobState::Done => render_done(&mut report, job, metric),
        JobState::Failed => {
            for error in &job.errors {
                report.push(ReportLine::Error(format!(
                    "{} (code {})",
                    error.details.message, error.details.code
                )));
            }
        }
        state => report.push(ReportLine::Notice(format!(
            "Job {} is in state {state}; status unknown or still in progress",
            job.name
        ))),
    }

    report
}

fn render_done(report: &mut Report, job: &DlpJob, metric: MetricKind) {
    let details = job.risk_details.as_ref();
    let rendered = match metric {
        MetricKind::KAnonymity => details
            .and_then(|d| d.k_anonymity_result.as_ref())
            .map(|r| render_k_anonymity(report, r)),
        MetricKind::KMap => details
            .and_then(|d| d.k_map_estimation_result.as_ref())
            .map(|r| render_k_map(report, r)),
        MetricKind::LDiversity => details
            .and_then(|d| d.l_diversity_result.as_ref())
            .map(|r| render_l_diversity(report, r)),
        MetricKind::NumericalStats => details
            .and_then(|d| d.numerical_stats_result.as_ref())
            .map(|r| render_numerical(report, r)),
        MetricKind::CategoricalStats => details
            .and_then(|d| d.categorical_stats_result.as_ref())
            .map(|r| render_categorical(report, r)),
    };

    if rendered.is_none() {
        report.push(ReportLine::Notice(format!(
            "Job {} finished without a {metric} result",
            job.name
        )));
    }
}

fn render_k_anonymity(report: &mut Report, result: &KAnonymityResult) {
    for (i, bucket) in result.equivalence_class_histogram_buckets.iter().enumerate() {
        report.push(ReportLine::BucketHeader(format!(
            "Bucket {i}: bucket size range [{}, {}]",
            bucket.equivalence_class_size_lower_bound, bucket.equivalence_class_size_upper_bound
        )));
        for class in &bucket.bucket_values {
            report.push(ReportLine::Value(format!(
                "Quasi-ID values: {}, class size: {}",
                format_values(&class.quasi_ids_values),
                class.equivalence_class_size
            )));
        }
    }
}

fn render_k_map(report: &mut Report, result: &KMapEstimationResult) {
    for (i, bucket) in result.k_map_estimation_histogram.iter().enumerate() {
        report.push(ReportLine::BucketHeader(format!(
            "Bucket {i}: anonymity range [{}, {}], size {}",
            bucket.min_anonymity, bucket.max_anonymity, bucket.bucket_size
        )));
        for values in &bucket.bucket_values {
            report.push(ReportLine::Value(format!(
                "Values: {}, estimated k-map anonymity: {}",
                format_values(&values.quasi_ids_values),
                values.estimated_anonymity
            )));
        }
    }
}

fn render_l_diversity(report: &mut Report, result: &LDiversityResult) {
    for (i, bucket) in result
        .sensitive_value_frequency_histogram_buckets
        .iter()
        .enumerate()
    {
        report.push(ReportLine::BucketHeader(format!(
            "Bucket {i}: sensitive value frequency range [{}, {}]",
            bucket.sensitive_value_frequency_lower_bound,
            bucket.sensitive_value_frequency_upper_bound
        )));
        for class in &bucket.bucket_values {
            report.push(ReportLine::Value(format!(
                "Quasi-ID values: {}, class size: {}, distinct sensitive values: {}, top sensitive values: {}",
                format_values(&class.quasi_ids_values),
                class.equivalence_class_size,
                class.num_distinct_sensitive_values,
                format_frequencies(&class.top_sensitive_values)
            )));
        }
    }
}

fn render_categorical(report: &mut Report, result: &CategoricalStatsResult) {
    for (i, bucket) in result.value_frequency_histogram_buckets.iter().enumerate() {
        report.push(ReportLine::BucketHeader(format!(
            "Bucket {i}: most common value occurs {} time(s), least common value occurs {} time(s), {} unique value(s) total",
            bucket.value_frequency_upper_bound,
            bucket.value_frequency_lower_bound,
            bucket.bucket_size
        )));
        for frequency in &bucket.bucket_values {
            report.push(ReportLine::Value(format!(
                "Value {} occurs {} time(s)",
                frequency.value, frequency.count
            )));
        }
    }
}

/// Quantiles are one per percent; runs of equal values print once.
fn render_numerical(report: &mut Report, result: &NumericalStatsResult) {
    report.push(ReportLine::Value(format!(
        "Value range: [{}, {}]",
        result.min_value, result.max_value
    )));

    let mut previous: Option<&Value> = None;
    for (percent, value) in result.quantile_values.iter().enumerate() {
        if previous != Some(value) {
            report.push(ReportLine::Value(format!(
                "Value at {percent}% quantile: {value}"
            )));
            previous = Some(value);
        }
    }
}

fn format_frequencies(frequencies: &[ValueFrequency]) -> String {
    let parts: Vec<String> = frequencies
        .iter()
        .map(|f| format!("{} ({})", f.value, f.count))
        .collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{
        CategoricalStatsHistogramBucket, JobError, KAnonymityEquivalenceClass,
        KAnonymityHistogramBucket, KMapEstimationHistogramBucket, KMapEstimationQuasiIdValues,
        LDiversityEquivalenceClass, LDiversityHistogramBucket, RiskDetails, Status,
    };

    fn done_job(details: RiskDetails) -> DlpJob {
        DlpJob {
            name: "projects/p/dlpJobs/r-9".into(),
            state: JobState::Done,
            risk_details: Some(details),
            ..Default::default()
        }
    }

    fn k_anonymity_job(buckets: usize, values_per_bucket: usize) -> DlpJob {
        let buckets = (0..buckets)
            .map(|b| KAnonymityHistogramBucket {
                equivalence_class_size_lower_bound: b as i64 + 1,
                equivalence_class_size_upper_bound: b as i64 + 1,
                bucket_size: values_per_bucket as i64,
                bucket_values: (0..values_per_bucket)
                    .map(|v| KAnonymityEquivalenceClass {
                        quasi_ids_values: vec![Value::Integer(v as i64), Value::Boolean(false)],
                        equivalence_class_size: b as i64 + 1,
                    })
                    .collect(),
                bucket_value_count: values_per_bucket as i64,
            })
            .collect();
        done_job(RiskDetails {
            k_anonymity_result: Some(KAnonymityResult {
                equivalence_class_histogram_buckets: buckets,
            }),
            ..Default::default()
        })
    }

    #[test]
    fn done_job_emits_headers_and_value_lines() {
        for (n, m) in [(0, 0), (1, 1), (3, 4), (5, 2)] {
            let report = render_report(&k_anonymity_job(n, m), MetricKind::KAnonymity);
            assert_eq!(report.bucket_headers(), n);
            assert_eq!(report.value_lines(), n * m);
            assert_eq!(report.error_lines(), 0);
            assert_eq!(report.notices(), 0);
        }
    }

    #[test]
    fn k_anonymity_lines_include_zero_and_false() {
        let report = render_report(&k_anonymity_job(1, 1), MetricKind::KAnonymity);
        assert_eq!(
            report.lines(),
            &[
                ReportLine::BucketHeader("Bucket 0: bucket size range [1, 1]".into()),
                ReportLine::Value("Quasi-ID values: [0, false], class size: 1".into()),
            ]
        );
    }

    #[test]
    fn failed_job_emits_one_line_per_error() {
        let job = DlpJob {
            name: "projects/p/dlpJobs/r-1".into(),
            state: JobState::Failed,
            errors: (0..3)
                .map(|i| JobError {
                    details: Status {
                        code: 7,
                        message: format!("error {i}"),
                        details: vec![],
                    },
                    timestamps: vec![],
                })
                .collect(),
            // Results on a failed job are never rendered.
            risk_details: k_anonymity_job(2, 2).risk_details,
            ..Default::default()
        };

        let report = render_report(&job, MetricKind::KAnonymity);
        assert_eq!(report.error_lines(), 3);
        assert_eq!(report.lines().len(), 3);
        assert_eq!(report.lines()[0].to_string(), "Job error: error 0 (code 7)");
    }

    #[test]
    fn non_terminal_states_emit_single_notice() {
        for state in [
            JobState::Pending,
            JobState::Running,
            JobState::Canceled,
            JobState::Active,
            JobState::Unspecified,
            JobState::Unknown,
        ] {
            let job = DlpJob {
                name: "projects/p/dlpJobs/r-2".into(),
                state,
                ..Default::default()
            };
            let report = render_report(&job, MetricKind::KMap);
            assert_eq!(report.lines().len(), 1);
            assert_eq!(report.notices(), 1);
            assert!(report.lines()[0].to_string().contains(&state.to_string()));
        }
    }

    #[test]
    fn done_without_requested_result_is_a_notice() {
        let report = render_report(&k_anonymity_job(2, 2), MetricKind::KMap);
        assert_eq!(report.lines().len(), 1);
        assert_eq!(report.notices(), 1);
        assert_eq!(report.bucket_headers(), 0);
    }

    #[test]
    fn k_map_report() {
        let job = done_job(RiskDetails {
            k_map_estimation_result: Some(KMapEstimationResult {
                k_map_estimation_histogram: vec![KMapEstimationHistogramBucket {
                    min_anonymity: 3,
                    max_anonymity: 7,
                    bucket_size: 2,
                    bucket_values: vec![
                        KMapEstimationQuasiIdValues {
                            quasi_ids_values: vec![Value::Integer(27), Value::String("F".into())],
                            estimated_anonymity: 3,
                        },
                        KMapEstimationQuasiIdValues {
                            quasi_ids_values: vec![Value::Integer(35), Value::String("M".into())],
                            estimated_anonymity: 7,
                        },
                    ],
                    bucket_value_count: 2,
                }],
            }),
            ..Default::default()
        });

        let report = render_report(&job, MetricKind::KMap);
        assert_eq!(report.bucket_headers(), 1);
        assert_eq!(report.value_lines(), 2);
        assert_eq!(
            report.lines()[2],
            ReportLine::Value("Values: [35, M], estimated k-map anonymity: 7".into())
        );
    }

    #[test]
    fn l_diversity_report() {
        let job = done_job(RiskDetails {
            l_diversity_result: Some(LDiversityResult {
                sensitive_value_frequency_histogram_buckets: vec![LDiversityHistogramBucket {
                    sensitive_value_frequency_lower_bound: 1,
                    sensitive_value_frequency_upper_bound: 2,
                    bucket_size: 1,
                    bucket_values: vec![LDiversityEquivalenceClass {
                        quasi_ids_values: vec![Value::Integer(40)],
                        equivalence_class_size: 5,
                        num_distinct_sensitive_values: 2,
                        top_sensitive_values: vec![
                            ValueFrequency {
                                value: Value::String("Austin".into()),
                                count: 4,
                            },
                            ValueFrequency {
                                value: Value::String("Boston".into()),
                                count: 1,
                            },
                        ],
                    }],
                    bucket_value_count: 1,
                }],
            }),
            ..Default::default()
        });

        let report = render_report(&job, MetricKind::LDiversity);
        assert_eq!(report.bucket_headers(), 1);
        assert_eq!(
            report.lines()[0],
            ReportLine::BucketHeader("Bucket 0: sensitive value frequency range [1, 2]".into())
        );
        assert_eq!(
            report.lines()[1],
            ReportLine::Value(
                "Quasi-ID values: [40], class size: 5, distinct sensitive values: 2, top sensitive values: [Austin (4), Boston (1)]".into()
            )
        );
    }

    #[test]
    fn categorical_report() {
        let job = done_job(RiskDetails {
            categorical_stats_result: Some(CategoricalStatsResult {
                value_frequency_histogram_buckets: vec![CategoricalStatsHistogramBucket {
                    value_frequency_lower_bound: 1,
                    value_frequency_upper_bound: 9,
                    bucket_size: 2,
                    bucket_values: vec![
                        ValueFrequency {
                            value: Value::String("CA".into()),
                            count: 9,
                        },
                        ValueFrequency {
                            value: Value::String("WY".into()),
                            count: 1,
                        },
                    ],
                    bucket_value_count: 2,
                }],
            }),
            ..Default::default()
        });

        let report = render_report(&job, MetricKind::CategoricalStats);
        assert_eq!(report.bucket_headers(), 1);
        assert_eq!(report.value_lines(), 2);
        assert_eq!(report.lines()[2].to_string(), "   Value WY occurs 1 time(s)");
    }

    #[test]
    fn numerical_quantiles_are_deduplicated() {
        let quantiles = [0, 0, 0, 5, 5, 9]
            .into_iter()
            .map(Value::Integer)
            .collect();
        let job = done_job(RiskDetails {
            numerical_stats_result: Some(NumericalStatsResult {
                min_value: Value::Integer(0),
                max_value: Value::Integer(9),
                quantile_values: quantiles,
            }),
            ..Default::default()
        });

        let report = render_report(&job, MetricKind::NumericalStats);
        let lines: Vec<String> = report.lines().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "   Value range: [0, 9]",
                "   Value at 0% quantile: 0",
                "   Value at 3% quantile: 5",
                "   Value at 5% quantile: 9",
            ]
        );
    }

    #[test]
    fn report_display_joins_lines() {
        let report = render_report(&k_anonymity_job(1, 1), MetricKind::KAnonymity);
        assert_eq!(
            report.to_string(),
            "Bucket 0: bucket size range [1, 1]\n   Quasi-ID values: [0, false], class size: 1\n"
        );
    }
}
