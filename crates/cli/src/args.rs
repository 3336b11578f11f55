use clap::{Args as ClapArgs, Parser, Subcommand};
use dlp_risk_core::request::BigQueryTable;
use dlp_risk_pipeline::MetricInput;

//
// For parsing the user-specified analysis.
//
#[derive(Parser, Debug)]
#[command(name = "dlp-risk", version, about = "Run DLP risk analysis on a BigQuery table", long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Seconds to wait for the completion notification (overrides
    /// `RISK_WAIT_TIMEOUT_SECS`).
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the job runs, what it reads, and where it reports.
#[derive(ClapArgs, Debug, Clone)]
pub struct TargetArgs {
    /// Project that runs the job and owns the topic and subscription.
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub project: String,

    /// Project containing the table. Defaults to `--project`.
    #[arg(long)]
    pub table_project: Option<String>,

    /// BigQuery dataset id.
    #[arg(long)]
    pub dataset: String,

    /// BigQuery table id.
    #[arg(long)]
    pub table: String,

    /// Pub/Sub topic notified when the job finishes.
    #[arg(long)]
    pub topic: String,

    /// Pub/Sub subscription attached to `--topic`.
    #[arg(long)]
    pub subscription: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Equivalence-class histogram over the quasi-identifiers.
    KAnonymity {
        /// Comma-separated quasi-identifier columns.
        #[arg(long, value_delimiter = ',', required = true)]
        quasi_ids: Vec<String>,
    },
    /// k-map estimation against a population distribution.
    KMap {
        /// Comma-separated quasi-identifier columns.
        #[arg(long, value_delimiter = ',', required = true)]
        quasi_ids: Vec<String>,

        /// Comma-separated info types, one per quasi-identifier.
        #[arg(long, value_delimiter = ',', required = true)]
        info_types: Vec<String>,

        /// ISO 3166-1 alpha-2 region code (default `US`).
        #[arg(long)]
        region_code: Option<String>,
    },
    /// Sensitive-value frequency per equivalence class.
    LDiversity {
        /// Comma-separated quasi-identifier columns.
        #[arg(long, value_delimiter = ',', required = true)]
        quasi_ids: Vec<String>,

        /// Column whose values must stay diverse.
        #[arg(long)]
        sensitive_attribute: String,
    },
    /// Min, max and quantiles of a numeric column.
    Numerical {
        #[arg(long)]
        column: String,
    },
    /// Value frequency histogram of a column.
    Categorical {
        #[arg(long)]
        column: String,
    },
}

impl TargetArgs {
    pub fn table(&self) -> BigQueryTable {
        BigQueryTable {
            project_id: self
                .table_project
                .clone()
                .unwrap_or_else(|| self.project.clone()),
            dataset_id: self.dataset.clone(),
            table_id: self.table.clone(),
        }
    }
}

impl Commands {
    pub fn metric_input(&self) -> MetricInput {
        match self.clone() {
            Commands::KAnonymity { quasi_ids } => MetricInput::KAnonymity { quasi_ids },
            Commands::KMap {
                quasi_ids,
                info_types,
                region_code,
            } => MetricInput::KMap {
                quasi_ids,
                info_types,
                region_code,
            },
            Commands::LDiversity {
                quasi_ids,
                sensitive_attribute,
            } => MetricInput::LDiversity {
                quasi_ids,
                sensitive_attribute,
            },
            Commands::Numerical { column } => MetricInput::NumericalStats { column },
            Commands::Categorical { column } => MetricInput::CategoricalStats { column },
        }
    }
}
