//! `dlp-risk` binary entry point.
//!
//! Environment (see [`RunConfig::from_env`] for defaults):
//!
//! | Env Var                     | Purpose                                   |
//! |-----------------------------|-------------------------------------------|
//! | `GOOGLE_OAUTH_ACCESS_TOKEN` | Bearer token for the DLP and Pub/Sub APIs |
//! | `GOOGLE_CLOUD_PROJECT`      | Fallback for `--project`                  |
//! | `DLP_API_URL`               | DLP API base URL                          |
//! | `PUBSUB_API_URL`            | Pub/Sub API base URL                      |
//! | `RISK_WAIT_TIMEOUT_SECS`    | Notification wait timeout                 |
//! | `PUBSUB_MAX_MESSAGES`       | Messages per pull                         |
//! | `RUST_LOG`                  | Log filter                                |

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dlp_risk_cli::args::Args;
use dlp_risk_cli::config::RunConfig;
use dlp_risk_core::request::{subscription_name, RequestBuilder};
use dlp_risk_gcp::{DlpApi, PubSubApi};
use dlp_risk_pipeline::RiskFlow;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dlp_risk_cli=info,dlp_risk_pipeline=info,dlp_risk_gcp=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = RunConfig::from_env()?.with_timeout(args.timeout);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling wait");
                cancel.cancel();
            }
        });
    }

    let http = config
        .gcp
        .http_client()
        .context("Failed to build HTTP client")?;
    let jobs = Arc::new(DlpApi::with_client(http.clone(), &config.gcp));
    let subscription = Arc::new(PubSubApi::with_client(
        http,
        &config.gcp,
        subscription_name(&args.target.project, &args.target.subscription),
    ));

    let builder = RequestBuilder::new(
        args.target.project.clone(),
        args.target.table(),
        args.target.topic.clone(),
    );
    let input = args.command.metric_input();

    tracing::info!(
        project = %args.target.project,
        subscription = %subscription.subscription(),
        timeout_secs = config.wait.timeout.as_secs(),
        "Starting risk analysis",
    );

    let flow = RiskFlow::new(jobs, subscription, config.wait);
    let outcome = flow
        .run_metric(&builder, &input, &cancel)
        .await
        .context("Risk analysis failed")?;

    tracing::info!(
        job_name = %outcome.job.name,
        pulls = outcome.wait.pulls,
        acknowledged = outcome.wait.acknowledged,
        ignored = outcome.wait.ignored,
        "Risk analysis finished",
    );
    print!("{}", outcome.report);

    Ok(())
}
