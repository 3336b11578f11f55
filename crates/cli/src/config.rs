use std::time::Duration;

use dlp_risk_gcp::client::{DEFAULT_DLP_URL, DEFAULT_PUBSUB_URL};
use dlp_risk_gcp::{GcpClientConfig, WaitConfig};

/// Default seconds to wait for the completion notification.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default messages requested per pull.
const DEFAULT_MAX_MESSAGES: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub gcp: GcpClientConfig,
    pub wait: WaitConfig,
}

impl RunConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `GOOGLE_OAUTH_ACCESS_TOKEN` | required                         |
    /// | `DLP_API_URL`               | `https://dlp.googleapis.com`     |
    /// | `PUBSUB_API_URL`            | `https://pubsub.googleapis.com`  |
    /// | `RISK_WAIT_TIMEOUT_SECS`    | `300`                            |
    /// | `PUBSUB_MAX_MESSAGES`       | `10`                             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_token = lookup("GOOGLE_OAUTH_ACCESS_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("GOOGLE_OAUTH_ACCESS_TOKEN"))?;

        let dlp_url = lookup("DLP_API_URL").unwrap_or_else(|| DEFAULT_DLP_URL.into());
        let pubsub_url = lookup("PUBSUB_API_URL").unwrap_or_else(|| DEFAULT_PUBSUB_URL.into());

        let timeout_secs: u64 = parse_or(
            &lookup,
            "RISK_WAIT_TIMEOUT_SECS",
            "u64",
            DEFAULT_TIMEOUT_SECS,
        )?;
        let max_messages: u32 = parse_or(
            &lookup,
            "PUBSUB_MAX_MESSAGES",
            "u32",
            DEFAULT_MAX_MESSAGES,
        )?;
        if max_messages == 0 {
            return Err(ConfigError::Invalid {
                name: "PUBSUB_MAX_MESSAGES",
                expected: "positive u32",
                value: "0".into(),
            });
        }

        Ok(Self {
            gcp: GcpClientConfig {
                dlp_url,
                pubsub_url,
                access_token,
            },
            wait: WaitConfig {
                timeout: Duration::from_secs(timeout_secs),
                max_messages,
                ..WaitConfig::default()
            },
        })
    }

    /// Apply a `--timeout` override from the command line.
    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        if let Some(secs) = timeout_secs {
            self.wait.timeout = Duration::from_secs(secs);
        }
        self
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        None => Ok(default),
    }
}
