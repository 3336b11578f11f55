//! Shared connection settings for the Google Cloud REST clients.
//!
//! [`GcpClientConfig`] holds the API base URLs and the OAuth access token.
//! Both [`DlpApi`](crate::DlpApi) and [`PubSubApi`](crate::PubSubApi) are
//! built from it and share one pooled [`reqwest::Client`].

use std::time::Duration;

use crate::service::ServiceError;

pub const DEFAULT_DLP_URL: &str = "https://dlp.googleapis.com";
pub const DEFAULT_PUBSUB_URL: &str = "https://pubsub.googleapis.com";

/// Upper bound for a single HTTP call. A pub/sub pull may hold the
/// connection open while it waits for messages.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Configuration for the Google Cloud REST clients.
#[derive(Clone)]
pub struct GcpClientConfig {
    /// Base URL of the DLP API, e.g. `https://dlp.googleapis.com`.
    pub dlp_url: String,
    /// Base URL of the Pub/Sub API.
    pub pubsub_url: String,
    /// OAuth 2.0 bearer token sent with every request.
    pub access_token: String,
}

impl GcpClientConfig {
    /// Config for the public endpoints with the given token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            dlp_url: DEFAULT_DLP_URL.to_string(),
            pubsub_url: DEFAULT_PUBSUB_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Build the HTTP client shared by the API wrappers.
    pub fn http_client(&self) -> Result<reqwest::Client, ServiceError> {
        Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
    }
}

impl std::fmt::Debug for GcpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpClientConfig")
            .field("dlp_url", &self.dlp_url)
            .field("pubsub_url", &self.pubsub_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

// ---- response helpers shared by the API wrappers ----

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`ServiceError::ApiError`] containing the
/// status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ServiceError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

/// Join a base URL and a resource path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("https://dlp.googleapis.com/", "/v2/projects/p/dlpJobs"),
            "https://dlp.googleapis.com/v2/projects/p/dlpJobs"
        );
        assert_eq!(endpoint("http://localhost:8085", "v1/x"), "http://localhost:8085/v1/x");
    }

    #[test]
    fn debug_redacts_token() {
        let config = GcpClientConfig::new("ya29.secret");
        let shown = format!("{config:?}");
        assert!(!shown.contains("ya29.secret"));
        assert!(shown.contains("dlp.googleapis.com"));
    }
}
