//! REST client for one Pub/Sub subscription.
//!
//! Implements [`NotificationSource`] with the synchronous `pull` and
//! `acknowledge` endpoints of the Pub/Sub v1 API.

use async_trait::async_trait;

use crate::client::{endpoint, ensure_success, parse_response, GcpClientConfig};
use crate::messages::{AcknowledgeRequest, PullRequest, PullResponse, ReceivedMessage};
use crate::service::{NotificationSource, ServiceError};

/// Pull/ack client bound to a single subscription.
pub struct PubSubApi {
    client: reqwest::Client,
    api_url: String,
    access_token: String,
    /// Full resource name, `projects/{project}/subscriptions/{id}`.
    subscription: String,
}

impl PubSubApi {
    pub fn with_client(
        client: reqwest::Client,
        config: &GcpClientConfig,
        subscription: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: config.pubsub_url.clone(),
            access_token: config.access_token.clone(),
            subscription: subscription.into(),
        }
    }

    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    fn url(&self, verb: &str) -> String {
        endpoint(&self.api_url, &format!("v1/{}:{verb}", self.subscription))
    }
}

#[async_trait]
impl NotificationSource for PubSubApi {
    async fn pull(&self, max_messages: u32) -> Result<Vec<ReceivedMessage>, ServiceError> {
        let response = self
            .client
            .post(self.url("pull"))
            .bearer_auth(&self.access_token)
            .json(&PullRequest { max_messages })
            .send()
            .await?;

        let pulled: PullResponse = parse_response(response).await?;
        tracing::debug!(
            subscription = %self.subscription,
            count = pulled.received_messages.len(),
            "Pulled messages",
        );
        Ok(pulled.received_messages)
    }

    async fn acknowledge(&self, ack_ids: &[String]) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.url("acknowledge"))
            .bearer_auth(&self.access_token)
            .json(&AcknowledgeRequest { ack_ids })
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_use_subscription_verbs() {
        let config = GcpClientConfig {
            pubsub_url: "http://localhost:8085/".into(),
            ..GcpClientConfig::new("token")
        };
        let api = PubSubApi::with_client(
            reqwest::Client::new(),
            &config,
            "projects/p/subscriptions/s",
        );
        assert_eq!(
            api.url("pull"),
            "http://localhost:8085/v1/projects/p/subscriptions/s:pull"
        );
        assert_eq!(
            api.url("acknowledge"),
            "http://localhost:8085/v1/projects/p/subscriptions/s:acknowledge"
        );
        assert_eq!(api.subscription(), "projects/p/subscriptions/s");
    }
}
