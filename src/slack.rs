use http::header::USER_AGENT;
use tracing::{debug, info, warn};

use crate::error::NotifierError;
use crate::message::SlackMessage;

/// Posts messages to a Slack incoming webhook. The URL is supplied per call
/// since it is resolved from Secrets Manager on every invocation.
#[derive(Clone, Debug, Default)]
pub struct SlackWebhook {
    http: reqwest::Client,
}

impl SlackWebhook {
    pub fn new(http: reqwest::Client) -> Self {
        SlackWebhook { http }
    }

    /// Only a 200 response counts as delivered.
    pub async fn post(&self, url: &str, message: &SlackMessage) -> Result<(), NotifierError> {
        debug!(len = message.text.len(), "sending Slack message");

        let response = self
            .http
            .post(url)
            .header(
                USER_AGENT,
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .json(message)
            .send()
            .await
            // the webhook url is the secret; keep it out of errors and logs
            .map_err(|e| NotifierError::Http(e.without_url()))?;

        let status = response.status().as_u16();
        if status != 200 {
            warn!(status, "Slack webhook returned error");
            return Err(NotifierError::Delivery { status });
        }

        info!("Slack message sent");
        Ok(())
    }
}
