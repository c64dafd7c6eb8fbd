use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::clients::AwsClients;
use crate::config::Config;
use crate::metrics::DynMetricsBackend;
use crate::publish::DynTopicPublisher;
use crate::secrets::DynSecretResolver;
use crate::slack::SlackWebhook;

pub mod clients;
pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod metrics;
pub mod process;
pub mod publish;
pub mod secrets;
pub mod slack;

pub const SUCCESS_BODY: &str = "Slack notification sent successfully!";

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

/// Envelope returned to the invoker once the message has been delivered.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn delivered() -> Self {
        Response {
            status_code: 200,
            body: SUCCESS_BODY.to_string(),
        }
    }
}

/// The collaborators a notification needs. Production wires in the AWS SDK
/// clients; tests substitute fakes.
#[derive(Clone)]
pub struct Notifier {
    pub secrets: DynSecretResolver,
    pub metrics: DynMetricsBackend,
    pub topic: DynTopicPublisher,
    pub slack: SlackWebhook,
}

impl Notifier {
    pub fn new(clients: &AwsClients, http: reqwest::Client) -> Self {
        Notifier {
            secrets: Arc::new(clients.secretsmanager.clone()),
            metrics: Arc::new(clients.cloudwatch.clone()),
            topic: Arc::new(clients.sns.clone()),
            slack: SlackWebhook::new(http),
        }
    }
}

// lambda handler
pub async fn handler(
    notifier: &Notifier,
    config: &Config,
    evt: LambdaEvent<Value>,
) -> Result<Response, Error> {
    info!("Handling lambda invocation in {} mode", config.mode);
    debug!("Handling event payload: {:?}", evt.payload);

    let response = process::notify(notifier, config, evt.payload).await?;
    Ok(response)
}
