use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::NotifierError;
use crate::events::NotificationEvent;
use crate::message::{self, SlackMessage};
use crate::metrics;
use crate::publish::{self, DEPLOYMENT_ECHO_SUBJECT};
use crate::{Notifier, Response};

/// Delivers one event to Slack: resolve the webhook, read the event with the
/// configured schema, compose the text, post it, and for deployments echo the
/// result to the topic. Any failure ends the invocation.
pub async fn notify(
    notifier: &Notifier,
    config: &Config,
    raw: Value,
) -> Result<Response, NotifierError> {
    let webhook_url = notifier.secrets.get_secret(&config.secret_name).await?;

    let event = NotificationEvent::parse(config.mode, raw)?;
    debug!("parsed event: {:?}", event);

    let text = compose(notifier, &event).await?;
    let slack_message = SlackMessage::from(text);

    if let Err(e) = notifier.slack.post(&webhook_url, &slack_message).await {
        error!("Slack delivery failed: {}", e);
        return Err(e);
    }

    if let NotificationEvent::EcsDeployment(_) = event {
        let topic_arn = config.sns_topic_arn.as_deref().ok_or_else(|| {
            NotifierError::Configuration("SNS_TOPIC_ARN not set".to_string())
        })?;
        info!("echoing deployment notification to {}", topic_arn);
        notifier
            .topic
            .publish_message(
                topic_arn,
                DEPLOYMENT_ECHO_SUBJECT,
                &publish::deployment_echo(&slack_message.text),
            )
            .await?;
    }

    Ok(Response::delivered())
}

async fn compose(
    notifier: &Notifier,
    event: &NotificationEvent,
) -> Result<String, NotifierError> {
    let text = match event {
        NotificationEvent::BatchJob(e) => message::batch_job(e),
        NotificationEvent::EcsDeployment(e) => message::ecs_deployment(e),
        NotificationEvent::EcsHealth(e) => message::ecs_health(e),
        NotificationEvent::EcsUsage(e) => {
            let usage = metrics::usage_message(notifier.metrics.as_ref(), e).await?;
            message::ecs_usage(e, &usage)
        }
    };
    Ok(text)
}
