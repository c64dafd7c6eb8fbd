use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;
use tracing::debug;

use crate::error::NotifierError;

pub const DEPLOYMENT_ECHO_SUBJECT: &str = "ECS 배포 알림 성공";

/// Publishes plain-text messages to a topic.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish_message(
        &self,
        topic_arn: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), NotifierError>;
}

pub type DynTopicPublisher = Arc<dyn TopicPublisher>;

#[async_trait]
impl TopicPublisher for SnsClient {
    async fn publish_message(
        &self,
        topic_arn: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), NotifierError> {
        let output = self
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|error| NotifierError::Publish {
                topic_arn: topic_arn.to_string(),
                message: error.into_service_error().to_string(),
            })?;
        debug!("published message {:?} to {}", output.message_id(), topic_arn);
        Ok(())
    }
}

/// Body of the confirmation echoed after a deployment notification lands.
pub fn deployment_echo(text: &str) -> String {
    format!("Slack으로 알림 전송 성공: {text}")
}
