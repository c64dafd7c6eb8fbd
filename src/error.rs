use thiserror::Error;

/// Every way a single notification invocation can fail. None of these are
/// retried in process; the invoking infrastructure decides on redrive.
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("Failed to access AWS Secrets Manager. Please make sure the lambda function has permissions to access the {secret_id} secret. Error: {message}")]
    SecretResolution { secret_id: String, message: String },

    #[error("Didn't find a string value for the {secret_id} secret in AWS secretsmanager")]
    MissingSecret { secret_id: String },

    #[error("malformed event payload: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    #[error("failed to query CloudWatch metric {metric_name}: {message}")]
    Metrics {
        metric_name: String,
        message: String,
    },

    #[error("Slack webhook call failed with status code {status}")]
    Delivery { status: u16 },

    #[error("failed to reach Slack webhook: {0}")]
    Http(reqwest::Error),

    #[error("failed to publish delivery confirmation to {topic_arn}: {message}")]
    Publish { topic_arn: String, message: String },
}
