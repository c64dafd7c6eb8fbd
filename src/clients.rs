use aws_config::SdkConfig;
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use aws_sdk_sns::Client as SnsClient;

/// A type used to hold the AWS clients required to interact with AWS services
/// used by the lambda function. Built once at cold start and reused across
/// invocations.
#[derive(Clone)]
pub struct AwsClients {
    pub secretsmanager: SecretsManagerClient,
    pub cloudwatch: CloudWatchClient,
    pub sns: SnsClient,
}

impl AwsClients {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        AwsClients {
            secretsmanager: SecretsManagerClient::new(sdk_config),
            cloudwatch: CloudWatchClient::new(sdk_config),
            sns: SnsClient::new(sdk_config),
        }
    }
}
