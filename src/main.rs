use aws_config::BehaviorVersion;
use aws_slack_notifier::clients::AwsClients;
use aws_slack_notifier::config::Config;
use aws_slack_notifier::Notifier;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    aws_slack_notifier::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load_from_env()?;
    info!("notifier mode: {}", config.mode);

    let aws_config = aws_config::load_defaults(BehaviorVersion::v2023_11_09()).await;
    let clients = AwsClients::new(&aws_config);
    let notifier = Notifier::new(&clients, reqwest::Client::new());

    run(service_fn(|request: LambdaEvent<Value>| {
        aws_slack_notifier::handler(&notifier, &config, request)
    }))
    .await
}
