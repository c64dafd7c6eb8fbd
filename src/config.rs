use std::str::FromStr;
use std::string::String;
use std::{env, fmt};

use crate::error::NotifierError;

/// Which event schema a deployment of the function handles.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum NotifierMode {
    BatchJob,
    EcsDeployment,
    EcsHealth,
    EcsUsage,
}

impl FromStr for NotifierMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "BatchJob" => Ok(NotifierMode::BatchJob),
            "EcsDeployment" => Ok(NotifierMode::EcsDeployment),
            "EcsHealth" => Ok(NotifierMode::EcsHealth),
            "EcsUsage" => Ok(NotifierMode::EcsUsage),
            other => Err(format!("Invalid or Unsupported notifier mode {}", other)),
        }
    }
}

impl fmt::Display for NotifierMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: NotifierMode,
    pub secret_name: String,
    pub sns_topic_arn: Option<String>,
}

impl Config {
    pub fn load_from_env() -> Result<Config, NotifierError> {
        let mode = env::var("NOTIFIER_MODE")
            .map_err(|e| NotifierError::Configuration(format!("NOTIFIER_MODE not set - {}", e)))?
            .parse::<NotifierMode>()
            .map_err(NotifierError::Configuration)?;

        let secret_name = env::var("SECRET_NAME")
            .map_err(|e| NotifierError::Configuration(format!("SECRET_NAME not set - {}", e)))?;

        // only the deployment notifier echoes to a topic, but it has to know where
        let sns_topic_arn = match mode {
            NotifierMode::EcsDeployment => Some(env::var("SNS_TOPIC_ARN").map_err(|e| {
                NotifierError::Configuration(format!("SNS_TOPIC_ARN not set - {}", e))
            })?),
            _ => env::var("SNS_TOPIC_ARN").ok(),
        };

        Ok(Config {
            mode,
            secret_name,
            sns_topic_arn,
        })
    }
}
