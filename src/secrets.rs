use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use tracing::debug;

use crate::error::NotifierError;

/// Resolves a logical secret name to its string value.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn get_secret(&self, secret_id: &str) -> Result<String, NotifierError>;
}

pub type DynSecretResolver = Arc<dyn SecretResolver>;

#[async_trait]
impl SecretResolver for SecretsManagerClient {
    async fn get_secret(&self, secret_id: &str) -> Result<String, NotifierError> {
        debug!("fetching secret {}", secret_id);
        let response = self
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|error| NotifierError::SecretResolution {
                secret_id: secret_id.to_string(),
                message: error.into_service_error().to_string(),
            })?;

        response
            .secret_string
            .ok_or_else(|| NotifierError::MissingSecret {
                secret_id: secret_id.to_string(),
            })
    }
}
