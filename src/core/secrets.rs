//! Slack credentials stored in AWS Secrets Manager.
//!
//! The secret is a JSON object with string fields `Token`, `SigningSecret`
//! and, for the login notifier, `NotificationWebhookURL`. Every invocation
//! fetches it again so rotated credentials take effect immediately.

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use serde_json::{Map, Value};
use tracing::{error, info};
use url::Url;

use crate::errors::RelayError;

const VERSION_STAGE: &str = "AWSCURRENT";

const TOKEN_FIELD: &str = "Token";
const SIGNING_SECRET_FIELD: &str = "SigningSecret";
const WEBHOOK_URL_FIELD: &str = "NotificationWebhookURL";

#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    pub token: String,
    pub signing_secret: String,
    pub webhook_url: Option<String>,
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("token", &"<redacted>")
            .field("signing_secret", &"<redacted>")
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialBundle {
    /// Parses the secret string returned by Secrets Manager.
    ///
    /// # Errors
    ///
    /// Returns `SecretUnavailable` if the value is not a JSON object, a required
    /// field is missing or not a string, or the webhook URL is not a valid URL.
    pub fn from_secret_string(raw: &str) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| RelayError::SecretUnavailable(format!("secret is not JSON: {e}")))?;
        let Some(fields) = value.as_object() else {
            return Err(RelayError::SecretUnavailable(
                "secret is not a JSON object".to_string(),
            ));
        };

        let webhook_url = optional_string(fields, WEBHOOK_URL_FIELD)?;
        if let Some(url) = &webhook_url {
            Url::parse(url).map_err(|e| {
                RelayError::SecretUnavailable(format!("{WEBHOOK_URL_FIELD} is not a valid URL: {e}"))
            })?;
        }

        Ok(Self {
            token: required_string(fields, TOKEN_FIELD)?,
            signing_secret: required_string(fields, SIGNING_SECRET_FIELD)?,
            webhook_url,
        })
    }

    /// # Errors
    ///
    /// Returns `SecretUnavailable` when the secret has no notification webhook.
    pub fn require_webhook_url(&self) -> Result<&str, RelayError> {
        self.webhook_url.as_deref().ok_or_else(|| {
            RelayError::SecretUnavailable(format!("missing field {WEBHOOK_URL_FIELD}"))
        })
    }
}

fn required_string(fields: &Map<String, Value>, name: &str) -> Result<String, RelayError> {
    optional_string(fields, name)?
        .ok_or_else(|| RelayError::SecretUnavailable(format!("missing field {name}")))
}

fn optional_string(fields: &Map<String, Value>, name: &str) -> Result<Option<String>, RelayError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RelayError::SecretUnavailable(format!(
            "field {name} is not a string"
        ))),
    }
}

/// Source of Slack credentials.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn fetch(&self, secret_id: &str, region: &str) -> Result<CredentialBundle, RelayError>;
}

/// Reads credentials from AWS Secrets Manager.
///
/// A fresh SDK client is built for every fetch; nothing is shared between
/// invocations.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecretsManagerProvider;

#[async_trait]
impl SecretProvider for SecretsManagerProvider {
    async fn fetch(&self, secret_id: &str, region: &str) -> Result<CredentialBundle, RelayError> {
        let shared = aws_config::from_env()
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        let client = SecretsManagerClient::new(&shared);

        let output = client
            .get_secret_value()
            .secret_id(secret_id)
            .version_stage(VERSION_STAGE)
            .send()
            .await
            .map_err(|e| {
                error!(secret_id = %secret_id, "get_secret_value failed: {}", e);
                RelayError::SecretUnavailable(format!("get_secret_value: {e}"))
            })?;

        let Some(raw) = output.secret_string() else {
            return Err(RelayError::SecretUnavailable(format!(
                "secret {secret_id} has no string value"
            )));
        };

        let bundle = CredentialBundle::from_secret_string(raw)?;
        info!(secret_id = %secret_id, "Loaded Slack credentials");
        Ok(bundle)
    }
}
