//! Login notifier Lambda handler.
//!
//! Unlike the webhook handler, delivery here is fire-and-forget: a failed
//! webhook post is logged and the invocation still succeeds. Only payloads
//! that cannot be decoded (and missing credentials) fail the invocation, so
//! SNS may redeliver them.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::envelope::{AuditEnvelope, LoginAuditRecord, NotificationEnvelope};
use super::formatter::format_login_alert;
use crate::core::config::AppConfig;
use crate::core::secrets::{CredentialBundle, SecretProvider, SecretsManagerProvider};
use crate::errors::RelayError;
use crate::slack::{WebhookClient, WebhookSender};

pub use self::function_handler as handler;

/// What happened to the records of one invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub alerts_sent: usize,
    pub delivery_failures: usize,
    pub skipped: usize,
}

/// # Errors
///
/// Returns an error for configuration problems, undecodable envelopes or
/// login records, and unavailable credentials.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let outcome = process_notification(
        &config,
        &SecretsManagerProvider,
        &WebhookClient::new(),
        &event.payload,
    )
    .await
    .map_err(|e| {
        error!("Notification failed: {}", e);
        Error::from(e)
    })?;

    info!(
        alerts_sent = outcome.alerts_sent,
        delivery_failures = outcome.delivery_failures,
        skipped = outcome.skipped,
        "Notification processed"
    );
    Ok(())
}

/// Decodes every SNS record and posts an alert for each console login.
///
/// Credentials are fetched at most once, and only when there is something to
/// post.
///
/// # Errors
///
/// Returns `EnvelopeDecode` for a malformed envelope or login record and
/// `SecretUnavailable` when the webhook URL cannot be loaded.
pub async fn process_notification<P, W>(
    config: &AppConfig,
    secrets: &P,
    sender: &W,
    payload: &Value,
) -> Result<NotificationOutcome, RelayError>
where
    P: SecretProvider + ?Sized,
    W: WebhookSender + ?Sized,
{
    debug!(payload = %payload, "SNS event");

    let envelope = NotificationEnvelope::from_payload(payload)?;
    let mut credentials: Option<CredentialBundle> = None;
    let mut outcome = NotificationOutcome::default();

    for record in &envelope.records {
        let audit = AuditEnvelope::from_message(&record.sns.message).inspect_err(|e| {
            error!(message_id = ?record.sns.message_id, "{}", e);
        })?;
        if !audit.is_console_login() {
            info!(event_name = ?audit.event_name(), "Not a console login event, skipping");
            outcome.skipped += 1;
            continue;
        }
        let detail = audit.console_login_detail().inspect_err(|e| {
            error!(message_id = ?record.sns.message_id, "{}", e);
        })?;

        let login = LoginAuditRecord::from_detail(&detail, &audit.account)?;
        let alert = format_login_alert(&login, config.alert_timezone);
        info!(
            account_id = %login.account_id,
            severity = ?alert.severity,
            "Console login alert"
        );

        if credentials.is_none() {
            credentials = Some(
                secrets
                    .fetch(&config.secret_name, &config.secret_region)
                    .await
                    .inspect_err(|e| error!("Failed to get secrets: {}", e))?,
            );
        }
        if let Some(creds) = &credentials {
            let webhook_url = creds.require_webhook_url()?;
            let message = alert.to_webhook_message(&config.alert_username);
            match sender.post_webhook(webhook_url, &message).await {
                Ok(()) => outcome.alerts_sent += 1,
                Err(e) => {
                    warn!("Login alert delivery failed: {}", e);
                    outcome.delivery_failures += 1;
                }
            }
        }
    }

    Ok(outcome)
}
