//! Slack API client module
//!
//! Outbound calls made by the two handlers. Each call is attempted once.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use slack_morphism::{SlackApiToken, SlackApiTokenValue};
use tracing::info;

use super::response_builder::create_replace_original_payload;
use crate::errors::RelayError;

/// Token-bound Slack calls used by the webhook handler.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `chat.postMessage` with fallback text and Block Kit blocks.
    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        blocks: &Value,
    ) -> Result<(), RelayError>;

    /// Replaces the message an interaction came from via its `response_url`.
    async fn replace_original(
        &self,
        response_url: &str,
        text: &str,
        blocks: &Value,
    ) -> Result<(), RelayError>;
}

/// Incoming-webhook delivery used by the login notifier. Needs no bot token.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn post_webhook(&self, webhook_url: &str, message: &Value) -> Result<(), RelayError>;
}

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

pub struct SlackClient {
    http: Client,
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            http: Client::new(),
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }
}

#[async_trait]
impl ChatApi for SlackClient {
    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        blocks: &Value,
    ) -> Result<(), RelayError> {
        let payload = json!({
            "channel": channel_id,
            "text": text,
            "blocks": blocks,
        });

        let resp = self
            .http
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token.token_value.0)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RelayError::ApiError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await?;
        ensure_ok("chat.postMessage", &body)?;

        info!(channel_id = %channel_id, "Posted message");
        Ok(())
    }

    async fn replace_original(
        &self,
        response_url: &str,
        text: &str,
        blocks: &Value,
    ) -> Result<(), RelayError> {
        let payload = create_replace_original_payload(Some(text), Some(blocks));
        post_json(&self.http, response_url, &payload).await?;
        info!("Replaced original message");
        Ok(())
    }
}

pub struct WebhookClient {
    http: Client,
}

impl WebhookClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookSender for WebhookClient {
    async fn post_webhook(&self, webhook_url: &str, message: &Value) -> Result<(), RelayError> {
        post_json(&self.http, webhook_url, message).await
    }
}

/// Web API methods answer HTTP 200 with `{"ok": false, "error": ...}` on failure.
fn ensure_ok(method: &str, body: &Value) -> Result<(), RelayError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }
    Err(RelayError::ApiError(format!(
        "{method} error: {}",
        body.get("error").and_then(Value::as_str).unwrap_or("unknown")
    )))
}

/// Response URLs and incoming webhooks answer with plain text (`ok`) rather
/// than a Web API envelope, so only the HTTP status is checked.
async fn post_json(http: &Client, url: &str, payload: &Value) -> Result<(), RelayError> {
    let resp = http.post(url).json(payload).send().await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RelayError::ApiError(format!("HTTP {status}: {body}")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_passes() {
        assert!(ensure_ok("chat.postMessage", &json!({"ok": true, "ts": "1.2"})).is_ok());
    }

    #[test]
    fn error_envelope_reports_slack_error_code() {
        let err = ensure_ok("chat.postMessage", &json!({"ok": false, "error": "channel_not_found"}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to access Slack API: chat.postMessage error: channel_not_found"
        );
    }

    #[test]
    fn missing_ok_flag_is_an_error() {
        let err = ensure_ok("chat.postMessage", &json!({})).unwrap_err();
        assert!(err.to_string().ends_with("unknown"));
    }
}
