//! Webhook Lambda handler - thin router over verification, parsing and the
//! specialized handlers.
//!
//! Every failure is logged and turned into an API Gateway response:
//! - 400 for malformed verification headers
//! - 401 for a bad or stale signature
//! - 500 for secret, parse and Slack API failures

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};

use super::request::InboundRequest;
use super::{event_handler, helpers, interactive_handler, parsing, signature};
use crate::core::config::AppConfig;
use crate::core::models::ClassifiedEvent;
use crate::core::secrets::{SecretProvider, SecretsManagerProvider};
use crate::slack::{ChatApi, SlackClient};

pub use self::function_handler as handler;

/// Lambda handler for the Slack webhook entrypoint.
///
/// # Errors
///
/// Only configuration errors fail the invocation; request-level failures are
/// reported through the response status code.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    Ok(process_request(&config, &SecretsManagerProvider, &event.payload, |token| {
        SlackClient::new(token.to_string())
    })
    .await)
}

/// Verifies, classifies and answers one API Gateway request.
///
/// `make_chat` builds the Slack client from the bot token; it is only called
/// when the request needs an outbound Slack call.
pub async fn process_request<P, F, C>(
    config: &AppConfig,
    secrets: &P,
    payload: &Value,
    make_chat: F,
) -> Value
where
    P: SecretProvider + ?Sized,
    F: FnOnce(&str) -> C,
    C: ChatApi,
{
    let credentials = match secrets
        .fetch(&config.secret_name, &config.secret_region)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load Slack credentials: {}", e);
            return helpers::error_response(&e);
        }
    };

    let request = match InboundRequest::from_gateway_payload(payload) {
        Ok(r) => r,
        Err(e) => {
            error!("Malformed API Gateway payload: {}", e);
            return helpers::error_response(&e);
        }
    };
    debug!(body = %request.body, "Request body");

    if let Err(e) =
        signature::verify_slack_request(&request.headers, &request.body, &credentials.signing_secret)
    {
        error!("Slack request verification failed: {}", e);
        return helpers::error_response(&e);
    }
    debug!("Slack signature verified");

    let event = match parsing::parse_event(&request.body) {
        Ok(ev) => ev,
        Err(e) => {
            error!("Failed to parse Slack request: {}", e);
            return helpers::error_response(&e);
        }
    };

    match event {
        ClassifiedEvent::Challenge { challenge } => {
            info!("Answering url_verification challenge");
            helpers::ok_text(&challenge)
        }
        ClassifiedEvent::RateLimited => {
            info!("Slack reported app_rate_limited");
            helpers::ok_empty()
        }
        ClassifiedEvent::Unsupported => {
            info!("Ignoring unsupported Events API body");
            helpers::ok_empty()
        }
        ClassifiedEvent::Callback(callback) => {
            let chat = make_chat(&credentials.token);
            event_handler::handle_event_callback(&chat, &callback).await
        }
        ClassifiedEvent::Interaction(callback) => {
            let chat = make_chat(&credentials.token);
            interactive_handler::handle_interactive(&chat, &callback).await
        }
    }
}
