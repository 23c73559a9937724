//! Handler for Slack interactive components (`block_actions`).

use serde_json::Value;
use tracing::{error, info, warn};

use super::helpers::{err_response, error_response, ok_empty};
use crate::core::models::InteractionCallback;
use crate::slack::ChatApi;
use crate::slack::blocks::{DISMISS_ACTION_ID, build_dismissed_blocks};

const DISMISSED_TEXT: &str = "This message was dismissed.";

/// Handle an interactive payload.
///
/// Only the dismiss button has an effect: the original message is replaced
/// through the callback's `response_url`. Other actions are acknowledged.
pub async fn handle_interactive<C: ChatApi + ?Sized>(
    chat: &C,
    callback: &InteractionCallback,
) -> Value {
    let Some(action_id) = callback.action_id() else {
        info!(kind = %callback.kind, "Interaction without block actions");
        return ok_empty();
    };

    info!(
        action_id = %action_id,
        channel_id = ?callback.channel_id(),
        "Handling block action"
    );

    if action_id != DISMISS_ACTION_ID {
        return ok_empty();
    }

    let Some(response_url) = callback.response_url() else {
        warn!("Dismiss action has no response_url");
        return err_response(500, "Missing response_url");
    };

    match chat
        .replace_original(response_url, DISMISSED_TEXT, &build_dismissed_blocks())
        .await
    {
        Ok(()) => ok_empty(),
        Err(e) => {
            error!("Failed to replace original message: {}", e);
            error_response(&e)
        }
    }
}
