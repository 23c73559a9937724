//! Handler for Slack Events API callbacks.

use serde_json::Value;
use tracing::{error, info};

use super::helpers::{error_response, ok_empty};
use crate::core::models::{AppMentionEvent, CallbackEvent, InnerEvent};
use crate::slack::ChatApi;
use crate::slack::blocks::{MENTION_REPLY_TEXT, build_mention_reply_blocks};

/// Handle an `event_callback` payload from Slack.
///
/// App mentions get a reply with action buttons; every other inner event is
/// acknowledged without a Slack call.
pub async fn handle_event_callback<C: ChatApi + ?Sized>(chat: &C, callback: &CallbackEvent) -> Value {
    match &callback.event {
        InnerEvent::AppMention(mention) => handle_app_mention(chat, mention).await,
        InnerEvent::Unrecognized => {
            info!(event_id = ?callback.event_id, "Ignoring unhandled event type");
            ok_empty()
        }
    }
}

async fn handle_app_mention<C: ChatApi + ?Sized>(chat: &C, mention: &AppMentionEvent) -> Value {
    info!(channel_id = %mention.channel, user = ?mention.user, "Handling app mention");

    let blocks = build_mention_reply_blocks();
    match chat
        .post_message(&mention.channel, MENTION_REPLY_TEXT, &blocks)
        .await
    {
        Ok(()) => ok_empty(),
        Err(e) => {
            error!(channel_id = %mention.channel, "Failed to reply to mention: {}", e);
            error_response(&e)
        }
    }
}
