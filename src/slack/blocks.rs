//! Block Kit payloads posted by the bot.

use serde_json::{Value, json};

pub const MENTION_REPLY_TEXT: &str = "message from bot!";
pub const ACTIONS_BLOCK_ID: &str = "A";
pub const ACKNOWLEDGE_ACTION_ID: &str = "B";
pub const DISMISS_ACTION_ID: &str = "C";

/// Reply to an app mention: a text section plus an actions row with a
/// primary and a danger button.
#[must_use]
pub fn build_mention_reply_blocks() -> Value {
    json!([
        {
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": "*Hello!*\nPick an action below."
            }
        },
        {
            "type": "actions",
            "block_id": ACTIONS_BLOCK_ID,
            "elements": [
                {
                    "type": "button",
                    "action_id": ACKNOWLEDGE_ACTION_ID,
                    "value": "acknowledge",
                    "style": "primary",
                    "text": {"type": "plain_text", "text": "Acknowledge"}
                },
                {
                    "type": "button",
                    "action_id": DISMISS_ACTION_ID,
                    "value": "dismiss",
                    "style": "danger",
                    "text": {"type": "plain_text", "text": "Dismiss"}
                }
            ]
        }
    ])
}

/// Content that replaces the mention reply once it is dismissed.
#[must_use]
pub fn build_dismissed_blocks() -> Value {
    json!([
        {
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": "*Hello!*\nThis message was dismissed."
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_reply_has_two_styled_buttons() {
        let blocks = build_mention_reply_blocks();
        let elements = blocks[1]["elements"].as_array().unwrap();
        assert_eq!(blocks[1]["type"], "actions");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0]["style"], "primary");
        assert_eq!(elements[1]["style"], "danger");
        assert_eq!(elements[1]["action_id"], DISMISS_ACTION_ID);
    }
}
