use serde::{Deserialize, Serialize};

/// Slack request classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedEvent {
    /// `url_verification` handshake; the token must be echoed back.
    Challenge { challenge: String },
    Callback(CallbackEvent),
    Interaction(InteractionCallback),
    /// `app_rate_limited` notice from the Events API.
    RateLimited,
    /// Any other Events API envelope; acknowledged without action.
    Unsupported,
}

/// Outer Events API body, keyed by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum EventsApiBody {
    UrlVerification { challenge: String },
    EventCallback(CallbackEvent),
    AppRateLimited {},
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CallbackEvent {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub api_app_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    pub event: InnerEvent,
}

/// Inner callback event. Types the bot does not act on decode to `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InnerEvent {
    AppMention(AppMentionEvent),
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppMentionEvent {
    pub channel: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

/// Interactive component submission (`payload=` form field).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionCallback {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub actions: Vec<BlockAction>,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub response_url: Option<String>,
    #[serde(default)]
    pub trigger_id: Option<String>,
}

impl InteractionCallback {
    /// Id of the first reported block action, if any.
    #[must_use]
    pub fn action_id(&self) -> Option<&str> {
        self.actions.first().map(|a| a.action_id.as_str())
    }

    #[must_use]
    pub fn channel_id(&self) -> Option<&str> {
        self.channel.as_ref().map(|c| c.id.as_str())
    }

    #[must_use]
    pub fn response_url(&self) -> Option<&str> {
        self.response_url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlockAction {
    pub action_id: String,
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}
