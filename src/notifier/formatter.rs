//! Console login alert formatting.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::envelope::LoginAuditRecord;

const MENTION_CHANNEL: &str = "<!channel> ";
const ROOT_LOGIN_NOTICE: &str = "This login was made with the root user.";
const NO_MFA_NOTICE: &str = "MFA was not used for this login.";

/// Alert level. Ordered so that a rule can only raise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// Slack attachment color.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Severity::Normal => "good",
            Severity::Warning => "warning",
            Severity::Critical => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    fn short(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAlert {
    pub severity: Severity,
    pub text: String,
    pub fields: Vec<AttachmentField>,
}

impl LoginAlert {
    /// Incoming-webhook message with a single colored attachment.
    #[must_use]
    pub fn to_webhook_message(&self, username: &str) -> Value {
        json!({
            "username": username,
            "text": self.text,
            "attachments": [
                {
                    "color": self.severity.color(),
                    "fields": self.fields,
                }
            ]
        })
    }
}

/// Builds the alert for a console login.
///
/// Failed logins and root logins are critical; a login without MFA is at
/// least a warning.
#[must_use]
pub fn format_login_alert(record: &LoginAuditRecord, timezone: Tz) -> LoginAlert {
    let (mut severity, mut text) = if record.succeeded() {
        let mention = if record.is_root() { MENTION_CHANNEL } else { "" };
        (
            Severity::Normal,
            format!(
                "{mention}AWS console login occurred for account {}.",
                record.account_id
            ),
        )
    } else {
        (
            Severity::Critical,
            format!(
                "{MENTION_CHANNEL}AWS console login failure detected for account {}.",
                record.account_id
            ),
        )
    };

    if record.is_root() {
        text.push('\n');
        text.push_str(ROOT_LOGIN_NOTICE);
        severity = Severity::Critical;
    }

    if !record.used_mfa() {
        text.push('\n');
        text.push_str(NO_MFA_NOTICE);
        severity = severity.max(Severity::Warning);
    }

    LoginAlert {
        severity,
        text,
        fields: vec![
            AttachmentField::short("User", record.user_name.as_str()),
            AttachmentField::short("MFA", record.mfa_used.as_str()),
            AttachmentField::short("Time", format_event_time(record.event_time, timezone)),
            AttachmentField::short("IPAddress", record.source_ip.as_str()),
        ],
    }
}

/// Renders `time` in `timezone`, e.g. `2020-04-01 12:04:05 +0900 JST`.
#[must_use]
pub fn format_event_time(time: DateTime<Utc>, timezone: Tz) -> String {
    time.with_timezone(&timezone)
        .format("%Y-%m-%d %H:%M:%S %z %Z")
        .to_string()
}
