//! Decoding of the notifier's trigger payload.
//!
//! The payload is an SNS event. Each record's `Message` is a JSON-encoded
//! CloudWatch (EventBridge) event whose `detail` is the CloudTrail record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::RelayError;

pub const CONSOLE_LOGIN_EVENT: &str = "ConsoleLogin";

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

impl NotificationEnvelope {
    /// # Errors
    ///
    /// Returns `EnvelopeDecode` if the payload is not an SNS event.
    pub fn from_payload(payload: &Value) -> Result<Self, RelayError> {
        Self::deserialize(payload)
            .map_err(|e| RelayError::EnvelopeDecode(format!("SNS event: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnsEntity {
    #[serde(rename = "MessageId", default)]
    pub message_id: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
}

/// CloudWatch event carried in an SNS message.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditEnvelope {
    #[serde(default)]
    pub account: String,
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
}

impl AuditEnvelope {
    /// # Errors
    ///
    /// Returns `EnvelopeDecode` if the message is not a CloudWatch event.
    pub fn from_message(message: &str) -> Result<Self, RelayError> {
        serde_json::from_str(message)
            .map_err(|e| RelayError::EnvelopeDecode(format!("CloudWatch event: {e}")))
    }

    /// `detail.eventName`, read without decoding the rest of the record.
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        self.detail.as_ref()?.get("eventName")?.as_str()
    }

    #[must_use]
    pub fn is_console_login(&self) -> bool {
        self.event_name() == Some(CONSOLE_LOGIN_EVENT)
    }

    /// # Errors
    ///
    /// Returns `EnvelopeDecode` if `detail` is missing or not a CloudTrail record.
    pub fn console_login_detail(&self) -> Result<ConsoleLoginDetail, RelayError> {
        let detail = self
            .detail
            .as_ref()
            .ok_or_else(|| RelayError::EnvelopeDecode("event has no detail".to_string()))?;
        ConsoleLoginDetail::deserialize(detail)
            .map_err(|e| RelayError::EnvelopeDecode(format!("CloudTrail detail: {e}")))
    }
}

/// The CloudTrail fields the alert needs. Most are optional because the same
/// shape is used for every event name before filtering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleLoginDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_name: String,
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_identity: UserIdentity,
    #[serde(default)]
    pub response_elements: Option<ResponseElements>,
    #[serde(default)]
    pub additional_event_data: Option<AdditionalEventData>,
    #[serde(rename = "sourceIPAddress", default, deserialize_with = "null_as_default")]
    pub source_ip_address: String,
}

impl ConsoleLoginDetail {
    #[must_use]
    pub fn is_console_login(&self) -> bool {
        self.event_name == CONSOLE_LOGIN_EVENT
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub identity_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseElements {
    #[serde(rename = "ConsoleLogin", default, deserialize_with = "null_as_default")]
    pub console_login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdditionalEventData {
    #[serde(rename = "MFAUsed", default, deserialize_with = "null_as_default")]
    pub mfa_used: String,
}

// CloudTrail writes `null` for absent values
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Normal,
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginResult {
    Success,
    Failure,
}

/// A console login, ready to format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAuditRecord {
    pub user_name: String,
    pub user_type: UserType,
    pub event_time: DateTime<Utc>,
    pub login_result: LoginResult,
    /// Raw `MFAUsed` value, normally `Yes` or `No`.
    pub mfa_used: String,
    pub source_ip: String,
    pub account_id: String,
}

impl LoginAuditRecord {
    /// # Errors
    ///
    /// Returns `EnvelopeDecode` if the detail is not a console login or has
    /// no event time.
    pub fn from_detail(detail: &ConsoleLoginDetail, account_id: &str) -> Result<Self, RelayError> {
        if !detail.is_console_login() {
            return Err(RelayError::EnvelopeDecode(format!(
                "{} is not a {CONSOLE_LOGIN_EVENT} event",
                detail.event_name
            )));
        }
        let event_time = detail.event_time.ok_or_else(|| {
            RelayError::EnvelopeDecode("ConsoleLogin event has no eventTime".to_string())
        })?;

        let user_type = if detail.user_identity.identity_type == "Root" {
            UserType::Root
        } else {
            UserType::Normal
        };
        let login_result = match &detail.response_elements {
            Some(r) if r.console_login == "Success" => LoginResult::Success,
            _ => LoginResult::Failure,
        };

        // root identities carry no userName
        let user_name = match (&detail.user_identity.user_name, user_type) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, UserType::Root) => "root".to_string(),
            _ => String::new(),
        };

        Ok(Self {
            user_name,
            user_type,
            event_time,
            login_result,
            mfa_used: detail
                .additional_event_data
                .as_ref()
                .map(|d| d.mfa_used.clone())
                .unwrap_or_default(),
            source_ip: detail.source_ip_address.clone(),
            account_id: account_id.to_string(),
        })
    }

    #[must_use]
    pub fn used_mfa(&self) -> bool {
        self.mfa_used == "Yes"
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.login_result == LoginResult::Success
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.user_type == UserType::Root
    }
}
