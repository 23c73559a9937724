use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, warn};

use super::request::Headers;
use crate::errors::RelayError;

pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// Oldest request age accepted, in seconds.
pub const MAX_REQUEST_AGE_SECS: i64 = 300;
/// Tolerated clock skew for timestamps ahead of ours, in seconds.
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

const SIGNATURE_VERSION: &str = "v0";

/// Verifies a Slack request against the signing secret using the system clock.
///
/// # Errors
///
/// See [`verify_slack_request_at`].
pub fn verify_slack_request(
    headers: &Headers,
    request_body: &str,
    signing_secret: &str,
) -> Result<(), RelayError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| RelayError::InternalError(format!("system clock before epoch: {e}")))?;
    let now_secs = i64::try_from(now.as_secs())
        .map_err(|e| RelayError::InternalError(format!("system clock out of range: {e}")))?;
    verify_slack_request_at(headers, request_body, signing_secret, now_secs)
}

/// Verifies a Slack request as of `now_secs` (unix seconds).
///
/// # Errors
///
/// - `MalformedHeaders` if the timestamp or signature header is missing, or the
///   timestamp is not an integer.
/// - `BadSignature` if the timestamp is outside the freshness window or the
///   signature does not match the body.
/// - `InternalError` if the HMAC cannot be keyed.
pub fn verify_slack_request_at(
    headers: &Headers,
    request_body: &str,
    signing_secret: &str,
    now_secs: i64,
) -> Result<(), RelayError> {
    let Some(timestamp) = headers.get(TIMESTAMP_HEADER) else {
        return Err(RelayError::MalformedHeaders(format!(
            "missing {TIMESTAMP_HEADER} header"
        )));
    };
    let Some(signature) = headers.get(SIGNATURE_HEADER) else {
        return Err(RelayError::MalformedHeaders(format!(
            "missing {SIGNATURE_HEADER} header"
        )));
    };

    let ts = timestamp.trim().parse::<i64>().map_err(|e| {
        RelayError::MalformedHeaders(format!("invalid {TIMESTAMP_HEADER} '{timestamp}': {e}"))
    })?;

    let age = now_secs.saturating_sub(ts);
    if age > MAX_REQUEST_AGE_SECS || age < -MAX_CLOCK_SKEW_SECS {
        warn!(age_secs = age, "Timestamp out of range, potential replay attack");
        return Err(RelayError::BadSignature(
            "request timestamp outside freshness window".to_string(),
        ));
    }

    let provided = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or_else(|| RelayError::BadSignature("signature is not v0=<hex>".to_string()))?;

    let mut mac = keyed_mac(signing_secret)?;
    mac.update(base_string(timestamp, request_body).as_bytes());

    // verify_slice compares in constant time
    mac.verify_slice(&provided).map_err(|_| {
        error!("Slack signature verification failed");
        RelayError::BadSignature("signature mismatch".to_string())
    })
}

/// Computes the `v0=<hex>` signature Slack would send for this body.
///
/// # Errors
///
/// Returns `InternalError` if the HMAC cannot be keyed.
pub fn compute_signature(
    timestamp: &str,
    request_body: &str,
    signing_secret: &str,
) -> Result<String, RelayError> {
    let mut mac = keyed_mac(signing_secret)?;
    mac.update(base_string(timestamp, request_body).as_bytes());
    Ok(format!(
        "{SIGNATURE_VERSION}={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn base_string(timestamp: &str, request_body: &str) -> String {
    format!("{SIGNATURE_VERSION}:{timestamp}:{request_body}")
}

fn keyed_mac(signing_secret: &str) -> Result<Hmac<Sha256>, RelayError> {
    Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()).map_err(|e| {
        error!("Failed to create HMAC: {}", e);
        RelayError::InternalError(format!("failed to create HMAC: {e}"))
    })
}
