use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Slack secret unavailable: {0}")]
    SecretUnavailable(String),

    #[error("Malformed Slack verification headers: {0}")]
    MalformedHeaders(String),

    #[error("Slack signature verification failed: {0}")]
    BadSignature(String),

    #[error("Failed to parse Slack event: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to decode notification envelope: {0}")]
    EnvelopeDecode(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RelayError {
    /// HTTP status reported to API Gateway when the webhook handler fails.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MalformedHeaders(_) => 400,
            RelayError::BadSignature(_) => 401,
            _ => 500,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::ParseError(error.to_string())
    }
}
