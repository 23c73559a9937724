//! HTTP-shaped view of an API Gateway proxy event.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::RelayError;

/// Case-insensitive, multi-valued header collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    values: HashMap<String, Vec<String>>,
}

impl Headers {
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// First value recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&name.to_ascii_lowercase())
            .and_then(|v| v.first())
            .map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::default();
        for (k, v) in iter {
            headers.append(k.as_ref(), v);
        }
        headers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub headers: Headers,
    pub body: String,
}

impl InboundRequest {
    /// Builds a request from a REST (v1) or HTTP (v2) API Gateway payload.
    ///
    /// `multiValueHeaders` wins over `headers` when both are present. Base64
    /// bodies are decoded so signature checks see the bytes Slack signed.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the body is not a string or cannot be decoded.
    pub fn from_gateway_payload(payload: &Value) -> Result<Self, RelayError> {
        let mut headers = Headers::default();

        if let Some(multi) = payload.get("multiValueHeaders").and_then(Value::as_object) {
            for (name, values) in multi {
                for value in values.as_array().into_iter().flatten() {
                    if let Some(v) = value.as_str() {
                        headers.append(name, v);
                    }
                }
            }
        }

        if let Some(single) = payload.get("headers").and_then(Value::as_object) {
            for (name, value) in single {
                if headers.get(name).is_none() {
                    if let Some(v) = value.as_str() {
                        headers.append(name, v);
                    }
                }
            }
        }

        let body = match payload.get("body") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(RelayError::ParseError(
                    "request body is not a string".to_string(),
                ));
            }
        };

        let is_base64 = payload
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let body = if is_base64 {
            let bytes = STANDARD
                .decode(body.as_bytes())
                .map_err(|e| RelayError::ParseError(format!("invalid base64 body: {e}")))?;
            String::from_utf8(bytes)
                .map_err(|e| RelayError::ParseError(format!("body is not UTF-8: {e}")))?
        } else {
            body
        };

        Ok(Self { headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_multi_value_headers_case_insensitively() {
        let payload = json!({
            "multiValueHeaders": { "X-Slack-Signature": ["v0=aa", "v0=bb"] },
            "body": "hello"
        });
        let req = InboundRequest::from_gateway_payload(&payload).unwrap();
        assert_eq!(req.headers.get("x-slack-signature"), Some("v0=aa"));
        assert_eq!(req.headers.get("X-SLACK-SIGNATURE"), Some("v0=aa"));
        assert_eq!(req.body, "hello");
    }

    #[test]
    fn falls_back_to_single_value_headers() {
        let payload = json!({
            "headers": { "x-slack-request-timestamp": "1531420618" },
            "body": "{}"
        });
        let req = InboundRequest::from_gateway_payload(&payload).unwrap();
        assert_eq!(req.headers.get("X-Slack-Request-Timestamp"), Some("1531420618"));
    }

    #[test]
    fn decodes_base64_body() {
        let payload = json!({
            "headers": {},
            "body": "cGF5bG9hZD0lN0IlN0Q=",
            "isBase64Encoded": true
        });
        let req = InboundRequest::from_gateway_payload(&payload).unwrap();
        assert_eq!(req.body, "payload=%7B%7D");
    }

    #[test]
    fn missing_body_is_empty() {
        let req = InboundRequest::from_gateway_payload(&json!({})).unwrap();
        assert!(req.body.is_empty());
        assert!(req.headers.get("anything").is_none());
    }

    #[test]
    fn non_string_body_is_rejected() {
        let err = InboundRequest::from_gateway_payload(&json!({"body": 5})).unwrap_err();
        assert!(matches!(err, RelayError::ParseError(_)));
    }
}
