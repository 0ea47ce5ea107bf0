use crate::errors::ErrorKind;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Longest slice of an upstream error body carried in an error cause.
const MAX_CAUSE_CHARS: usize = 300;

/// What went wrong on a single upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Connection, TLS or body-read failure.
    Network,
    /// The endpoint's timeout elapsed.
    Timeout,
    /// Non-success status, or a success status carrying an `error` body.
    Status(u16),
    /// Body was not valid JSON.
    Decode,
    /// Body was JSON but lacked the field the wrapper needs.
    Schema,
}

impl ServiceErrorKind {
    pub fn category(self) -> ErrorKind {
        match self {
            Self::Network | Self::Timeout => ErrorKind::Transport,
            Self::Status(_) => ErrorKind::Upstream,
            Self::Decode | Self::Schema => ErrorKind::Schema,
        }
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => f.write_str("network failure"),
            Self::Timeout => f.write_str("timed out"),
            Self::Status(code) => write!(f, "returned status {}", code),
            Self::Decode => f.write_str("returned an undecodable body"),
            Self::Schema => f.write_str("returned an unexpected body"),
        }
    }
}

/// Failure of one call to one external endpoint.
#[derive(Debug, Clone, Error)]
#[error("{endpoint} service {kind}: {cause}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    /// Name of the configured endpoint (e.g. "translator").
    pub endpoint: String,
    pub cause: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, endpoint: &str, cause: impl Into<String>) -> Self {
        Self {
            kind,
            endpoint: endpoint.to_string(),
            cause: cause.into(),
        }
    }

    /// Response decoded fine but the expected field was absent.
    pub fn schema(endpoint: &str, cause: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Schema, endpoint, cause)
    }

    pub(crate) fn from_reqwest(endpoint: &str, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ServiceErrorKind::Timeout
        } else {
            ServiceErrorKind::Network
        };
        Self::new(kind, endpoint, err.to_string())
    }

    pub fn category(&self) -> ErrorKind {
        self.kind.category()
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ServiceErrorKind::Timeout
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// Understands the Google (`{"error": {"message": ..}}`) and Hugging Face
/// (`{"error": "..."}`) shapes and falls back to the raw, truncated text.
pub(crate) fn upstream_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(err) = json.get("error")
    {
        return error_value_message(err);
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    truncate(trimmed)
}

/// Message for an `error` value embedded in an otherwise successful body.
pub(crate) fn error_value_message(err: &Value) -> String {
    match err {
        Value::String(s) => truncate(s),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| truncate(&err.to_string()), truncate),
        other => truncate(&other.to_string()),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CAUSE_CHARS {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_CAUSE_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_categories() {
        assert_eq!(ServiceErrorKind::Network.category(), ErrorKind::Transport);
        assert_eq!(ServiceErrorKind::Timeout.category(), ErrorKind::Transport);
        assert_eq!(ServiceErrorKind::Status(503).category(), ErrorKind::Upstream);
        assert_eq!(ServiceErrorKind::Decode.category(), ErrorKind::Schema);
        assert_eq!(ServiceErrorKind::Schema.category(), ErrorKind::Schema);
    }

    #[test]
    fn test_display_includes_endpoint_and_status() {
        let err = ServiceError::new(ServiceErrorKind::Status(401), "sentiment", "bad token");
        assert_eq!(
            err.to_string(),
            "sentiment service returned status 401: bad token"
        );
    }

    #[test]
    fn test_upstream_message_google_shape() {
        let body = r#"{"error": {"code": 400, "message": "Invalid Value", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(upstream_message(body), "Invalid Value");
    }

    #[test]
    fn test_upstream_message_huggingface_shape() {
        let body = r#"{"error": "Model facebook/bart-large-cnn is currently loading", "estimated_time": 20.0}"#;
        assert_eq!(
            upstream_message(body),
            "Model facebook/bart-large-cnn is currently loading"
        );
    }

    #[test]
    fn test_upstream_message_plain_text_truncated() {
        let body = "x".repeat(1000);
        let msg = upstream_message(&body);
        assert_eq!(msg.chars().count(), MAX_CAUSE_CHARS + 1);
        assert!(msg.ends_with('…'));
    }

    #[test]
    fn test_upstream_message_empty_body() {
        assert_eq!(upstream_message("  "), "empty response body");
    }
}
