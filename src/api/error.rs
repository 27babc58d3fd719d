use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Error type for all backend API calls.
///
/// Network failures, HTTP error statuses and undecodable bodies are kept
/// distinct so callers can render them differently: an unreachable backend
/// is not the same failure as a 422 from a bad CSV row.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend unreachable, timed out, or the connection dropped mid-read
    #[error("backend unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response; `message` comes from the body's `detail` field
    /// when one was present, otherwise from the HTTP status reason
    #[error("HTTP {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        detail: Option<Value>,
    },

    /// 2xx response whose body did not match the expected payload shape
    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    /// Build a `Status` error from a non-2xx response body.
    ///
    /// The backend reports failures as `{"detail": "..."}`; an absent or
    /// unparseable body degrades to the status reason text.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("detail"))
            .and_then(|d| d.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        ApiError::Status {
            status,
            message,
            detail: parsed,
        }
    }

    /// HTTP status code, if this error carries one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Whether a retry could plausibly succeed (connectivity or 5xx).
    /// Client errors (4xx) are deterministic and never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_field_is_preferred() {
        let err =
            ApiError::from_response(StatusCode::NOT_FOUND, r#"{"detail": "No portfolio data found"}"#);
        match err {
            ApiError::Status { status, message, detail } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "No portfolio data found");
                assert!(detail.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_body_degrades_to_status_text() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "");
        match err {
            ApiError::Status { message, detail, .. } => {
                assert_eq!(message, "Bad Gateway");
                assert!(detail.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_string_detail_degrades_to_status_text() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body", "ticker"], "msg": "field required"}]}"#,
        );
        match err {
            ApiError::Status { message, detail, .. } => {
                assert_eq!(message, "Unprocessable Entity");
                // raw payload is still preserved for callers that want it
                assert!(detail.unwrap().get("detail").unwrap().is_array());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_retryable_classification() {
        let server = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        let client = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, "{}");
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
    }
}
