//! Error types for mobile-services.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

/// Maximum length for response bodies carried in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Primary error type for all client operations.
#[derive(Error, Debug)]
pub enum MobileServiceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid authentication provider: {0}")]
    InvalidProvider(String),

    #[error("A login is already in progress")]
    LoginInProgress,

    #[error("Login was canceled")]
    LoginCanceled,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authenticator error: {message}")]
    Authenticator {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Presentation error: {0}")]
    Presentation(String),
}

impl MobileServiceError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an API error from a status code and raw response body.
    ///
    /// Prefers the `error` field of a JSON body when the server sent one. Either
    /// way the message is capped at 500 bytes.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .map(truncate_body)
            })
            .unwrap_or_else(|| truncate_body(body));
        Self::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Wrap an authenticator failure that carries no structured error.
    pub fn authenticator(message: impl Into<String>) -> Self {
        Self::Authenticator {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an authenticator failure with its underlying error.
    pub fn authenticator_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Authenticator {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProvider(_) | Self::InvalidUri(_) => ErrorCategory::InvalidArgument,
            Self::LoginInProgress => ErrorCategory::InvalidState,
            Self::LoginCanceled => ErrorCategory::Canceled,
            Self::Authenticator { .. } => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Serialization(_) | Self::InvalidResponse(_) => ErrorCategory::Serialization,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::Presentation(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether the error was raised before any UI or network action.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::InvalidArgument | ErrorCategory::InvalidState
        )
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}... (truncated, {} total bytes)",
        &body[..end],
        body.len()
    )
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MobileServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_prefers_server_error_field() {
        let err = MobileServiceError::from_status(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"code":401,"error":"Error: The token is invalid"}"#,
        );
        assert_eq!(
            err.to_string(),
            "API error (status 401): Error: The token is invalid"
        );
        assert_eq!(err.category(), ErrorCategory::Authentication);
    }

    #[test]
    fn from_status_truncates_long_bodies() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let err = MobileServiceError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body);
        match err {
            MobileServiceError::Api { status, message } => {
                assert_eq!(status, 502);
                assert!(message.ends_with("(truncated, 520 total bytes)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_status_truncates_long_error_field() {
        let long = "e".repeat(MAX_ERROR_BODY_LENGTH * 2);
        let body = serde_json::json!({ "error": long }).to_string();
        let err = MobileServiceError::from_status(reqwest::StatusCode::BAD_REQUEST, &body);
        match err {
            MobileServiceError::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with(&"e".repeat(MAX_ERROR_BODY_LENGTH)));
                assert!(message.ends_with("(truncated, 1000 total bytes)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn precondition_errors_are_flagged() {
        assert!(MobileServiceError::LoginInProgress.is_precondition());
        let invalid = MobileServiceError::InvalidProvider("myspace".into());
        assert!(invalid.is_precondition());
        assert!(!MobileServiceError::LoginCanceled.is_precondition());
        assert!(!MobileServiceError::authenticator("boom").is_precondition());
    }
}
