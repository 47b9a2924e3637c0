//! Error types for dbx-core.

use thiserror::Error;

/// Result type alias using dbx-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Databricks API operations.
///
/// API failures are classified by HTTP status so callers get a seam for
/// typed handling, even though the MCP layer flattens everything into a
/// single error envelope.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {path}: {message}")]
    NotFound { path: String, message: String },

    #[error("Permission denied ({status}): {message}")]
    PermissionDenied { status: u16, message: String },

    #[error("Rate limited by the workspace API: {message}")]
    RateLimited { message: String },

    #[error("API error {status}{}: {message}", error_code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Api {
        status: u16,
        error_code: Option<String>,
        message: String,
    },

    #[error("Invalid response payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Classify a non-success API response by status code and error body.
    pub fn from_response(status: u16, path: &str, error_code: Option<String>, message: String) -> Self {
        match status {
            404 => Error::NotFound {
                path: path.to_string(),
                message,
            },
            401 | 403 => Error::PermissionDenied { status, message },
            429 => Error::RateLimited { message },
            _ => Error::Api {
                status,
                error_code,
                message,
            },
        }
    }

    /// Whether this error is a not-found classification.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_not_found() {
        let err = Error::from_response(
            404,
            "/api/2.1/clusters/get",
            Some("RESOURCE_DOES_NOT_EXIST".into()),
            "Cluster abc-123 does not exist".into(),
        );
        assert!(err.is_not_found());
        let text = err.to_string();
        assert!(text.contains("abc-123"));
        assert!(text.contains("/api/2.1/clusters/get"));
    }

    #[test]
    fn classifies_permission_denied() {
        let err = Error::from_response(403, "/api/2.0/secrets/list", None, "denied".into());
        assert!(matches!(err, Error::PermissionDenied { status: 403, .. }));
    }

    #[test]
    fn classifies_rate_limited() {
        let err = Error::from_response(429, "/api/2.1/clusters/list", None, "slow down".into());
        assert!(matches!(err, Error::RateLimited { .. }));
    }

    #[test]
    fn generic_api_error_keeps_error_code() {
        let err = Error::from_response(
            400,
            "/api/2.0/sql/statements",
            Some("INVALID_PARAMETER_VALUE".into()),
            "bad statement".into(),
        );
        let text = err.to_string();
        assert!(text.contains("INVALID_PARAMETER_VALUE"));
        assert!(text.contains("400"));
    }
}
