//! Errors surfaced by the REST client.

use thiserror::Error;

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: bad credentials, or the session token expired
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// 404 from the backend
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other non-2xx response
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response carrying `success: false`
    #[error("{message}")]
    Rejected { message: String },

    /// Backend unreachable, connection reset, timeout
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the session should be torn down
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Whether the backend reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Message suitable for a user-facing notice
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::NotFound { message }
            | ApiError::Status { message, .. }
            | ApiError::Rejected { message } => message.clone(),
            ApiError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ApiError::InvalidUrl(_) => "The API base URL is invalid.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_helpers() {
        let unauthorized = ApiError::Unauthorized {
            message: "jwt expired".to_string(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_not_found());

        let missing = ApiError::NotFound {
            message: "Tag not found".to_string(),
        };
        assert!(missing.is_not_found());
        assert_eq!(missing.user_message(), "Tag not found");
    }

    #[test]
    fn test_decode_error_hides_details_from_users() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.user_message(), "The server sent an unexpected response.");
    }
}
