//! Gemini-specific error handling.

use echonotes_core::Error;

/// Gemini error classes, derived from the HTTP status and the `status`
/// field of the error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiErrorCode {
    /// Missing, invalid or unauthorized API key.
    AuthenticationError,
    /// Rate limit or quota exhausted.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Malformed request (including oversized prompts).
    InvalidArgument,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl GeminiErrorCode {
    /// Determine error code from HTTP status and error status string.
    pub fn from_response(status: u16, error_status: &str) -> Self {
        match (status, error_status) {
            (401 | 403, _) | (_, "UNAUTHENTICATED" | "PERMISSION_DENIED") => {
                Self::AuthenticationError
            }
            (429, _) | (_, "RESOURCE_EXHAUSTED") => Self::RateLimitExceeded,
            (404, _) | (_, "NOT_FOUND") => Self::ModelNotFound,
            (400, _) | (_, "INVALID_ARGUMENT" | "FAILED_PRECONDITION") => Self::InvalidArgument,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::ServerError)
    }
}

/// Convert a Gemini error into an EchoNotes Error.
pub fn to_echonotes_error(code: GeminiErrorCode, message: &str) -> Error {
    match code {
        GeminiErrorCode::AuthenticationError => {
            Error::Config(format!("Authentication failed: {}", message))
        }
        GeminiErrorCode::RateLimitExceeded => {
            Error::Inference(format!("Rate limit exceeded: {}", message))
        }
        GeminiErrorCode::ModelNotFound => Error::Config(format!("Model not found: {}", message)),
        GeminiErrorCode::InvalidArgument => {
            Error::Inference(format!("Invalid request: {}", message))
        }
        GeminiErrorCode::ServerError => Error::Inference(format!("Server error: {}", message)),
        GeminiErrorCode::Unknown => Error::Inference(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_401() {
        let code = GeminiErrorCode::from_response(401, "UNAUTHENTICATED");
        assert_eq!(code, GeminiErrorCode::AuthenticationError);
    }

    #[test]
    fn test_error_code_from_permission_denied() {
        let code = GeminiErrorCode::from_response(403, "PERMISSION_DENIED");
        assert_eq!(code, GeminiErrorCode::AuthenticationError);
    }

    #[test]
    fn test_error_code_from_429() {
        let code = GeminiErrorCode::from_response(429, "RESOURCE_EXHAUSTED");
        assert_eq!(code, GeminiErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_error_code_from_404() {
        let code = GeminiErrorCode::from_response(404, "NOT_FOUND");
        assert_eq!(code, GeminiErrorCode::ModelNotFound);
    }

    #[test]
    fn test_error_code_from_400() {
        let code = GeminiErrorCode::from_response(400, "INVALID_ARGUMENT");
        assert_eq!(code, GeminiErrorCode::InvalidArgument);
    }

    #[test]
    fn test_error_code_from_503() {
        let code = GeminiErrorCode::from_response(503, "UNAVAILABLE");
        assert_eq!(code, GeminiErrorCode::ServerError);
    }

    #[test]
    fn test_error_code_from_unknown() {
        let code = GeminiErrorCode::from_response(418, "");
        assert_eq!(code, GeminiErrorCode::Unknown);
    }

    #[test]
    fn test_retryable_codes() {
        assert!(GeminiErrorCode::RateLimitExceeded.is_retryable());
        assert!(GeminiErrorCode::ServerError.is_retryable());
        assert!(!GeminiErrorCode::AuthenticationError.is_retryable());
        assert!(!GeminiErrorCode::InvalidArgument.is_retryable());
    }

    #[test]
    fn test_to_echonotes_error_auth() {
        let err = to_echonotes_error(GeminiErrorCode::AuthenticationError, "API key not valid");
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[test]
    fn test_to_echonotes_error_rate_limit() {
        let err = to_echonotes_error(GeminiErrorCode::RateLimitExceeded, "Quota exceeded");
        assert!(err.to_string().contains("Rate limit exceeded"));
    }
}
