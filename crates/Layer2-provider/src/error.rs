//! Provider-specific error types
//!
//! ProviderError는 대상 서비스 호출 관련 세부 에러를 관리합니다.
//! 클라이언트 경계 밖으로 전파되지 않고 0값 결과로 변환되며,
//! 필요 시 ctxbench_foundation::Error로 변환할 수 있습니다.

use ctxbench_foundation::Error as FoundationError;
use thiserror::Error;

/// Errors that can occur while talking to the target service
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Network error (connection refused, DNS, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid request (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Endpoint or model not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Create from HTTP status code and body
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let detail = format!("HTTP {} - {}", status, body);
        match status {
            400 | 401 | 403 | 422 => ProviderError::InvalidRequest(detail),
            404 => ProviderError::NotFound(detail),
            429 => ProviderError::RateLimited(detail),
            500..=599 => ProviderError::ServerError(detail),
            _ => ProviderError::Unknown(detail),
        }
    }

    /// Classify a reqwest transport error
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

// ============================================================================
// ctxbench_foundation::Error 변환
// ============================================================================

impl From<ProviderError> for FoundationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Network(msg) => FoundationError::Http(format!("Network: {}", msg)),
            ProviderError::Timeout(msg) => FoundationError::Http(format!("Timeout: {}", msg)),
            other => FoundationError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert!(matches!(
            ProviderError::from_http_status(500, "boom"),
            ProviderError::ServerError(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(429, ""),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(404, ""),
            ProviderError::NotFound(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(418, ""),
            ProviderError::Unknown(_)
        ));

        let err = ProviderError::from_http_status(400, "bad payload");
        assert!(err.to_string().contains("HTTP 400 - bad payload"));
    }

    #[test]
    fn test_foundation_conversion() {
        let err: FoundationError = ProviderError::Network("refused".into()).into();
        assert!(err.is_transport());
        assert!(matches!(err, FoundationError::Http(_)));

        let err: FoundationError = ProviderError::ServerError("x".into()).into();
        assert!(matches!(err, FoundationError::Provider(_)));
    }
}
