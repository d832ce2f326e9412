//! Error types for ctxbench
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// ctxbench 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // 대상 서비스 관련
    // ========================================================================
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // ========================================================================
    // 출력 관련
    // ========================================================================
    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Report error: {0}")]
    Report(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 네트워크 계층에서 발생한 에러인지 확인
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Provider(_))
    }

    /// 사용자 입력(설정 파일 등) 문제인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Validation(_))
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::Http("refused".into()).is_transport());
        assert!(Error::Validation("bad".into()).is_user_facing());
        assert!(!Error::Chart("font".into()).is_transport());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}
