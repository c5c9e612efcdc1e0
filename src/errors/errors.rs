//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 각 하위 모듈은 자신만의 `thiserror` 에러 타입을 가지며
//! (`TokenError`, `DbError`, `MailError`, `ServerError`, `LoggerError`),
//! HTTP 경계에서는 모두 [`AppError`]로 변환되어 JSON 응답이 됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use backend_toolkit::errors::AppResult;
//!
//! async fn verify(manager: &dyn TokenManager, token: &str) -> AppResult<Payload> {
//!     // TokenError -> AppError::AuthenticationError
//!     Ok(manager.validate_token(token)?)
//! }
//! ```

use thiserror::Error;

use crate::db::DbError;
use crate::logger::LoggerError;
use crate::mail::MailError;
use crate::server::ServerError;
use crate::token::TokenError;

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 설정 오류 (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 외부 서비스 에러 (502 Bad Gateway)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }

    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::InvalidToken | TokenError::ExpiredToken => {
                AppError::AuthenticationError(error.to_string())
            }
            TokenError::InvalidDuration => AppError::ValidationError(error.to_string()),
            TokenError::Encoding(_) => AppError::InternalError(error.to_string()),
            TokenError::EmptyKey
            | TokenError::InvalidKeySize { .. }
            | TokenError::UnsupportedTokenType(_) => AppError::ConfigError(error.to_string()),
        }
    }
}

impl From<DbError> for AppError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::MissingDsn(_) | DbError::InvalidPolicy(_) => {
                AppError::ConfigError(error.to_string())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<MailError> for AppError {
    fn from(error: MailError) -> Self {
        match error {
            MailError::Transport(_) => AppError::ExternalServiceError(error.to_string()),
            MailError::Attachment { .. } => AppError::InternalError(error.to_string()),
            _ => AppError::ValidationError(error.to_string()),
        }
    }
}

impl From<ServerError> for AppError {
    fn from(error: ServerError) -> Self {
        AppError::ConfigError(error.to_string())
    }
}

impl From<LoggerError> for AppError {
    fn from(error: LoggerError) -> Self {
        AppError::InternalError(error.to_string())
    }
}
