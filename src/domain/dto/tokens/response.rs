use serde::Serialize;

use crate::token::Payload;

/// API 응답 래퍼
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

/// 토큰 발급 응답 DTO
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// 항상 `"Bearer"`
    pub token_type: &'static str,
    /// 토큰을 만든 백엔드 (`jwt` | `paseto`)
    pub backend: String,
    /// 만료까지 남은 초
    pub expires_in: i64,
    pub payload: Payload,
}

impl TokenResponse {
    pub fn new(access_token: String, backend: &str, payload: Payload) -> Self {
        Self {
            access_token,
            token_type: "Bearer",
            backend: backend.to_string(),
            expires_in: payload.remaining_seconds(),
            payload,
        }
    }
}

/// 토큰 검증 응답 DTO
#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub payload: Payload,
}
