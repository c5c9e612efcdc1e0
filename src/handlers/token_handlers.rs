//! 토큰 발급/검증 HTTP 핸들러

use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use chrono::Duration;

use crate::config::TokenConfig;
use crate::domain::{ApiResponse, IssueTokenRequest, TokenResponse, VerifyTokenRequest, VerifyTokenResponse};
use crate::errors::AppError;
use crate::middlewares::Authenticated;
use crate::token::{TokenError, TokenManager};
use validator::Validate;

/// 핸들러가 공유하는 토큰 상태
#[derive(Clone)]
pub struct TokenState {
    pub token_manager: Arc<dyn TokenManager>,
    /// 요청에 유효 기간이 없을 때 사용하는 기본값
    pub default_duration: Duration,
}

impl TokenState {
    pub fn new(token_manager: Arc<dyn TokenManager>, default_duration: Duration) -> Self {
        Self {
            token_manager,
            default_duration,
        }
    }

    /// 환경 변수 설정으로 상태를 생성합니다.
    pub fn from_env() -> Result<Self, TokenError> {
        Ok(Self::new(TokenConfig::token_manager()?, TokenConfig::duration()))
    }
}

/// 토큰 발급 핸들러
///
/// # Endpoint
/// `POST /api/v1/tokens`
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/tokens \
///   -H "Content-Type: application/json" \
///   -d '{"username":"alice","duration_minutes":30}'
/// ```
#[post("")]
pub async fn issue_token(
    state: web::Data<TokenState>,
    payload: web::Json<IssueTokenRequest>,
) -> Result<HttpResponse, AppError> {
    // 유효성 검사
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let duration = match payload.duration_minutes {
        Some(minutes) => Duration::try_minutes(minutes)
            .ok_or_else(|| AppError::ValidationError("duration_minutes is out of range".to_string()))?,
        None => state.default_duration,
    };

    let manager = &state.token_manager;
    let (token, claims) = match payload.user_id {
        Some(user_id) => manager.generate_token_for_user(user_id, &payload.username, duration)?,
        None => manager.generate_token(&payload.username, duration)?,
    };

    log::info!(
        "🔑 토큰 발급 - 사용자: {}, 백엔드: {}, 만료: {}",
        claims.username,
        manager.token_type(),
        claims.expired_at
    );

    let response = TokenResponse::new(token, manager.token_type().as_str(), claims);
    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

/// 토큰 검증 핸들러
///
/// # Endpoint
/// `POST /api/v1/tokens/verify`
#[post("/verify")]
pub async fn verify_token(
    state: web::Data<TokenState>,
    payload: web::Json<VerifyTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let claims = state.token_manager.validate_token(payload.token.trim())?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(VerifyTokenResponse {
        valid: true,
        payload: claims,
    })))
}

/// 현재 요청의 토큰 정보 조회
///
/// # Endpoint
/// `GET /api/v1/me` (TokenMiddleware 필수 모드)
#[get("")]
pub async fn current_token(auth: Authenticated) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(auth.into_inner()))
}
