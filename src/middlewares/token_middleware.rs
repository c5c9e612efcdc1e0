//! 토큰 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 Bearer 토큰을 검증하고 Payload를 추출합니다.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{Payload as RequestBody, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, Result,
};

use crate::errors::AppError;
use crate::middlewares::token_inner::TokenMiddlewareService;
use crate::token::{Payload, TokenManager};

/// 인증 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 유효한 토큰이 없으면 401 응답
    Required,
    /// 토큰이 없거나 잘못되어도 요청 진행
    Optional,
}

/// 토큰 인증 미들웨어
pub struct TokenMiddleware {
    mode: AuthMode,
    token_manager: Arc<dyn TokenManager>,
}

impl TokenMiddleware {
    pub fn new(mode: AuthMode, token_manager: Arc<dyn TokenManager>) -> Self {
        Self {
            mode,
            token_manager,
        }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required(token_manager: Arc<dyn TokenManager>) -> Self {
        Self::new(AuthMode::Required, token_manager)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional(token_manager: Arc<dyn TokenManager>) -> Self {
        Self::new(AuthMode::Optional, token_manager)
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for TokenMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = TokenMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
            token_manager: self.token_manager.clone(),
        }))
    }
}

/// 미들웨어가 검증한 Payload 추출기
///
/// 검증된 Payload가 없으면 `AppError::AuthenticationError`(401)를 반환합니다.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Payload);

impl Authenticated {
    pub fn into_inner(self) -> Payload {
        self.0
    }
}

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut RequestBody) -> Self::Future {
        ready(
            req.extensions()
                .get::<Payload>()
                .cloned()
                .map(Authenticated)
                .ok_or_else(|| AppError::AuthenticationError("no authenticated token".to_string())),
        )
    }
}
