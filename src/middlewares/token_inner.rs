//! TokenMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::middlewares::token_middleware::AuthMode;
use crate::token::{extract_bearer_token, Payload, TokenError, TokenManager};

/// 실제 인증 로직을 수행하는 서비스
pub struct TokenMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub token_manager: Arc<dyn TokenManager>,
}

impl<S, B> Service<ServiceRequest> for TokenMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;
        let auth_result = authenticate(&req, self.token_manager.as_ref());

        Box::pin(async move {
            match (mode, auth_result) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("인증 실패: {}", err);
                    let code = match err {
                        TokenError::ExpiredToken => "token_expired",
                        _ => "authentication_required",
                    };
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "error": code,
                        "message": err.to_string()
                    }));
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
                (_, Ok(payload)) => {
                    log::debug!("인증 성공: {} ({})", payload.username, payload.id);
                    req.extensions_mut().insert(payload);
                }
                (AuthMode::Optional, Err(err)) => {
                    log::debug!("선택적 인증: {}, 요청 진행", err);
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청의 Authorization 헤더에서 토큰을 추출하고 검증
fn authenticate(req: &ServiceRequest, token_manager: &dyn TokenManager) -> Result<Payload, TokenError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or(TokenError::InvalidToken)?;

    token_manager.validate_token(token)
}
