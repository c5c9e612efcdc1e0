//! 미들웨어 모듈
//!
//! # 제공 미들웨어
//!
//! ### 토큰 미들웨어 (TokenMiddleware)
//! - `Authorization: Bearer <token>` 헤더에서 토큰 추출
//! - 설정된 [`TokenManager`](crate::token::TokenManager)(JWT/PASETO)로 검증
//! - 검증된 [`Payload`](crate::token::Payload)를 request extension에 저장
//! - 선택적/강제 인증 모드 지원
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::web;
//! use crate::middlewares::{Authenticated, TokenMiddleware};
//!
//! cfg.service(
//!     web::scope("/api/v1/me")
//!         .wrap(TokenMiddleware::required(token_manager.clone()))
//!         .route("", web::get().to(|auth: Authenticated| async move {
//!             HttpResponse::Ok().json(auth.into_inner())
//!         }))
//! );
//! ```

mod token_inner;
pub mod token_middleware;

pub use token_middleware::{AuthMode, Authenticated, TokenMiddleware};
