//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! - **`token_handlers`**: 토큰 발급/검증 엔드포인트
//!   - 토큰 발급 (`POST /api/v1/tokens`)
//!   - 토큰 검증 (`POST /api/v1/tokens/verify`)
//!   - 현재 토큰 정보 (`GET /api/v1/me`, 토큰 미들웨어 필요)
//!
//! 라우트 등록은 [`crate::routes`]에서 합니다.

pub mod token_handlers;

pub use token_handlers::TokenState;
