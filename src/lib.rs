//! 백엔드 서비스 공용 툴킷
//!
//! 백엔드 서비스들이 공통으로 사용하는 기반 기능을 모은 라이브러리입니다.
//!
//! # Features
//!
//! - **토큰**: JWT(HS256) / PASETO(v4.local) 발급 및 검증, 공통 [`token::TokenManager`] 인터페이스
//! - **로거**: 표준 출력 + 타임스탬프 로그 파일 동시 기록
//! - **데이터베이스**: MongoDB, PostgreSQL(sqlx), PostgreSQL ORM(sea-orm) 재시도 연결
//! - **서버**: actix-web / axum 부트스트랩 (CORS, 정적 파일, TLS, 우아한 종료)
//! - **메일**: SMTP 발송 (첨부파일, 인라인 이미지, 예약, 백그라운드 발송)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← routes / handlers / middlewares
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   token / mail  │ ← 도메인 기능
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ db / server /   │ ← 인프라 부트스트랩
//! │ logger / config │
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use backend_toolkit::token::new_token_manager;
//! use chrono::Duration;
//!
//! let manager = new_token_manager("paseto", "12345678901234567890123456789012")?;
//! let (token, payload) = manager.generate_token("alice", Duration::minutes(15))?;
//! let verified = manager.validate_token(&token)?;
//! assert_eq!(verified, payload);
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod mail;
pub mod middlewares;
pub mod routes;
pub mod server;
pub mod token;

/// 크레이트 버전
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
