//! # Configuration Module
//!
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리하는 모듈입니다.
//! 모든 설정 구조체는 상태가 없으며, 호출 시점의 환경 변수를 읽고
//! 누락되거나 잘못된 값은 기본값으로 대체합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버 바인딩, 데이터베이스 설정
//! - [`auth_config`] - 토큰 백엔드, 대칭 키, 유효 기간 설정
//! - [`mail_config`] - SMTP 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use backend_toolkit::config::{Environment, ServerConfig, TokenConfig};
//!
//! let env = Environment::current();
//! let addr = format!("{}:{}", ServerConfig::host(), ServerConfig::port());
//! let tokens = TokenConfig::token_manager()?;
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 실행 환경
//! export ENVIRONMENT="production"  # development, test, staging, production
//!
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export STATIC_PATH="./public"
//! export USE_TLS="false"
//! export USE_CORS="true"
//! export CORS_ALLOWED_ORIGINS="http://localhost:3000,https://app.example.com"
//!
//! # 토큰 설정
//! export TOKEN_TYPE="jwt"
//! export TOKEN_SYMMETRIC_KEY="change-me-to-a-32-byte-secret!!!"
//!
//! # SMTP 설정
//! export SMTP_HOST="smtp.example.com"
//! export SMTP_PORT="587"
//! export SMTP_USERNAME="no-reply@example.com"
//! export SMTP_PASSWORD="app-password"
//! ```

pub mod auth_config;
pub mod data_config;
pub mod mail_config;

pub use auth_config::*;
pub use data_config::*;
pub use mail_config::*;
