//! # Token Configuration Module
//!
//! 토큰 백엔드 선택, 대칭 키, 유효 기간 설정을 관리합니다.
//!
//! ## 환경 변수 설정
//!
//! ```bash
//! export TOKEN_TYPE="paseto"                               # jwt | paseto
//! export TOKEN_SYMMETRIC_KEY="12345678901234567890123456789012"  # paseto는 정확히 32바이트
//! export TOKEN_DURATION_MINUTES="15"
//! ```

use std::env;
use std::sync::Arc;

use chrono::Duration;

use crate::token::{new_token_manager, TokenError, TokenManager};

/// 토큰 설정
pub struct TokenConfig;

impl TokenConfig {
    /// 사용할 토큰 백엔드 (`TOKEN_TYPE`, 기본값: "jwt")
    pub fn token_type() -> String {
        env::var("TOKEN_TYPE").unwrap_or_else(|_| "jwt".to_string())
    }

    /// 토큰 서명/암호화용 대칭 키를 반환합니다.
    ///
    /// # 기본값
    ///
    /// 환경 변수가 설정되지 않은 경우 32바이트 개발용 키를 사용하며,
    /// 경고 로그가 출력됩니다. 프로덕션에서는 반드시 설정하세요.
    ///
    /// # 키 생성 예제
    ///
    /// ```bash
    /// openssl rand -hex 16   # 32자 문자열
    /// ```
    pub fn symmetric_key() -> String {
        env::var("TOKEN_SYMMETRIC_KEY").unwrap_or_else(|_| {
            log::warn!("TOKEN_SYMMETRIC_KEY not set, using default (not secure for production!)");
            "dev-only-symmetric-key-32-bytes!".to_string()
        })
    }

    /// 토큰 유효 기간 (`TOKEN_DURATION_MINUTES`, 기본값: 15분)
    pub fn duration() -> Duration {
        let minutes = env::var("TOKEN_DURATION_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(15);

        Duration::minutes(minutes)
    }

    /// 설정값으로 토큰 매니저를 생성합니다.
    pub fn token_manager() -> Result<Arc<dyn TokenManager>, TokenError> {
        new_token_manager(&Self::token_type(), &Self::symmetric_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key_fits_every_backend() {
        if env::var("TOKEN_SYMMETRIC_KEY").is_err() {
            let key = TokenConfig::symmetric_key();
            assert_eq!(key.len(), 32);
            assert!(new_token_manager("jwt", &key).is_ok());
            assert!(new_token_manager("paseto", &key).is_ok());
        }
    }

    #[test]
    fn test_duration_default() {
        if env::var("TOKEN_DURATION_MINUTES").is_err() {
            assert_eq!(TokenConfig::duration(), Duration::minutes(15));
        }
    }
}
