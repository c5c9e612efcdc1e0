//! # Token Module
//!
//! 토큰 발급 및 검증을 위한 플러그형 서명 방식 추상화를 제공합니다.
//!
//! ## 지원 백엔드
//!
//! | 타입 | 구현 | 특징 |
//! |------|------|------|
//! | `jwt` | [`JwtMaker`] | HMAC-SHA256 서명, 클레임이 평문으로 노출됨 |
//! | `paseto` | [`PasetoMaker`] | `v4.local` 인증 암호화, 불투명 토큰, 32바이트 키 |
//!
//! 두 백엔드 모두 같은 [`Payload`]를 발급하고 같은 만료 판정
//! ([`Payload::valid`])을 사용합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use backend_toolkit::token::new_token_manager;
//! use chrono::Duration;
//!
//! let manager = new_token_manager("jwt", "your-secret-key")?;
//! let (token, _) = manager.generate_token("alice", Duration::hours(1))?;
//! let payload = manager.validate_token(&token)?;
//! println!("{} expires at {}", payload.username, payload.expired_at);
//! ```

pub mod error;
pub mod jwt_maker;
pub mod paseto_maker;
pub mod payload;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

pub use error::TokenError;
pub use jwt_maker::JwtMaker;
pub use paseto_maker::PasetoMaker;
pub use payload::Payload;

/// 토큰 생성/검증 기능 인터페이스
///
/// 구현체는 스레드 간에 공유되므로 `Send + Sync`여야 합니다.
pub trait TokenManager: Send + Sync {
    /// 사용자 이름으로 새 토큰을 발급합니다.
    fn generate_token(&self, username: &str, duration: Duration) -> Result<(String, Payload), TokenError>;

    /// 사용자 ID를 포함한 토큰을 발급합니다.
    fn generate_token_for_user(
        &self,
        user_id: Uuid,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError>;

    /// 토큰을 검증하고 페이로드를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidToken` - 서명/복호화/형식 오류
    /// * `TokenError::ExpiredToken` - 만료된 토큰
    fn validate_token(&self, token: &str) -> Result<Payload, TokenError>;

    /// 구현체의 토큰 타입
    fn token_type(&self) -> TokenType;
}

/// 토큰 백엔드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Jwt,
    Paseto,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Jwt => "jwt",
            TokenType::Paseto => "paseto",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jwt" => Ok(TokenType::Jwt),
            "paseto" => Ok(TokenType::Paseto),
            other => Err(TokenError::UnsupportedTokenType(other.to_string())),
        }
    }
}

/// 설정 문자열과 비밀키로 토큰 매니저를 생성합니다.
///
/// # Arguments
///
/// * `token_type` - `"jwt"` 또는 `"paseto"` (대소문자 무관)
/// * `secret_key` - 대칭 키. PASETO는 정확히 32바이트
///
/// # Errors
///
/// * `TokenError::UnsupportedTokenType` - 알 수 없는 타입
/// * `TokenError::EmptyKey` / `TokenError::InvalidKeySize` - 키 검증 실패
pub fn new_token_manager(token_type: &str, secret_key: &str) -> Result<Arc<dyn TokenManager>, TokenError> {
    let manager: Arc<dyn TokenManager> = match token_type.parse::<TokenType>()? {
        TokenType::Jwt => Arc::new(JwtMaker::new(secret_key)?),
        TokenType::Paseto => Arc::new(PasetoMaker::new(secret_key)?),
    };

    log::debug!("토큰 매니저 생성: {}", manager.token_type());
    Ok(manager)
}

/// `Authorization` 헤더 값에서 Bearer 토큰을 추출합니다.
///
/// ```rust,ignore
/// assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
/// assert_eq!(extract_bearer_token("Basic abc"), None);
/// ```
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JWT_KEY: &str = "jwt-secret";
    const PASETO_KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_token_type_from_str() {
        assert_eq!("jwt".parse::<TokenType>().unwrap(), TokenType::Jwt);
        assert_eq!(" PASETO ".parse::<TokenType>().unwrap(), TokenType::Paseto);
        assert_eq!(
            "saml".parse::<TokenType>().unwrap_err(),
            TokenError::UnsupportedTokenType("saml".to_string())
        );
    }

    #[test]
    fn test_factory_selects_backend() {
        let jwt = new_token_manager("jwt", JWT_KEY).unwrap();
        let paseto = new_token_manager("paseto", PASETO_KEY).unwrap();

        assert_eq!(jwt.token_type(), TokenType::Jwt);
        assert_eq!(paseto.token_type(), TokenType::Paseto);
    }

    #[test]
    fn test_factory_propagates_key_errors() {
        assert!(matches!(new_token_manager("jwt", ""), Err(TokenError::EmptyKey)));
        assert!(matches!(
            new_token_manager("paseto", "too-short"),
            Err(TokenError::InvalidKeySize { .. })
        ));
        assert!(matches!(
            new_token_manager("opaque", JWT_KEY),
            Err(TokenError::UnsupportedTokenType(_))
        ));
    }

    #[test]
    fn test_tokens_do_not_cross_backends() {
        let jwt = new_token_manager("jwt", PASETO_KEY).unwrap();
        let paseto = new_token_manager("paseto", PASETO_KEY).unwrap();

        let (jwt_token, _) = jwt.generate_token("alice", Duration::minutes(5)).unwrap();
        let (paseto_token, _) = paseto.generate_token("alice", Duration::minutes(5)).unwrap();

        assert_eq!(paseto.validate_token(&jwt_token).unwrap_err(), TokenError::InvalidToken);
        assert_eq!(jwt.validate_token(&paseto_token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_managers_behave_identically() {
        for (kind, key) in [("jwt", JWT_KEY), ("paseto", PASETO_KEY)] {
            let manager = new_token_manager(kind, key).unwrap();
            let (token, issued) = manager.generate_token("shared", Duration::minutes(2)).unwrap();
            let payload = manager.validate_token(&token).unwrap();

            assert_eq!(payload.id, issued.id, "backend {}", kind);
            assert_eq!(payload.username, "shared");
            assert!(payload.expired_at > payload.issued_at);
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcg=="), None);
        assert_eq!(extract_bearer_token("bearer abc"), None);
    }
}
