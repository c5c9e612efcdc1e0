//! HMAC-SHA256 서명 JWT 백엔드
//!
//! 페이로드를 평문 클레임으로 담고 공유 비밀키로 서명합니다.
//! 만료 검사는 라이브러리 대신 [`Payload::valid`]가 담당하여
//! PASETO 백엔드와 같은 판정 기준을 사용합니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::TokenError;
use super::payload::Payload;
use super::{TokenManager, TokenType};

/// JWT 클레임 구조체
///
/// 시각은 Unix timestamp(초)로 저장합니다.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    username: String,
    issued_at: i64,
    expired_at: i64,
}

impl From<&Payload> for JwtClaims {
    fn from(payload: &Payload) -> Self {
        Self {
            id: payload.id.to_string(),
            user_id: payload.user_id.map(|id| id.to_string()),
            username: payload.username.clone(),
            issued_at: payload.issued_at.timestamp(),
            expired_at: payload.expired_at.timestamp(),
        }
    }
}

impl TryFrom<JwtClaims> for Payload {
    type Error = TokenError;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.id).map_err(|_| TokenError::InvalidToken)?;
        let user_id = claims
            .user_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| TokenError::InvalidToken)?;
        let issued_at = DateTime::<Utc>::from_timestamp(claims.issued_at, 0)
            .ok_or(TokenError::InvalidToken)?;
        let expired_at = DateTime::<Utc>::from_timestamp(claims.expired_at, 0)
            .ok_or(TokenError::InvalidToken)?;

        let payload = Payload {
            id,
            user_id,
            username: claims.username,
            issued_at,
            expired_at,
        };
        payload.check_window()?;

        Ok(payload)
    }
}

/// JWT 토큰 생성/검증기
///
/// # Examples
///
/// ```rust,ignore
/// let maker = JwtMaker::new("your-secret-key")?;
/// let (token, payload) = maker.generate_token("alice", Duration::hours(1))?;
/// let verified = maker.validate_token(&token)?;
/// assert_eq!(verified.id, payload.id);
/// ```
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtMaker {
    /// 대칭 키로 새 `JwtMaker`를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::EmptyKey` - 키가 비어 있는 경우
    pub fn new(secret_key: &str) -> Result<Self, TokenError> {
        if secret_key.is_empty() {
            return Err(TokenError::EmptyKey);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
        })
    }

    pub(crate) fn encode_payload(&self, payload: &Payload) -> Result<String, TokenError> {
        let claims = JwtClaims::from(payload);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn validation() -> Validation {
        // exp 표준 클레임 대신 expired_at을 사용하므로 라이브러리 검사는 끈다
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation
    }
}

impl TokenManager for JwtMaker {
    fn generate_token(&self, username: &str, duration: Duration) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(username, duration)?;
        let token = self.encode_payload(&payload)?;
        Ok((token, payload))
    }

    fn generate_token_for_user(
        &self,
        user_id: Uuid,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::with_user_id(user_id, username, duration)?;
        let token = self.encode_payload(&payload)?;
        Ok((token, payload))
    }

    fn validate_token(&self, token: &str) -> Result<Payload, TokenError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &Self::validation())
            .map_err(|e| {
                log::debug!("JWT 디코딩 실패: {}", e);
                TokenError::InvalidToken
            })?;

        let payload = Payload::try_from(token_data.claims)?;
        payload.valid()?;

        Ok(payload)
    }

    fn token_type(&self) -> TokenType {
        TokenType::Jwt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-very-secret-signing-key";

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(JwtMaker::new(""), Err(TokenError::EmptyKey)));
    }

    #[test]
    fn test_generate_and_validate() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let (token, issued) = maker.generate_token("alice", Duration::minutes(30)).unwrap();

        let payload = maker.validate_token(&token).unwrap();

        assert_eq!(payload.id, issued.id);
        assert_eq!(payload.username, "alice");
        assert_eq!(payload.issued_at.timestamp(), issued.issued_at.timestamp());
        assert_eq!(payload.expired_at.timestamp(), issued.expired_at.timestamp());
        assert_eq!(maker.token_type(), TokenType::Jwt);
    }

    #[test]
    fn test_user_id_survives_validation() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let user_id = Uuid::new_v4();
        let (token, _) = maker
            .generate_token_for_user(user_id, "bob", Duration::minutes(1))
            .unwrap();

        let payload = maker.validate_token(&token).unwrap();
        assert_eq!(payload.user_id, Some(user_id));
    }

    #[test]
    fn test_expired_token() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let mut payload = Payload::new("alice", Duration::minutes(1)).unwrap();
        payload.issued_at = Utc::now() - Duration::minutes(10);
        payload.expired_at = Utc::now() - Duration::minutes(5);
        let token = maker.encode_payload(&payload).unwrap();

        assert_eq!(maker.validate_token(&token).unwrap_err(), TokenError::ExpiredToken);
    }

    #[test]
    fn test_inverted_window_is_invalid() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let mut payload = Payload::new("alice", Duration::minutes(1)).unwrap();
        payload.issued_at = Utc::now() + Duration::hours(2);
        payload.expired_at = Utc::now() + Duration::hours(1);
        let token = maker.encode_payload(&payload).unwrap();

        assert_eq!(maker.validate_token(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let other = JwtMaker::new("another-secret").unwrap();
        let (token, _) = maker.generate_token("alice", Duration::minutes(1)).unwrap();

        assert_eq!(other.validate_token(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let (token, _) = maker.generate_token("alice", Duration::minutes(1)).unwrap();

        let mut tampered = token.into_bytes();
        let idx = tampered.len() - 5;
        tampered[idx] = if tampered[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert_eq!(maker.validate_token(&tampered).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let maker = JwtMaker::new(SECRET).unwrap();

        assert_eq!(maker.validate_token("not-a-token").unwrap_err(), TokenError::InvalidToken);
        assert_eq!(maker.validate_token("").unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let payload = Payload::new("alice", Duration::minutes(1)).unwrap();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &JwtClaims::from(&payload),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(maker.validate_token(&token).unwrap_err(), TokenError::InvalidToken);
    }
}
