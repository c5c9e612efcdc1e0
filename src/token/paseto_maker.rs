//! PASETO `v4.local` 백엔드
//!
//! 페이로드 JSON을 대칭 키로 암호화하고 인증 태그를 붙인 불투명 토큰을 발급합니다.
//! 키는 정확히 32바이트여야 합니다.

use base64::{engine::general_purpose, Engine as _};
use chrono::Duration;
use rand::RngCore;
use rusty_paseto::core::{
    Key, Local, Paseto, PasetoNonce, PasetoSymmetricKey, Payload as PasetoPayload, V4,
};
use uuid::Uuid;

use super::error::TokenError;
use super::payload::Payload;
use super::{TokenManager, TokenType};

/// PASETO 대칭 키 길이 (바이트)
pub const PASETO_KEY_SIZE: usize = 32;

/// PASETO 토큰 생성/검증기
///
/// # Examples
///
/// ```rust,ignore
/// let maker = PasetoMaker::new("12345678901234567890123456789012")?;
/// let (token, _) = maker.generate_token("alice", Duration::hours(1))?;
/// assert!(token.starts_with("v4.local."));
/// ```
pub struct PasetoMaker {
    symmetric_key: PasetoSymmetricKey<V4, Local>,
}

impl PasetoMaker {
    /// 32바이트 대칭 키로 새 `PasetoMaker`를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidKeySize` - 키 길이가 32바이트가 아닌 경우
    pub fn new(secret_key: &str) -> Result<Self, TokenError> {
        let key_bytes: [u8; PASETO_KEY_SIZE] =
            secret_key
                .as_bytes()
                .try_into()
                .map_err(|_| TokenError::InvalidKeySize {
                    expected: PASETO_KEY_SIZE,
                    actual: secret_key.len(),
                })?;

        Ok(Self {
            symmetric_key: PasetoSymmetricKey::<V4, Local>::from(Key::from(key_bytes)),
        })
    }

    /// base64(표준 또는 URL-safe) 인코딩된 32바이트 키로 생성합니다.
    ///
    /// 무작위 바이트 키를 환경 변수로 전달할 때 사용합니다.
    pub fn from_base64_key(encoded: &str) -> Result<Self, TokenError> {
        let trimmed = encoded.trim();
        let bytes = general_purpose::STANDARD
            .decode(trimmed)
            .or_else(|_| general_purpose::URL_SAFE_NO_PAD.decode(trimmed))
            .map_err(|_| TokenError::InvalidKeySize {
                expected: PASETO_KEY_SIZE,
                actual: 0,
            })?;

        let key_bytes: [u8; PASETO_KEY_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| TokenError::InvalidKeySize {
                    expected: PASETO_KEY_SIZE,
                    actual: bytes.len(),
                })?;

        Ok(Self {
            symmetric_key: PasetoSymmetricKey::<V4, Local>::from(Key::from(key_bytes)),
        })
    }

    pub(crate) fn encode_payload(&self, payload: &Payload) -> Result<String, TokenError> {
        let json = serde_json::to_string(payload).map_err(|e| TokenError::Encoding(e.to_string()))?;

        let mut nonce_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce_key = Key::<32>::from(nonce_bytes);
        let nonce = PasetoNonce::<V4, Local>::from(&nonce_key);

        Paseto::<V4, Local>::builder()
            .set_payload(PasetoPayload::from(json.as_str()))
            .try_encrypt(&self.symmetric_key, &nonce)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

impl TokenManager for PasetoMaker {
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
        let json = Paseto::<V4, Local>::try_decrypt(token, &self.symmetric_key, None, None)
            .map_err(|e| {
                log::debug!("PASETO 복호화 실패: {}", e);
                TokenError::InvalidToken
            })?;

        let payload: Payload = serde_json::from_str(&json).map_err(|_| TokenError::InvalidToken)?;
        payload.check_window()?;
        payload.valid()?;

        Ok(payload)
    }

    fn token_type(&self) -> TokenType {
        TokenType::Paseto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_key_size_enforced() {
        assert_eq!(
            PasetoMaker::new("short").err(),
            Some(TokenError::InvalidKeySize { expected: 32, actual: 5 })
        );
        assert!(PasetoMaker::new(&format!("{}x", KEY)).is_err());
        assert!(PasetoMaker::new(KEY).is_ok());
    }

    #[test]
    fn test_base64_key() {
        let encoded = general_purpose::STANDARD.encode([7u8; 32]);
        let maker = PasetoMaker::from_base64_key(&encoded).unwrap();
        let (token, _) = maker.generate_token("alice", Duration::minutes(1)).unwrap();
        assert!(maker.validate_token(&token).is_ok());

        let short = general_purpose::STANDARD.encode([7u8; 16]);
        assert_eq!(
            PasetoMaker::from_base64_key(&short).err(),
            Some(TokenError::InvalidKeySize { expected: 32, actual: 16 })
        );
    }

    #[test]
    fn test_generate_and_validate() {
        let maker = PasetoMaker::new(KEY).unwrap();
        let (token, issued) = maker.generate_token("alice", Duration::minutes(15)).unwrap();

        assert!(token.starts_with("v4.local."));

        let payload = maker.validate_token(&token).unwrap();
        assert_eq!(payload, issued);
        assert_eq!(maker.token_type(), TokenType::Paseto);
    }

    #[test]
    fn test_tokens_are_not_deterministic() {
        let maker = PasetoMaker::new(KEY).unwrap();
        let payload = Payload::new("alice", Duration::minutes(1)).unwrap();

        let first = maker.encode_payload(&payload).unwrap();
        let second = maker.encode_payload(&payload).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_expired_token() {
        let maker = PasetoMaker::new(KEY).unwrap();
        let mut payload = Payload::new("alice", Duration::minutes(1)).unwrap();
        payload.issued_at = Utc::now() - Duration::hours(2);
        payload.expired_at = Utc::now() - Duration::hours(1);
        let token = maker.encode_payload(&payload).unwrap();

        assert_eq!(maker.validate_token(&token).unwrap_err(), TokenError::ExpiredToken);
    }

    #[test]
    fn test_inverted_window_is_invalid() {
        let maker = PasetoMaker::new(KEY).unwrap();
        let mut payload = Payload::new("alice", Duration::minutes(1)).unwrap();
        payload.expired_at = payload.issued_at - Duration::minutes(1);
        let token = maker.encode_payload(&payload).unwrap();

        assert_eq!(maker.validate_token(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let maker = PasetoMaker::new(KEY).unwrap();
        let other = PasetoMaker::new("fedcba9876543210fedcba9876543210").unwrap();
        let (token, _) = maker.generate_token("alice", Duration::minutes(1)).unwrap();

        assert_eq!(other.validate_token(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let maker = PasetoMaker::new(KEY).unwrap();
        let (token, _) = maker.generate_token("alice", Duration::minutes(1)).unwrap();

        let mut tampered = token.into_bytes();
        let idx = tampered.len() / 2;
        tampered[idx] = if tampered[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert_eq!(maker.validate_token(&tampered).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let maker = PasetoMaker::new(KEY).unwrap();

        assert_eq!(maker.validate_token("v4.local.garbage").unwrap_err(), TokenError::InvalidToken);
        assert_eq!(maker.validate_token("").unwrap_err(), TokenError::InvalidToken);
    }
}
