//! 토큰 발급/검증 에러 타입

use thiserror::Error;

/// 토큰 서브시스템 전용 에러
///
/// 서명 실패와 만료를 구분할 수 있도록 `InvalidToken`과 `ExpiredToken`을
/// 별도 변형으로 유지합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// 서명 불일치, 복호화 실패, 클레임 형식 오류
    #[error("token validation failed: signature invalid or claims malformed")]
    InvalidToken,

    /// 만료된 토큰
    #[error("token validation failed: token has expired")]
    ExpiredToken,

    /// 비어 있는 대칭 키
    #[error("symmetric key must be set")]
    EmptyKey,

    /// PASETO 키 길이 불일치
    #[error("invalid key size: must be exactly {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    /// 지원하지 않는 토큰 타입 문자열
    #[error("unsupported token type: {0}")]
    UnsupportedTokenType(String),

    /// 0 이하의 유효 기간
    #[error("token duration must be positive")]
    InvalidDuration,

    /// 토큰 생성 중 인코딩/암호화 실패
    #[error("token encoding failed: {0}")]
    Encoding(String),
}
