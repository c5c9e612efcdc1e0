//! 토큰에 담기는 페이로드
//!
//! 두 백엔드(JWT, PASETO)가 공유하는 값 객체입니다.
//! 발급 시 한 번 생성되고 이후에는 변경되지 않습니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::TokenError;

/// 토큰 페이로드
///
/// ## 필드 구성
///
/// - `id`: 토큰 고유 ID (랜덤 UUID v4)
/// - `user_id`: 주체의 고정 ID (선택사항)
/// - `username`: 주체 이름
/// - `issued_at`: 발급 시각
/// - `expired_at`: 만료 시각 (항상 `issued_at` 이후)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    /// 사용자 이름과 유효 기간으로 새 페이로드를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidDuration` - `duration`이 0 이하이거나 만료 시각이 표현 범위를 넘는 경우
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let payload = Payload::new("alice", Duration::minutes(15))?;
    /// assert!(payload.expired_at > payload.issued_at);
    /// ```
    pub fn new(username: &str, duration: Duration) -> Result<Self, TokenError> {
        Self::build(None, username, duration)
    }

    /// 사용자 ID를 포함한 페이로드를 생성합니다.
    pub fn with_user_id(user_id: Uuid, username: &str, duration: Duration) -> Result<Self, TokenError> {
        Self::build(Some(user_id), username, duration)
    }

    fn build(user_id: Option<Uuid>, username: &str, duration: Duration) -> Result<Self, TokenError> {
        if duration <= Duration::zero() {
            return Err(TokenError::InvalidDuration);
        }

        let issued_at = Utc::now();
        let expired_at = issued_at
            .checked_add_signed(duration)
            .ok_or(TokenError::InvalidDuration)?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            username: username.to_string(),
            issued_at,
            expired_at,
        })
    }

    /// 디코딩된 페이로드의 발급/만료 시각 순서를 확인합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidToken` - `expired_at`이 `issued_at` 이후가 아닌 경우
    pub(crate) fn check_window(&self) -> Result<(), TokenError> {
        if self.expired_at <= self.issued_at {
            return Err(TokenError::InvalidToken);
        }
        Ok(())
    }

    /// 현재 시각 기준으로 만료 여부를 검사합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::ExpiredToken` - 현재 시각이 `expired_at`을 지난 경우
    pub fn valid(&self) -> Result<(), TokenError> {
        if self.is_expired_at(Utc::now()) {
            return Err(TokenError::ExpiredToken);
        }
        Ok(())
    }

    /// 주어진 시각에 만료 상태인지 반환합니다.
    pub fn is_expired_at(&self, instant: DateTime<Utc>) -> bool {
        instant > self.expired_at
    }

    /// 남은 유효 시간 (초). 만료된 경우 0
    pub fn remaining_seconds(&self) -> i64 {
        (self.expired_at - Utc::now()).num_seconds().max(0)
    }
}
