use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// 요청으로 지정할 수 있는 최대 유효 기간 (1년, 분 단위)
pub const MAX_DURATION_MINUTES: i64 = 525_600;

/// 토큰 발급 요청 DTO
#[derive(Debug, Deserialize, Validate)]
pub struct IssueTokenRequest {
    #[validate(
        length(min = 1, message = "사용자명이 필요합니다"),
        custom(function = "validate_not_blank")
    )]
    pub username: String,
    /// 토큰에 포함할 사용자 ID (선택사항)
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// 유효 기간(분). 없으면 `TOKEN_DURATION_MINUTES` 설정값
    #[serde(default)]
    #[validate(range(min = 1, max = 525_600, message = "유효 기간은 1분 이상 1년 이하여야 합니다"))]
    pub duration_minutes: Option<i64>,
}

/// 공백만으로 된 사용자명 거부
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("사용자명이 필요합니다".into()));
    }
    Ok(())
}

/// 토큰 검증 요청 DTO
#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_request_deserializes_optional_fields() {
        let request: IssueTokenRequest = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();

        assert_eq!(request.username, "alice");
        assert!(request.user_id.is_none());
        assert!(request.duration_minutes.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_issue_request_validation() {
        let blank: IssueTokenRequest = serde_json::from_str(r#"{"username":"  "}"#).unwrap();
        assert!(blank.validate().is_err());

        let empty: IssueTokenRequest = serde_json::from_str(r#"{"username":""}"#).unwrap();
        assert!(empty.validate().is_err());

        let negative: IssueTokenRequest =
            serde_json::from_str(r#"{"username":"bob","duration_minutes":-5}"#).unwrap();
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_duration_upper_bound() {
        let at_limit = IssueTokenRequest {
            username: "carol".to_string(),
            user_id: None,
            duration_minutes: Some(MAX_DURATION_MINUTES),
        };
        assert!(at_limit.validate().is_ok());

        let huge: IssueTokenRequest =
            serde_json::from_str(&format!(r#"{{"username":"carol","duration_minutes":{}}}"#, i64::MAX)).unwrap();
        let errors = huge.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("duration_minutes"));
    }
}
