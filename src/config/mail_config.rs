//! SMTP 설정 모듈

use std::env;

use crate::mail::SmtpConfig;

/// SMTP 환경 변수 설정
pub struct MailConfig;

impl MailConfig {
    /// SMTP 서버 호스트 (`SMTP_HOST`, 기본값: "localhost")
    pub fn host() -> String {
        env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string())
    }

    /// SMTP 서버 포트 (`SMTP_PORT`, 기본값: 587)
    pub fn port() -> u16 {
        env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587)
    }

    /// SMTP 인증 사용자명이자 발신 주소 (`SMTP_USERNAME`)
    pub fn username() -> String {
        env::var("SMTP_USERNAME").unwrap_or_default()
    }

    /// SMTP 인증 비밀번호 (`SMTP_PASSWORD`)
    pub fn password() -> String {
        env::var("SMTP_PASSWORD").unwrap_or_default()
    }

    /// 환경 변수로 [`SmtpConfig`]를 구성합니다.
    pub fn smtp() -> SmtpConfig {
        SmtpConfig::new(Self::host(), Self::port(), Self::username(), Self::password())
    }
}
