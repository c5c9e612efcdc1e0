//! # Mail Module
//!
//! SMTP 기반 이메일 발송 모듈입니다.
//!
//! ## 구성 요소
//!
//! | 타입 | 설명 |
//! |------|------|
//! | [`EmailDraft`] | 수신자/본문/첨부파일로 `lettre::Message`를 조립 |
//! | [`MailTransport`] | 실제 전송 계층 (SMTP 구현: [`SmtpMailTransport`]) |
//! | [`EmailService`] | 호출자가 결과를 기다리는 동기식(await) 발송 서비스 |
//! | [`EmailRoutineService`] | 백그라운드 태스크로 발송하고 결과를 채널로 보고 |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use backend_toolkit::config::MailConfig;
//! use backend_toolkit::mail::EmailService;
//!
//! let service = EmailService::new(&MailConfig::smtp())?;
//! service
//!     .send_text_email(&["user@example.com"], "환영합니다", "가입을 축하합니다!")
//!     .await?;
//! ```

pub mod message;
pub mod routine_service;
pub mod smtp_service;
pub mod transport;

use thiserror::Error;

pub use message::{is_html, EmailDraft};
pub use routine_service::{EmailResult, EmailRoutineService, Mailer};
pub use smtp_service::EmailService;
pub use transport::{MailTransport, SmtpMailTransport};

/// SMTP 서버 접속 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// 인증 사용자명이자 발신 주소
    pub username: String,
    pub password: String,
}

impl SmtpConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// 이메일 발송 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("invalid email address '{0}'")]
    InvalidAddress(String),

    #[error("email has no recipients")]
    NoRecipients,

    #[error("invalid header name '{0}'")]
    InvalidHeader(String),

    /// 첨부파일/인라인 이미지 읽기 실패
    #[error("cannot attach {path}: {message}")]
    Attachment { path: String, message: String },

    /// 메시지 조립 실패
    #[error("failed to build email: {0}")]
    Build(String),

    /// SMTP 전송 실패
    #[error("failed to send email: {0}")]
    Transport(String),

    #[error("scheduled time is in the past")]
    ScheduledInPast,
}
