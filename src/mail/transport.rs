//! 이메일 전송 계층

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::debug;

use super::{MailError, SmtpConfig};

/// 조립된 메시지를 실제로 전달하는 전송 계층
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), MailError>;
}

/// `lettre` 비동기 SMTP 전송 계층
///
/// 465 포트는 암묵적 TLS, 그 외 포트는 STARTTLS로 연결합니다.
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    /// # Errors
    ///
    /// * `MailError::Transport` - 호스트 이름으로 TLS 설정을 만들 수 없는 경우
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Transport(e.to_string()))?;

        let mailer = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!("SMTP 응답: {:?}", response.code());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_smtp_transport_builds_for_starttls_and_tls_ports() {
        let starttls = SmtpConfig::new("smtp.example.com", 587, "sender@example.com", "secret");
        let implicit = SmtpConfig::new("smtp.example.com", 465, "sender@example.com", "secret");

        assert!(SmtpMailTransport::new(&starttls).is_ok());
        assert!(SmtpMailTransport::new(&implicit).is_ok());
    }
}
