//! 호출자가 전송 결과를 기다리는 이메일 서비스

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, info};
use tokio::task::JoinHandle;

use super::message::{is_html, EmailDraft};
use super::transport::{MailTransport, SmtpMailTransport};
use super::{MailError, SmtpConfig};

/// 이메일 발송 서비스
///
/// 모든 발송 메서드는 전송이 끝날 때까지 기다린 뒤 결과를 반환합니다.
/// (예약 발송의 미래 시각은 예외)
#[derive(Clone)]
pub struct EmailService {
    from: String,
    transport: Arc<dyn MailTransport>,
}

impl EmailService {
    /// SMTP 설정으로 서비스를 생성합니다. 발신 주소는 `username`입니다.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = SmtpMailTransport::new(config)?;
        Ok(Self::with_transport(&config.username, Arc::new(transport)))
    }

    /// 임의의 전송 계층으로 서비스를 생성합니다.
    pub fn with_transport(from: &str, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            from: from.to_string(),
            transport,
        }
    }

    fn draft(&self, to: &[&str], subject: &str, body: &str) -> EmailDraft {
        EmailDraft::new(&self.from, to, subject, body)
    }

    async fn deliver(&self, draft: EmailDraft) -> Result<(), MailError> {
        let recipients = draft.recipients_label();
        let message = draft.build()?;

        match self.transport.send(message).await {
            Ok(()) => {
                info!("📧 이메일 발송 성공: {}", recipients);
                Ok(())
            }
            Err(e) => {
                error!("이메일 발송 실패 ({}): {}", recipients, e);
                Err(e)
            }
        }
    }

    pub async fn send_text_email(&self, to: &[&str], subject: &str, body: &str) -> Result<(), MailError> {
        self.deliver(self.draft(to, subject, body)).await
    }

    pub async fn send_html_email(&self, to: &[&str], subject: &str, body: &str) -> Result<(), MailError> {
        self.deliver(self.draft(to, subject, body).html(true)).await
    }

    /// 첨부파일 하나를 포함해 발송합니다. 본문 형식은 [`is_html`]로 판단합니다.
    pub async fn send_email_with_attachment(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        attachment_path: impl AsRef<Path>,
    ) -> Result<(), MailError> {
        let paths = [attachment_path.as_ref().to_path_buf()];
        self.send_email_with_multiple_attachments(to, subject, body, &paths)
            .await
    }

    pub async fn send_email_with_multiple_attachments(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
    ) -> Result<(), MailError> {
        let draft = self
            .draft(to, subject, body)
            .html(is_html(body))
            .attachments(attachment_paths);
        self.deliver(draft).await
    }

    /// HTML 본문에 인라인 이미지를 포함해 발송합니다.
    ///
    /// 본문에서는 `<img src="cid:logo.png">`처럼 파일 이름으로 참조합니다.
    pub async fn send_email_with_inline_images(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        image_paths: &[PathBuf],
    ) -> Result<(), MailError> {
        let draft = self.draft(to, subject, body).html(true).inline_images(image_paths);
        self.deliver(draft).await
    }

    pub async fn send_email_with_cc_and_bcc(
        &self,
        to: &[&str],
        cc: &[&str],
        bcc: &[&str],
        subject: &str,
        body: &str,
    ) -> Result<(), MailError> {
        self.deliver(self.draft(to, subject, body).cc(cc).bcc(bcc))
            .await
    }

    pub async fn send_email_with_headers(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), MailError> {
        let draft = headers
            .iter()
            .fold(self.draft(to, subject, body), |draft, (name, value)| {
                draft.header(name, value)
            });
        self.deliver(draft).await
    }

    /// `X-Priority` 헤더를 붙여 발송합니다. ("1" 높음, "3" 보통, "5" 낮음)
    pub async fn send_priority_email(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        priority: &str,
    ) -> Result<(), MailError> {
        self.send_email_with_headers(to, subject, body, &[("X-Priority", priority)])
            .await
    }

    /// 지정한 시각에 텍스트 이메일을 발송합니다.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - 시각이 이미 지나 즉시 발송함
    /// * `Ok(Some(handle))` - 백그라운드 태스크로 예약됨
    ///
    /// 메시지 조립 에러는 예약 전에 바로 반환됩니다.
    pub async fn schedule_email(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        send_at: DateTime<Utc>,
    ) -> Result<Option<JoinHandle<Result<(), MailError>>>, MailError> {
        let Ok(delay) = (send_at - Utc::now()).to_std() else {
            self.send_text_email(to, subject, body).await?;
            return Ok(None);
        };
        if delay.is_zero() {
            self.send_text_email(to, subject, body).await?;
            return Ok(None);
        }

        let draft = self.draft(to, subject, body);
        draft.build()?;

        let service = self.clone();
        info!("⏰ 이메일 예약: {} ({})", draft.recipients_label(), send_at);

        Ok(Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            service.deliver(draft).await
        })))
    }

    pub async fn send_email_with_reply_to(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        reply_to: &str,
    ) -> Result<(), MailError> {
        self.deliver(self.draft(to, subject, body).reply_to(reply_to))
            .await
    }

    /// 수신자마다 개별 메일을 순서대로 발송하며, 첫 실패에서 중단합니다.
    pub async fn send_batch_email(&self, to: &[&str], subject: &str, body: &str) -> Result<(), MailError> {
        for recipient in to {
            self.send_text_email(&[*recipient], subject, body).await?;
        }
        Ok(())
    }

    /// 본문 끝에 추적 ID를 붙여 발송합니다.
    pub async fn send_email_with_tracking(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        tracking_id: &str,
    ) -> Result<(), MailError> {
        let tracked_body = format!("{}\n\nTracking ID: {}", body, tracking_id);
        self.send_text_email(to, subject, &tracked_body).await
    }

    pub async fn send_email_with_attachments_and_inline_images(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
        image_paths: &[PathBuf],
    ) -> Result<(), MailError> {
        let draft = self
            .draft(to, subject, body)
            .html(true)
            .attachments(attachment_paths)
            .inline_images(image_paths);
        self.deliver(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::test_support::RecordingTransport;
    use std::fs;
    use tempfile::tempdir;

    fn service() -> (EmailService, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let service = EmailService::with_transport("sender@example.com", transport.clone());
        (service, transport)
    }

    #[tokio::test]
    async fn test_send_text_and_html() {
        let (service, transport) = service();

        service.send_text_email(&["a@example.com"], "Text", "plain").await.unwrap();
        service
            .send_html_email(&["a@example.com"], "Html", "<p>html</p>")
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].raw.contains("text/plain"));
        assert!(sent[1].raw.contains("text/html"));
    }

    #[tokio::test]
    async fn test_attachment_detects_html_body() {
        let (service, transport) = service();
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "notes").unwrap();

        service
            .send_email_with_attachment(&["a@example.com"], "Notes", "<html>see attached</html>", &file)
            .await
            .unwrap();

        let raw = &transport.sent()[0].raw;
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("filename=\"notes.txt\""));
    }

    #[tokio::test]
    async fn test_priority_and_reply_to_headers() {
        let (service, transport) = service();

        service
            .send_priority_email(&["a@example.com"], "Urgent", "now", "1")
            .await
            .unwrap();
        service
            .send_email_with_reply_to(&["a@example.com"], "Reply", "body", "support@example.com")
            .await
            .unwrap();

        let sent = transport.sent();
        assert!(sent[0].raw.contains("X-Priority: 1"));
        assert!(sent[1].raw.contains("Reply-To: support@example.com"));
    }

    #[tokio::test]
    async fn test_cc_and_bcc_reach_every_recipient() {
        let (service, transport) = service();

        service
            .send_email_with_cc_and_bcc(&["to@example.com"], &["cc@example.com"], &["bcc@example.com"], "Hi", "body")
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].recipients.len(), 3);
        assert!(sent[0].raw.contains("Cc: cc@example.com"));
    }

    #[tokio::test]
    async fn test_tracking_id_appended() {
        let (service, transport) = service();

        service
            .send_email_with_tracking(&["a@example.com"], "Promo", "Hello", "T-42")
            .await
            .unwrap();

        assert!(transport.sent()[0].raw.contains("Tracking ID: T-42"));
    }

    #[tokio::test]
    async fn test_batch_stops_at_first_failure() {
        let transport = Arc::new(RecordingTransport::failing_for("b@example.com"));
        let service = EmailService::with_transport("sender@example.com", transport.clone());

        let result = service
            .send_batch_email(&["a@example.com", "b@example.com", "c@example.com"], "Batch", "body")
            .await;

        assert!(matches!(result, Err(MailError::Transport(_))));
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["a@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_schedule_in_past_sends_immediately() {
        let (service, transport) = service();

        let handle = service
            .schedule_email(&["a@example.com"], "Past", "body", Utc::now() - chrono::Duration::minutes(1))
            .await
            .unwrap();

        assert!(handle.is_none());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_schedule_in_future_spawns_task() {
        let (service, transport) = service();

        let handle = service
            .schedule_email(&["a@example.com"], "Later", "body", Utc::now() + chrono::Duration::milliseconds(50))
            .await
            .unwrap()
            .expect("future send should be scheduled");

        assert!(transport.sent().is_empty());
        handle.await.unwrap().unwrap();
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_schedule_rejects_bad_address_before_spawning() {
        let (service, _transport) = service();

        let result = service
            .schedule_email(&["bad address"], "Later", "body", Utc::now() + chrono::Duration::hours(1))
            .await;

        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_attachments_and_inline_images() {
        let (service, transport) = service();
        let dir = tempdir().unwrap();
        let doc = dir.path().join("doc.pdf");
        let logo = dir.path().join("logo.jpg");
        fs::write(&doc, "pdf").unwrap();
        fs::write(&logo, "jpg").unwrap();

        service
            .send_email_with_attachments_and_inline_images(
                &["a@example.com"],
                "Both",
                "<html><img src=\"cid:logo.jpg\"></html>",
                &[doc],
                &[logo],
            )
            .await
            .unwrap();

        let raw = &transport.sent()[0].raw;
        assert!(raw.contains("Content-ID: <logo.jpg>"));
        assert!(raw.contains("filename=\"doc.pdf\""));
    }
}
