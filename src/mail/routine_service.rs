//! 백그라운드 태스크 기반 이메일 서비스
//!
//! 모든 발송은 메시지를 먼저 조립한 뒤(조립 에러는 즉시 반환)
//! `tokio::spawn`으로 전송하고, 결과를 서비스 전용 채널로 보고합니다.
//! 채널은 크기가 제한되어 있어 아무도 읽지 않으면 새 결과는 경고 로그와 함께 버려집니다.
//!
//! ```rust,ignore
//! let service = EmailRoutineService::new(&MailConfig::smtp())?;
//! service.spawn_result_logger();          // 결과를 로그로만 확인
//! // 또는
//! let mut results = service.take_results().unwrap();
//! service.send_email(&["user@example.com"], "제목", "본문", false)?;
//! let result = results.recv().await;
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use lettre::Message;
use log::{error, info, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;

use super::message::EmailDraft;
use super::transport::{MailTransport, SmtpMailTransport};
use super::{MailError, SmtpConfig};

/// 결과 채널 기본 크기
pub const DEFAULT_RESULT_CAPACITY: usize = 256;

/// 비동기 발송 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailResult {
    /// 수신자 목록 (`", "` 구분)
    pub recipient: String,
    /// 실패 시 에러
    pub error: Option<MailError>,
}

impl EmailResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 발송을 예약하고 즉시 반환하는 메일러 인터페이스
///
/// `Ok(())`는 "발송 요청 접수"를 의미하며, 실제 결과는 [`EmailResult`]로 보고됩니다.
pub trait Mailer {
    fn send_email(&self, to: &[&str], subject: &str, body: &str, is_html: bool) -> Result<(), MailError>;

    fn send_email_with_attachments(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
        is_html: bool,
    ) -> Result<(), MailError>;

    fn send_email_with_headers(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        headers: &[(&str, &str)],
        is_html: bool,
    ) -> Result<(), MailError>;

    /// 과거 시각은 `MailError::ScheduledInPast`
    fn schedule_email(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        send_at: DateTime<Utc>,
        is_html: bool,
    ) -> Result<(), MailError>;

    fn send_email_with_cc_and_bcc(
        &self,
        to: &[&str],
        cc: &[&str],
        bcc: &[&str],
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), MailError>;

    /// 수신자마다 별도 태스크로 발송합니다.
    fn send_bulk_email(&self, to: &[&str], subject: &str, body: &str, is_html: bool) -> Result<(), MailError>;

    fn send_email_with_inline_images(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        image_paths: &[PathBuf],
    ) -> Result<(), MailError>;

    fn send_email_with_attachments_and_inline_images(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
        image_paths: &[PathBuf],
    ) -> Result<(), MailError>;
}

/// fire-and-forget 이메일 서비스
///
/// 발송 메서드는 tokio 런타임 안에서 호출해야 합니다.
pub struct EmailRoutineService {
    from: String,
    transport: Arc<dyn MailTransport>,
    results_tx: Sender<EmailResult>,
    results_rx: Mutex<Option<Receiver<EmailResult>>>,
    dropped_results: Arc<AtomicU64>,
}

impl EmailRoutineService {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = SmtpMailTransport::new(config)?;
        Ok(Self::with_transport(&config.username, Arc::new(transport)))
    }

    pub fn with_transport(from: &str, transport: Arc<dyn MailTransport>) -> Self {
        Self::with_result_capacity(from, transport, DEFAULT_RESULT_CAPACITY)
    }

    /// 결과 채널 크기를 지정해 생성합니다. 0은 1로 취급합니다.
    pub fn with_result_capacity(from: &str, transport: Arc<dyn MailTransport>, capacity: usize) -> Self {
        let (results_tx, results_rx) = mpsc::channel(capacity.max(1));

        Self {
            from: from.to_string(),
            transport,
            results_tx,
            results_rx: Mutex::new(Some(results_rx)),
            dropped_results: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 결과 수신 채널을 가져갑니다. 한 번만 가져갈 수 있습니다.
    pub fn take_results(&self) -> Option<Receiver<EmailResult>> {
        self.results_rx.lock().ok().and_then(|mut rx| rx.take())
    }

    /// 채널이 가득 차 버려진 결과 수
    pub fn dropped_results(&self) -> u64 {
        self.dropped_results.load(Ordering::Relaxed)
    }

    /// 결과를 로그로 출력하는 백그라운드 태스크를 시작합니다.
    ///
    /// 이미 채널을 가져간 경우 `None`을 반환합니다.
    pub fn spawn_result_logger(&self) -> Option<JoinHandle<()>> {
        let mut results = self.take_results()?;

        Some(tokio::spawn(async move {
            while let Some(result) = results.recv().await {
                match &result.error {
                    None => info!("📧 이메일 발송 성공: {}", result.recipient),
                    Some(e) => error!("이메일 발송 실패 ({}): {}", result.recipient, e),
                }
            }
        }))
    }

    fn draft(&self, to: &[&str], subject: &str, body: &str) -> EmailDraft {
        EmailDraft::new(&self.from, to, subject, body)
    }

    /// 조립된 메시지를 백그라운드에서 전송하고 결과를 채널로 보고합니다.
    fn dispatch(&self, recipient: String, message: Message) {
        let transport = Arc::clone(&self.transport);
        let results_tx = self.results_tx.clone();
        let dropped_results = Arc::clone(&self.dropped_results);

        tokio::spawn(async move {
            let error = transport.send(message).await.err();

            match results_tx.try_send(EmailResult { recipient, error }) {
                Ok(()) => {}
                Err(TrySendError::Full(result)) => {
                    dropped_results.fetch_add(1, Ordering::Relaxed);
                    warn!("결과 채널이 가득 차 발송 결과를 버립니다: {}", result.recipient);
                }
                Err(TrySendError::Closed(_)) => {
                    dropped_results.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    }

    fn dispatch_draft(&self, draft: EmailDraft) -> Result<(), MailError> {
        let message = draft.build()?;
        self.dispatch(draft.recipients_label(), message);
        Ok(())
    }

    /// Cc/Bcc와 첨부파일을 함께 발송합니다.
    #[allow(clippy::too_many_arguments)]
    pub fn send_email_with_cc_bcc_and_attachments(
        &self,
        to: &[&str],
        cc: &[&str],
        bcc: &[&str],
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
        is_html: bool,
    ) -> Result<(), MailError> {
        let draft = self
            .draft(to, subject, body)
            .cc(cc)
            .bcc(bcc)
            .attachments(attachment_paths)
            .html(is_html);
        self.dispatch_draft(draft)
    }
}

impl Mailer for EmailRoutineService {
    fn send_email(&self, to: &[&str], subject: &str, body: &str, is_html: bool) -> Result<(), MailError> {
        self.dispatch_draft(self.draft(to, subject, body).html(is_html))
    }

    fn send_email_with_attachments(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
        is_html: bool,
    ) -> Result<(), MailError> {
        let draft = self
            .draft(to, subject, body)
            .attachments(attachment_paths)
            .html(is_html);
        self.dispatch_draft(draft)
    }

    fn send_email_with_headers(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        headers: &[(&str, &str)],
        is_html: bool,
    ) -> Result<(), MailError> {
        let draft = headers
            .iter()
            .fold(self.draft(to, subject, body).html(is_html), |draft, (name, value)| {
                draft.header(name, value)
            });
        self.dispatch_draft(draft)
    }

    fn schedule_email(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        send_at: DateTime<Utc>,
        is_html: bool,
    ) -> Result<(), MailError> {
        let delay = (send_at - Utc::now())
            .to_std()
            .ok()
            .filter(|delay| !delay.is_zero())
            .ok_or(MailError::ScheduledInPast)?;

        let draft = self.draft(to, subject, body).html(is_html);
        let message = draft.build()?;
        let recipient = draft.recipients_label();
        let transport = Arc::clone(&self.transport);
        let results_tx = self.results_tx.clone();

        info!("⏰ 이메일 예약: {} ({})", recipient, send_at);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let error = transport.send(message).await.err();
            let _ = results_tx.send(EmailResult { recipient, error });
        });

        Ok(())
    }

    fn send_email_with_cc_and_bcc(
        &self,
        to: &[&str],
        cc: &[&str],
        bcc: &[&str],
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), MailError> {
        let draft = self.draft(to, subject, body).cc(cc).bcc(bcc).html(is_html);
        self.dispatch_draft(draft)
    }

    fn send_bulk_email(&self, to: &[&str], subject: &str, body: &str, is_html: bool) -> Result<(), MailError> {
        let messages = to
            .iter()
            .map(|recipient| {
                self.draft(&[*recipient], subject, body)
                    .html(is_html)
                    .build()
                    .map(|message| (recipient.to_string(), message))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (recipient, message) in messages {
            self.dispatch(recipient, message);
        }
        Ok(())
    }

    fn send_email_with_inline_images(
        &self,
        to: &[&str],
        subject: &str,
        body: &str,
        image_paths: &[PathBuf],
    ) -> Result<(), MailError> {
        let draft = self.draft(to, subject, body).html(true).inline_images(image_paths);
        self.dispatch_draft(draft)
    }

    fn send_email_with_attachments_and_inline_images(
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
        self.dispatch_draft(draft)
    }
}
