//! 이메일 메시지 조립
//!
//! 본문/첨부파일/인라인 이미지 조합에 따라 MIME 구조가 달라집니다.
//!
//! ```text
//! 본문만              -> text/plain | text/html
//! 본문 + 첨부         -> multipart/mixed
//! 본문 + 인라인 이미지 -> multipart/related
//! 모두               -> multipart/mixed [ multipart/related, 첨부... ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use super::MailError;

/// 본문에 `<html>` 또는 `<HTML>` 태그가 있으면 HTML로 판단합니다.
pub fn is_html(body: &str) -> bool {
    body.contains("<html>") || body.contains("<HTML>")
}

/// 발송 전 이메일 초안
#[derive(Debug, Clone, Default)]
pub struct EmailDraft {
    from: String,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Option<String>,
    subject: String,
    body: String,
    html: bool,
    headers: Vec<(String, String)>,
    attachments: Vec<PathBuf>,
    inline_images: Vec<PathBuf>,
}

impl EmailDraft {
    pub fn new(from: &str, to: &[&str], subject: &str, body: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: subject.to_string(),
            body: body.to_string(),
            ..Self::default()
        }
    }

    pub fn html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub fn cc(mut self, cc: &[&str]) -> Self {
        self.cc = cc.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn bcc(mut self, bcc: &[&str]) -> Self {
        self.bcc = bcc.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn reply_to(mut self, reply_to: &str) -> Self {
        self.reply_to = Some(reply_to.to_string());
        self
    }

    /// 사용자 정의 헤더를 추가합니다. (예: `X-Priority`)
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn attachments(mut self, paths: &[PathBuf]) -> Self {
        self.attachments.extend_from_slice(paths);
        self
    }

    pub fn inline_images(mut self, paths: &[PathBuf]) -> Self {
        self.inline_images.extend_from_slice(paths);
        self
    }

    /// To, Cc, Bcc 전체 수신자를 `", "`로 연결한 문자열
    pub fn recipients_label(&self) -> String {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `lettre::Message`를 조립합니다.
    ///
    /// # Errors
    ///
    /// * `MailError::NoRecipients` - 수신자가 없는 경우
    /// * `MailError::InvalidAddress` - 주소 형식이 잘못된 경우
    /// * `MailError::InvalidHeader` - 헤더 이름에 허용되지 않는 문자가 있는 경우
    /// * `MailError::Attachment` - 첨부파일을 읽을 수 없는 경우
    pub fn build(&self) -> Result<Message, MailError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(MailError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .subject(self.subject.as_str());

        for address in &self.to {
            builder = builder.to(parse_mailbox(address)?);
        }
        for address in &self.cc {
            builder = builder.cc(parse_mailbox(address)?);
        }
        for address in &self.bcc {
            builder = builder.bcc(parse_mailbox(address)?);
        }
        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }
        for (name, value) in &self.headers {
            let header_name = HeaderName::new_from_ascii(name.clone())
                .map_err(|_| MailError::InvalidHeader(name.clone()))?;
            builder = builder.raw_header(HeaderValue::new(header_name, value.clone()));
        }

        let body = if self.html {
            SinglePart::html(self.body.clone())
        } else {
            SinglePart::plain(self.body.clone())
        };

        let attachments = self
            .attachments
            .iter()
            .map(|path| attachment_part(path))
            .collect::<Result<Vec<_>, _>>()?;
        let inline_images = self
            .inline_images
            .iter()
            .map(|path| inline_image_part(path))
            .collect::<Result<Vec<_>, _>>()?;

        let message = match (attachments.is_empty(), inline_images.is_empty()) {
            (true, true) => builder.singlepart(body),
            (false, true) => builder.multipart(with_parts(MultiPart::mixed().singlepart(body), attachments)),
            (true, false) => builder.multipart(with_parts(MultiPart::related().singlepart(body), inline_images)),
            (false, false) => {
                let related = with_parts(MultiPart::related().singlepart(body), inline_images);
                builder.multipart(with_parts(MultiPart::mixed().multipart(related), attachments))
            }
        };

        message.map_err(|e| MailError::Build(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

fn with_parts(mut multipart: MultiPart, parts: Vec<SinglePart>) -> MultiPart {
    for part in parts {
        multipart = multipart.singlepart(part);
    }
    multipart
}

fn read_file(path: &Path) -> Result<(String, Vec<u8>), MailError> {
    let attachment_error = |message: String| MailError::Attachment {
        path: path.display().to_string(),
        message,
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| attachment_error("path has no file name".to_string()))?
        .to_string();
    let content = fs::read(path).map_err(|e| attachment_error(e.to_string()))?;

    Ok((file_name, content))
}

fn attachment_part(path: &Path) -> Result<SinglePart, MailError> {
    let (file_name, content) = read_file(path)?;
    let content_type = ContentType::parse("application/octet-stream")
        .map_err(|e| MailError::Build(e.to_string()))?;

    Ok(Attachment::new(file_name).body(content, content_type))
}

/// 파일 이름을 Content-ID로 사용하는 인라인 이미지 파트
fn inline_image_part(path: &Path) -> Result<SinglePart, MailError> {
    let (file_name, content) = read_file(path)?;
    let mime = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("image/{}", ext.to_lowercase()),
        _ => "application/octet-stream".to_string(),
    };
    let content_type = ContentType::parse(&mime).map_err(|e| MailError::Build(e.to_string()))?;

    Ok(Attachment::new_inline(file_name).body(content, content_type))
}
