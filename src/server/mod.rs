//! HTTP 서버 부트스트랩 모듈
//!
//! 하나의 [`ServerSettings`]로 두 가지 웹 프레임워크 서버를 띄울 수 있습니다.
//!
//! | 백엔드 | 타입 | CORS | 정적 파일 | TLS |
//! |--------|------|------|-----------|-----|
//! | actix-web | [`ActixServer`] | `actix-cors` | `actix-files` | rustls |
//! | axum | [`AxumServer`] | `tower-http` | `ServeDir` | 미지원 |
//!
//! 두 서버 모두 `start()`는 서버를 백그라운드에서 실행시키고 즉시 반환하며,
//! `graceful_shutdown()`은 Ctrl-C를 기다린 뒤 최대 5초 안에 종료합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use backend_toolkit::server::{ActixServer, ServerSettings};
//!
//! let mut server = ActixServer::new(ServerSettings::from_env(), configure_all_routes);
//! server.start()?;
//! server.graceful_shutdown().await?;
//! ```

pub mod actix_server;
pub mod axum_server;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::ServerConfig;

pub use actix_server::ActixServer;
pub use axum_server::AxumServer;

/// 우아한 종료 대기 시간
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// 서버 부트스트랩 에러
#[derive(Error, Debug)]
pub enum ServerError {
    /// 인증서/개인키 로드 실패
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// 선택한 백엔드가 TLS 종료를 지원하지 않음
    #[error("TLS termination is not supported by this server backend")]
    TlsUnsupported,

    /// 주소 바인딩 실패
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// 이미 실행 중인 서버를 다시 시작하려 함
    #[error("server is already running")]
    AlreadyStarted,

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}

/// CORS 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsSettings {
    /// 허용 Origin 목록 (`"*"`는 모든 Origin 허용, 이 경우 자격 증명은 비활성화)
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight 캐시 시간 (초)
    pub max_age: usize,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            allowed_headers: ["authorization", "accept", "content-type"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            allow_credentials: true,
            max_age: 3600,
        }
    }
}

impl CorsSettings {
    pub(crate) fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// 서버 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// `/static` 경로로 제공할 디렉터리
    pub static_path: Option<String>,
    pub use_tls: bool,
    pub tls_cert_file: String,
    pub tls_key_file: String,
    pub use_cors: bool,
    pub cors: CorsSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_path: None,
            use_tls: false,
            tls_cert_file: "certs/cert.pem".to_string(),
            tls_key_file: "certs/key.pem".to_string(),
            use_cors: true,
            cors: CorsSettings::default(),
        }
    }
}

impl ServerSettings {
    /// 환경 변수에서 서버 설정을 읽습니다. (자세한 목록은 [`ServerConfig`] 참고)
    pub fn from_env() -> Self {
        let mut cors = CorsSettings::default();
        let origins = ServerConfig::cors_allowed_origins();
        if !origins.is_empty() {
            cors.allowed_origins = origins;
        }

        Self {
            host: ServerConfig::host(),
            port: ServerConfig::port(),
            static_path: ServerConfig::static_path(),
            use_tls: ServerConfig::use_tls(),
            tls_cert_file: ServerConfig::tls_cert_file(),
            tls_key_file: ServerConfig::tls_key_file(),
            use_cors: ServerConfig::use_cors(),
            cors,
        }
    }

    /// `host:port` 형식의 바인딩 주소
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn scheme(&self) -> &'static str {
        if self.use_tls { "https" } else { "http" }
    }
}

/// PEM 인증서 체인과 개인키로 rustls 서버 설정을 만듭니다.
///
/// # Errors
///
/// * `ServerError::Tls` - 파일이 없거나, PEM 형식이 잘못되었거나, 키가 인증서와 맞지 않는 경우
pub fn load_rustls_config(
    cert_file: impl AsRef<Path>,
    key_file: impl AsRef<Path>,
) -> Result<rustls::ServerConfig, ServerError> {
    let cert_file = cert_file.as_ref();
    let key_file = key_file.as_ref();

    let mut cert_reader = BufReader::new(File::open(cert_file).map_err(|e| {
        ServerError::Tls(format!("cannot open certificate {}: {}", cert_file.display(), e))
    })?);
    let certs = rustls_pemfile::certs(&mut cert_reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Tls(format!("invalid certificate PEM: {}", e)))?;
    if certs.is_empty() {
        return Err(ServerError::Tls(format!(
            "no certificates found in {}",
            cert_file.display()
        )));
    }

    let mut key_reader = BufReader::new(File::open(key_file).map_err(|e| {
        ServerError::Tls(format!("cannot open private key {}: {}", key_file.display(), e))
    })?);
    let key = rustls_pemfile::private_key(&mut key_reader)
        .map_err(|e| ServerError::Tls(format!("invalid private key PEM: {}", e)))?
        .ok_or_else(|| {
            ServerError::Tls(format!("no private key found in {}", key_file.display()))
        })?;

    rustls::ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| ServerError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::Tls(e.to_string()))
}
