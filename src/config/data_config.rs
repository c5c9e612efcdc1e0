//! 데이터 및 서버 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, 데이터베이스 연결 관련 설정을 관리합니다.

use std::env;
use std::time::Duration;

use crate::db::RetryPolicy;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버가 바인딩할 포트를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `PORT`: 커스텀 포트 설정 (기본값: 8080)
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// 서버가 바인딩할 호스트 주소를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `HOST`: 커스텀 호스트 설정 (기본값: "0.0.0.0")
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// `/static` 경로로 제공할 디렉터리 (`STATIC_PATH`, 선택사항)
    pub fn static_path() -> Option<String> {
        env::var("STATIC_PATH").ok().filter(|path| !path.trim().is_empty())
    }

    /// TLS 사용 여부 (`USE_TLS`, 기본값: false)
    pub fn use_tls() -> bool {
        parse_bool(env::var("USE_TLS").ok().as_deref(), false)
    }

    /// TLS 인증서 PEM 경로 (`TLS_CERT_FILE`)
    pub fn tls_cert_file() -> String {
        env::var("TLS_CERT_FILE").unwrap_or_else(|_| "certs/cert.pem".to_string())
    }

    /// TLS 개인키 PEM 경로 (`TLS_KEY_FILE`)
    pub fn tls_key_file() -> String {
        env::var("TLS_KEY_FILE").unwrap_or_else(|_| "certs/key.pem".to_string())
    }

    /// CORS 미들웨어 사용 여부 (`USE_CORS`, 기본값: true)
    pub fn use_cors() -> bool {
        parse_bool(env::var("USE_CORS").ok().as_deref(), true)
    }

    /// 허용할 CORS Origin 목록 (`CORS_ALLOWED_ORIGINS`, 쉼표 구분)
    ///
    /// 설정되지 않은 경우 빈 목록을 반환하며 서버 기본값이 사용됩니다.
    pub fn cors_allowed_origins() -> Vec<String> {
        split_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default())
    }
}

/// 데이터베이스 연결 설정
pub struct DatabaseConfig;

impl DatabaseConfig {
    /// MongoDB 연결 URI (`MONGODB_URI`, 기본값: "mongodb://localhost:27017")
    pub fn mongodb_uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    /// MongoDB 데이터베이스 이름 (`DATABASE_NAME`, 기본값: "backend_toolkit_dev")
    pub fn database_name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "backend_toolkit_dev".to_string())
    }

    /// PostgreSQL DSN (`POSTGRES_DSN`, 기본값 없음)
    ///
    /// 비어 있으면 연결 헬퍼가 `DbError::MissingDsn`을 반환합니다.
    pub fn postgres_dsn() -> String {
        env::var("POSTGRES_DSN").unwrap_or_default()
    }

    /// 연결 재시도 정책
    ///
    /// - `DB_MAX_RETRIES` (기본값: 3)
    /// - `DB_CONNECT_TIMEOUT_SECS` (기본값: 30)
    /// - `DB_RETRY_DELAY_SECS` (기본값: 5)
    pub fn retry_policy() -> RetryPolicy {
        let defaults = RetryPolicy::default();

        let max_retries = env::var("DB_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.max_retries);
        let timeout = env::var("DB_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let retry_delay = env::var("DB_RETRY_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry_delay);

        RetryPolicy::new(max_retries, timeout).with_retry_delay(retry_delay)
    }
}

pub(crate) fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
