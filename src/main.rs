//! backend_toolkit 데모 서비스
//!
//! 설정된 토큰 백엔드(JWT/PASETO)로 토큰을 발급/검증하는 HTTP 서버를 구동합니다.

use std::io;

use dotenv::dotenv;
use log::{error, info};
use backend_toolkit::config::Environment;
use backend_toolkit::handlers::TokenState;
use backend_toolkit::logger::setup_logger_file;
use backend_toolkit::routes::routes;
use backend_toolkit::server::{ActixServer, ServerSettings};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 backend_toolkit 시작중... (환경: {:?})", Environment::current());

    let state = TokenState::from_env().map_err(|e| {
        error!("토큰 매니저 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;
    info!("✅ 토큰 백엔드: {}", state.token_manager.token_type());

    let settings = ServerSettings::from_env();
    let mut server = ActixServer::new(settings, routes(state));

    let addr = server.start().map_err(|e| io::Error::other(e.to_string()))?;
    info!("📍 Health check: http://{}/health", addr);
    info!("📍 API: http://{}/api/v1/tokens", addr);

    server
        .graceful_shutdown()
        .await
        .map_err(|e| io::Error::other(e.to_string()))
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// 로거 초기화 전이므로 결과는 표준 에러로 출력합니다.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let file_name = match profile.as_str() {
        "prod" => ".env.prod",
        "dev" => ".env.dev",
        _ => {
            dotenv().ok();
            eprintln!("Current profile: {}, 기본 .env 파일 로드", profile);
            return;
        }
    };

    match dotenv::from_filename(file_name) {
        Ok(_) => eprintln!("Current profile: {}, {} 파일 로드 됨", profile, file_name),
        Err(e) => eprintln!("Current profile: {}, {} 파일 로드 실패: {}", profile, file_name, e),
    }
}

/// 로깅 시스템을 초기화합니다
///
/// `logs/{timestamp}_{LOG_FILE_NAME}` 파일과 표준 출력에 함께 기록합니다.
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info")
/// * `LOG_FILE_NAME` - 로그 파일 이름 (기본값: "backend_toolkit.log")
fn init_logging() {
    let file_name = std::env::var("LOG_FILE_NAME").unwrap_or_else(|_| "backend_toolkit.log".to_string());

    if let Err(e) = setup_logger_file(&file_name) {
        eprintln!("로거 초기화 실패: {}", e);
    }
}
