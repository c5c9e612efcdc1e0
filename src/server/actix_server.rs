//! actix-web 서버 부트스트랩

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::dev::ServerHandle;
use actix_web::middleware::{self, Condition};
use actix_web::{web, App, HttpServer};
use log::{error, info, warn};
use tokio::task::JoinHandle;

use super::{load_rustls_config, CorsSettings, ServerError, ServerSettings, SHUTDOWN_TIMEOUT};

/// 라우트 등록 함수 타입
pub type ConfigureFn = Arc<dyn Fn(&mut web::ServiceConfig) + Send + Sync>;

/// actix-web 기반 HTTP 서버
///
/// # Examples
///
/// ```rust,ignore
/// let mut server = ActixServer::new(ServerSettings::from_env(), |cfg: &mut web::ServiceConfig| {
///     cfg.route("/health", web::get().to(health_check));
/// });
/// let addr = server.start()?;
/// server.graceful_shutdown().await?;
/// ```
pub struct ActixServer {
    settings: ServerSettings,
    configure: ConfigureFn,
    handle: Option<ServerHandle>,
    task: Option<JoinHandle<io::Result<()>>>,
}

impl ActixServer {
    pub fn new<F>(settings: ServerSettings, configure: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Sync + 'static,
    {
        Self {
            settings,
            configure: Arc::new(configure),
            handle: None,
            task: None,
        }
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// 서버를 바인딩하고 백그라운드에서 실행합니다.
    ///
    /// actix 런타임 안에서 호출해야 하며, 실제로 바인딩된 주소를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `ServerError::AlreadyStarted` - 이미 실행 중인 경우
    /// * `ServerError::Tls` - TLS 설정 로드 실패
    /// * `ServerError::Bind` - 주소 바인딩 실패
    pub fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.handle.is_some() {
            return Err(ServerError::AlreadyStarted);
        }

        let tls_config = if self.settings.use_tls {
            Some(load_rustls_config(
                &self.settings.tls_cert_file,
                &self.settings.tls_key_file,
            )?)
        } else {
            None
        };

        let settings = self.settings.clone();
        let configure = self.configure.clone();

        let server = HttpServer::new(move || {
            let configure = configure.clone();

            let app = App::new()
                .wrap(Condition::new(settings.use_cors, build_cors(&settings.cors)))
                .wrap(middleware::Logger::default())
                .wrap(middleware::NormalizePath::trim())
                .configure(move |cfg| configure(cfg));

            match &settings.static_path {
                Some(path) => app.service(Files::new("/static", path)),
                None => app,
            }
        })
        .shutdown_timeout(SHUTDOWN_TIMEOUT.as_secs());

        let address = self.settings.address();
        let bound = match tls_config {
            Some(tls) => server.bind_rustls_0_23(&address, tls),
            None => server.bind(&address),
        }
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        let local_addr = bound.addrs().into_iter().next().ok_or_else(|| ServerError::Bind {
            address: address.clone(),
            source: io::Error::new(io::ErrorKind::AddrNotAvailable, "no listener bound"),
        })?;

        let running = bound.run();
        self.handle = Some(running.handle());
        self.task = Some(actix_web::rt::spawn(running));

        info!(
            "🌐 서버가 {}://{} 에서 실행중입니다",
            self.settings.scheme(),
            local_addr
        );
        if let Some(path) = &self.settings.static_path {
            info!("📁 정적 파일: /static -> {}", path);
        }

        Ok(local_addr)
    }

    /// Ctrl-C 신호를 기다린 뒤 서버를 우아하게 종료합니다.
    pub async fn graceful_shutdown(&mut self) -> Result<(), ServerError> {
        tokio::signal::ctrl_c().await?;
        info!("🛑 종료 신호 수신, 서버를 종료합니다...");
        self.shutdown().await
    }

    /// 진행 중인 요청을 최대 5초 기다린 뒤 서버를 종료합니다.
    pub async fn shutdown(&mut self) -> Result<(), ServerError> {
        if let Some(handle) = self.handle.take() {
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, handle.stop(true)).await.is_err() {
                warn!("⚠️ 우아한 종료 시간 초과, 강제 종료합니다");
                handle.stop(false).await;
            }
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(Ok(())) => info!("✅ 서버가 정상적으로 종료되었습니다"),
                Ok(Err(e)) => {
                    error!("서버 실행 오류: {}", e);
                    return Err(ServerError::Io(e));
                }
                Err(e) => {
                    error!("서버 태스크 오류: {}", e);
                    return Err(ServerError::Io(io::Error::other(e.to_string())));
                }
            }
        }

        Ok(())
    }
}

/// [`CorsSettings`]로 actix-cors 미들웨어를 구성합니다.
fn build_cors(settings: &CorsSettings) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(settings.allowed_methods.iter().map(String::as_str))
        .allowed_headers(settings.allowed_headers.iter().map(String::as_str))
        .max_age(settings.max_age);

    if settings.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &settings.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        if settings.allow_credentials {
            cors = cors.supports_credentials();
        }
    }

    cors
}
