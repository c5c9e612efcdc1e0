//! axum 서버 부트스트랩
//!
//! TLS 종료는 지원하지 않으므로 `use_tls`가 켜져 있으면
//! `ServerError::TlsUnsupported`를 반환합니다. (리버스 프록시에서 처리)

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use log::{error, info, warn};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;

use super::{CorsSettings, ServerError, ServerSettings, SHUTDOWN_TIMEOUT};

/// axum 기반 HTTP 서버
pub struct AxumServer {
    settings: ServerSettings,
    router: Router,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl AxumServer {
    pub fn new(settings: ServerSettings, router: Router) -> Self {
        Self {
            settings,
            router,
            shutdown_tx: None,
            task: None,
        }
    }

    /// 등록된 사용자 라우터
    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// 정적 파일, CORS 레이어가 적용된 최종 라우터를 만듭니다.
    fn build_app(&self) -> Router {
        let mut app = self.router.clone();

        if let Some(path) = &self.settings.static_path {
            app = app.nest_service("/static", ServeDir::new(path));
        }
        if self.settings.use_cors {
            app = app.layer(build_cors(&self.settings.cors));
        }

        app
    }

    /// 서버를 바인딩하고 백그라운드 태스크로 실행합니다.
    ///
    /// # Errors
    ///
    /// * `ServerError::TlsUnsupported` - `use_tls`가 설정된 경우
    /// * `ServerError::AlreadyStarted` - 이미 실행 중인 경우
    /// * `ServerError::Bind` - 주소 바인딩 실패
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.settings.use_tls {
            return Err(ServerError::TlsUnsupported);
        }
        if self.task.is_some() {
            return Err(ServerError::AlreadyStarted);
        }

        let address = self.settings.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = self.build_app();

        self.task = Some(tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        }));
        self.shutdown_tx = Some(shutdown_tx);

        info!("🌐 서버가 http://{} 에서 실행중입니다", local_addr);
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
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let Some(mut task) = self.task.take() else {
            return Ok(());
        };

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut task).await {
            Ok(Ok(Ok(()))) => {
                info!("✅ 서버가 정상적으로 종료되었습니다");
                Ok(())
            }
            Ok(Ok(Err(e))) => {
                error!("서버 실행 오류: {}", e);
                Err(ServerError::Io(e))
            }
            Ok(Err(e)) => {
                error!("서버 태스크 오류: {}", e);
                Err(ServerError::Io(std::io::Error::other(e.to_string())))
            }
            Err(_) => {
                warn!("⚠️ 우아한 종료 시간 초과, 강제 종료합니다");
                task.abort();
                Ok(())
            }
        }
    }
}

/// [`CorsSettings`]로 tower-http CORS 레이어를 구성합니다.
fn build_cors(settings: &CorsSettings) -> CorsLayer {
    let methods: Vec<Method> = settings
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = settings
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers(headers)
        .max_age(Duration::from_secs(settings.max_age as u64));

    if settings.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(settings.allow_credentials)
}
