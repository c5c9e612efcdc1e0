//! API 라우트 설정 모듈
//!
//! # Routes
//!
//! | Method | Path | 인증 |
//! |--------|------|------|
//! | GET | `/health` | - |
//! | POST | `/api/v1/tokens` | - |
//! | POST | `/api/v1/tokens/verify` | - |
//! | GET | `/api/v1/me` | Bearer 토큰 필수 |
//!
//! # Examples
//!
//! ```rust,ignore
//! let state = TokenState::from_env()?;
//! let server = ActixServer::new(ServerSettings::from_env(), routes(state));
//! ```

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::handlers::{self, TokenState};
use crate::middlewares::TokenMiddleware;

/// `ActixServer`에 넘길 라우트 등록 함수를 만듭니다.
pub fn routes(state: TokenState) -> impl Fn(&mut web::ServiceConfig) + Send + Sync + Clone + 'static {
    move |cfg: &mut web::ServiceConfig| configure_all_routes(cfg, &state)
}

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig, state: &TokenState) {
    cfg.app_data(web::Data::new(state.clone()));

    // Health check endpoint
    cfg.service(health_check);

    configure_token_routes(cfg, state);
}

/// 토큰 관련 라우트를 설정합니다
///
/// ```bash
/// # 발급
/// curl -X POST http://localhost:8080/api/v1/tokens \
///   -H "Content-Type: application/json" -d '{"username":"alice"}'
///
/// # 보호된 라우트
/// curl http://localhost:8080/api/v1/me -H "Authorization: Bearer v4.local.AAAA..."
/// ```
fn configure_token_routes(cfg: &mut web::ServiceConfig, state: &TokenState) {
    cfg.service(
        web::scope("/api/v1/tokens")
            .service(handlers::token_handlers::issue_token)
            .service(handlers::token_handlers::verify_token),
    );

    cfg.service(
        web::scope("/api/v1/me")
            .wrap(TokenMiddleware::required(state.token_manager.clone()))
            .service(handlers::token_handlers::current_token),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "backend_toolkit",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z",
///   "token_backend": "jwt"
/// }
/// ```
#[get("/health")]
async fn health_check(state: web::Data<TokenState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "backend_toolkit",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "token_backend": state.token_manager.token_type().as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::new_token_manager;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::Duration;
    use serde_json::Value;

    fn state(backend: &str) -> TokenState {
        TokenState::new(
            new_token_manager(backend, "12345678901234567890123456789012").unwrap(),
            Duration::minutes(15),
        )
    }

    #[actix_web::test]
    async fn test_health_check() {
        let state = state("paseto");
        let app = test::init_service(App::new().configure(routes(state))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["token_backend"], "paseto");
    }

    #[actix_web::test]
    async fn test_issue_verify_and_me_flow() {
        let state = state("jwt");
        let app = test::init_service(App::new().configure(routes(state))).await;

        let issue = test::TestRequest::post()
            .uri("/api/v1/tokens")
            .set_json(json!({"username": "alice", "duration_minutes": 30}))
            .to_request();
        let resp = test::call_service(&app, issue).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        let token = body["data"]["access_token"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert_eq!(body["data"]["backend"], "jwt");
        assert!(body["data"]["expires_in"].as_i64().unwrap() > 29 * 60);

        let verify = test::TestRequest::post()
            .uri("/api/v1/tokens/verify")
            .set_json(json!({ "token": token }))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, verify).await).await;
        assert_eq!(body["data"]["valid"], true);
        assert_eq!(body["data"]["payload"]["username"], "alice");

        let me = test::TestRequest::get()
            .uri("/api/v1/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, me).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["username"], "alice");
    }

    #[actix_web::test]
    async fn test_issue_with_user_id() {
        let app = test::init_service(App::new().configure(routes(state("paseto")))).await;
        let user_id = uuid::Uuid::new_v4();

        let issue = test::TestRequest::post()
            .uri("/api/v1/tokens")
            .set_json(json!({"username": "carol", "user_id": user_id}))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, issue).await).await;

        assert_eq!(body["data"]["payload"]["user_id"], user_id.to_string());
        assert!(body["data"]["access_token"].as_str().unwrap().starts_with("v4.local."));
    }

    #[actix_web::test]
    async fn test_issue_rejects_blank_username() {
        let app = test::init_service(App::new().configure(routes(state("jwt")))).await;

        let issue = test::TestRequest::post()
            .uri("/api/v1/tokens")
            .set_json(json!({"username": ""}))
            .to_request();
        let resp = test::call_service(&app, issue).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_issue_rejects_out_of_range_duration() {
        let app = test::init_service(App::new().configure(routes(state("paseto")))).await;

        for minutes in [i64::MAX, crate::domain::MAX_DURATION_MINUTES + 1, 0] {
            let issue = test::TestRequest::post()
                .uri("/api/v1/tokens")
                .set_json(json!({"username": "alice", "duration_minutes": minutes}))
                .to_request();
            let resp = test::call_service(&app, issue).await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
        }
    }

    #[actix_web::test]
    async fn test_verify_rejects_invalid_token() {
        let app = test::init_service(App::new().configure(routes(state("jwt")))).await;

        let verify = test::TestRequest::post()
            .uri("/api/v1/tokens/verify")
            .set_json(json!({"token": "not.a.token"}))
            .to_request();
        let resp = test::call_service(&app, verify).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Authentication error"));
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let app = test::init_service(App::new().configure(routes(state("jwt")))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
