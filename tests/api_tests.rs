//! HTTP API 集成测试
//!
//! 使用临时 SQLite 数据库，覆盖注册、计数、冷却去重和统计端点。

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use viewcounter::api::middleware::RequestIdMiddleware;
use viewcounter::api::services::AppStartTime;
use viewcounter::config::StaticConfig;
use viewcounter::runtime::lifetime::startup::prepare_startup;
use viewcounter::runtime::modes::build_app_config;
use viewcounter::runtime::modes::server::JSON_BODY_LIMIT;
use viewcounter::services::ViewService;

// =============================================================================
// 测试环境
// =============================================================================

async fn sqlite_service() -> (Arc<ViewService>, TempDir) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("api_test.db");

    let mut config = StaticConfig::default();
    config.database.database_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let ctx = prepare_startup(&config).await.expect("初始化存储失败");
    (ctx.view_service, temp_dir)
}

fn peer(ip: &str) -> SocketAddr {
    let ip: std::net::IpAddr = ip.parse().unwrap();
    SocketAddr::new(ip, 40000)
}

macro_rules! test_app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($service.clone()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(build_app_config),
        )
        .await
    };
}

// =============================================================================
// 端到端场景
// =============================================================================

#[actix_rt::test]
async fn test_register_view_view_stats() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);

    let req = TestRequest::post()
        .uri("/register")
        .set_json(json!({ "url": "http://x.com/" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "URL registered successfully.");
    let id = body["id"].as_str().unwrap().to_string();

    let req = TestRequest::get()
        .uri(&format!("/view/{}", id))
        .peer_addr(peer("10.0.0.1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "View counted successfully.");
    assert_eq!(body["views"], 1);
    assert_eq!(body["counted"], true);

    let req = TestRequest::get()
        .uri(&format!("/view/{}", id))
        .peer_addr(peer("10.0.0.1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "View count not incremented (Session active)");
    assert_eq!(body["views"], 1);
    assert_eq!(body["counted"], false);

    let req = TestRequest::get()
        .uri(&format!("/stats/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "url": "x.com", "views": 1 }));
}

#[actix_rt::test]
async fn test_distinct_peers_both_count() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);
    let id = service.register("https://y.com").await.unwrap();

    for (ip, expected) in [("10.0.0.1", 1), ("10.0.0.2", 2), ("::1", 3)] {
        let req = TestRequest::get()
            .uri(&format!("/view/{}", id))
            .peer_addr(peer(ip))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["views"], expected, "peer {}", ip);
    }
}

#[actix_rt::test]
async fn test_forwarded_header_does_not_change_client() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);
    let id = service.register("z.com").await.unwrap();

    for forwarded in ["1.1.1.1", "2.2.2.2"] {
        let req = TestRequest::get()
            .uri(&format!("/view/{}", id))
            .peer_addr(peer("10.0.0.9"))
            .insert_header(("X-Forwarded-For", forwarded))
            .to_request();
        test::call_service(&app, req).await;
    }

    assert_eq!(service.get_stats(&id).await.unwrap().views, 1);
}

// =============================================================================
// 404
// =============================================================================

#[actix_rt::test]
async fn test_unknown_id_returns_detail() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);

    for uri in ["/view/nonexistent", "/stats/nonexistent"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "detail": "URL ID not found" }));
    }

    // 查询不存在的 ID 不会创建记录
    assert_eq!(service.store().count_urls().await.unwrap(), 0);
}

// =============================================================================
// 按 URL 操作
// =============================================================================

#[actix_rt::test]
async fn test_view_by_url_reuses_record() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);

    let req = TestRequest::post()
        .uri("/view")
        .peer_addr(peer("10.0.0.1"))
        .set_json(json!({ "url": "http://x.com" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["views"], 1);

    let req = TestRequest::post()
        .uri("/view")
        .peer_addr(peer("10.0.0.2"))
        .set_json(json!({ "url": "https://x.com/" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["views"], 2);
    assert_eq!(body["counted"], true);

    assert_eq!(service.store().count_urls().await.unwrap(), 1);
}

#[actix_rt::test]
async fn test_stats_by_url_creates_record() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);

    let req = TestRequest::post()
        .uri("/stats")
        .set_json(json!({ "url": "https://new.example/" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "url": "new.example", "views": 0 }));

    assert_eq!(service.store().count_urls().await.unwrap(), 1);
}

#[actix_rt::test]
async fn test_register_does_not_reuse() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/register")
            .set_json(json!({ "url": "x.com" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    assert_ne!(ids[0], ids[1]);
    assert_eq!(service.store().count_urls().await.unwrap(), 2);
}

#[actix_rt::test]
async fn test_missing_url_field_is_client_error() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);

    let req = TestRequest::post()
        .uri("/register")
        .set_json(json!({ "link": "x.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_rt::test]
async fn test_long_url_is_accepted() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);
    let long_url = format!("https://example.com/{}", "a".repeat(200 * 1024));

    let req = TestRequest::post()
        .uri("/stats")
        .set_json(json!({ "url": long_url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["url"].as_str().unwrap().len(), long_url.len() - "https://".len());
    assert_eq!(body["views"], 0);
}

#[actix_rt::test]
async fn test_oversized_body_is_rejected() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);
    let huge_url = "a".repeat(JSON_BODY_LIMIT + 1);

    let req = TestRequest::post()
        .uri("/register")
        .set_json(json!({ "url": huge_url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(service.store().count_urls().await.unwrap(), 0);
}

// =============================================================================
// Health 与 request id
// =============================================================================

#[actix_rt::test]
async fn test_health_reports_storage() {
    let (service, _dir) = sqlite_service().await;
    let app = test_app!(service);
    service.register("x.com").await.unwrap();

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "sqlite");
    assert_eq!(body["urls_count"], 1);

    let req = TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
