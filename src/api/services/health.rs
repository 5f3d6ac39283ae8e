use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::services::ViewService;

/// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub uptime: i64,
    pub response_time_ms: u64,
}

/// Health Service
///
/// 直接访问 store，不经过计数逻辑。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        service: web::Data<Arc<ViewService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let store = service.store();
        let (urls_count, error) =
            match tokio::time::timeout(Duration::from_secs(5), store.count_urls()).await {
                Ok(Ok(count)) => (Some(count), None),
                Ok(Err(e)) => {
                    error!("Storage health check failed: {}", e);
                    (None, Some(format!("database error: {}", e.message())))
                }
                Err(_) => {
                    error!("Storage health check timeout");
                    (None, Some("timeout".to_string()))
                }
            };

        let healthy = error.is_none();
        let uptime = (chrono::Utc::now() - app_start_time.start_datetime)
            .num_seconds()
            .max(0);

        let body = HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" },
            storage: store.backend_name().to_string(),
            urls_count,
            error,
            uptime,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        if healthy {
            HttpResponse::Ok().json(body)
        } else {
            HttpResponse::ServiceUnavailable().json(body)
        }
    }

    // 存活检查，不访问存储
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check))
        .route("/health/live", web::get().to(HealthService::liveness_check))
        .route("/health/live", web::head().to(HealthService::liveness_check));
}
