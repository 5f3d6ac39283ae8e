//! Server mode
//!
//! Builds the actix-web application and runs it until it exits or a
//! shutdown signal arrives.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, health_routes, view_routes};
use crate::runtime::lifetime;

/// JSON 请求体上限，超出返回 413；URL 本身不做长度校验
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// 注册所有路由及 JSON 解析配置
///
/// 服务器和集成测试共用同一套路由。
pub fn build_app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
        .configure(health_routes)
        .configure(view_routes);
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Creates the store and the view service
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let view_service = startup.view_service.clone();
    let store_for_shutdown = startup.store.clone();

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::Data::new(view_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(build_app_config)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(store_for_shutdown) => {
            warn!("Graceful shutdown: storage closed");
        }
    }

    Ok(())
}
