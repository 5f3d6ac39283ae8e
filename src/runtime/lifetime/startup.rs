use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::ViewService;
use crate::storage::{StorageFactory, ViewStore};

pub struct StartupContext {
    pub store: Arc<dyn ViewStore>,
    pub view_service: Arc<ViewService>,
}

/// 准备服务器启动的上下文（存储与服务）
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = crate::config::get_config();
    prepare_startup(&config).await
}

/// 按给定配置创建存储并组装服务
///
/// 存储只在这里创建一次，之后以 `Arc` 注入各 handler。
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create_from_config(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", store.backend_name());

    let cooldown = config.session.cooldown();
    let view_service = Arc::new(ViewService::new(store.clone(), cooldown));
    info!("View cooldown window: {}s", cooldown.num_seconds());

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(StartupContext {
        store,
        view_service,
    })
}
