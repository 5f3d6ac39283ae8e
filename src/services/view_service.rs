//! View counting service
//!
//! Business logic for registering URLs, counting views with per-client
//! cooldown deduplication, and reading stats. Shared between the HTTP
//! handlers and the CLI.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::errors::{Result, ViewCounterError};
use crate::storage::{UrlRecord, ViewStore, session_key};
use crate::utils::{generate_id, normalize_url};

/// 默认冷却时间：5 分钟
pub const DEFAULT_COOLDOWN_SECS: i64 = 300;

pub const URL_ID_NOT_FOUND: &str = "URL ID not found";

/// 一次访问的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewOutcome {
    /// 本次访问是否被计数
    pub counted: bool,
    /// 计数后的访问量（未计数时为当前值）
    pub views: u64,
}

/// URL 统计信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlStats {
    pub url: String,
    pub views: u64,
}

/// View counter service
///
/// Holds the injected store handle and the cooldown window. Cheap to clone
/// behind an `Arc`; no in-process locking.
pub struct ViewService {
    store: Arc<dyn ViewStore>,
    cooldown: Duration,
}

impl ViewService {
    pub fn new(store: Arc<dyn ViewStore>, cooldown: Duration) -> Self {
        Self { store, cooldown }
    }

    /// 使用默认 5 分钟冷却时间
    pub fn with_default_cooldown(store: Arc<dyn ViewStore>) -> Self {
        Self::new(store, Duration::seconds(DEFAULT_COOLDOWN_SECS))
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn store(&self) -> &Arc<dyn ViewStore> {
        &self.store
    }

    /// 注册 URL：总是新建记录（不复用已有记录），返回新 ID
    pub async fn register(&self, raw_url: &str) -> Result<String> {
        let record = self.create_record(raw_url).await?;
        info!("Registered URL {} as {}", record.url, record.id);
        Ok(record.id)
    }

    /// 按 URL 查找或创建记录，返回 ID
    ///
    /// 先查后写，不加锁：并发首次解析同一 URL 可能产生重复记录。
    pub async fn resolve_id(&self, raw_url: &str) -> Result<String> {
        let normalized = normalize_url(raw_url);

        if let Some(existing) = self.store.find_url_by_normalized(&normalized).await? {
            trace!("Resolved {} to existing id {}", normalized, existing.id);
            return Ok(existing.id);
        }

        let record = self.create_record(raw_url).await?;
        debug!("Resolved {} to new id {}", record.url, record.id);
        Ok(record.id)
    }

    /// 按 ID 计数一次访问
    ///
    /// 同一 `client_key` 在冷却时间内的重复访问不计数，返回当前值；
    /// 否则先 upsert 会话时间再自增访问量（两步之间无事务）。
    pub async fn increment_view(
        &self,
        id: &str,
        client_key: &str,
        now: DateTime<Utc>,
    ) -> Result<ViewOutcome> {
        let record = self.require_record(id).await?;

        let key = session_key(client_key, id);
        if let Some(session) = self.store.get_session(&key).await?
            && now - session.last_view_time < self.cooldown
        {
            debug!("View suppressed for {} (session active)", key);
            return Ok(ViewOutcome {
                counted: false,
                views: record.views,
            });
        }

        self.store.upsert_session(&key, now).await?;
        let views = self.store.increment_views(id).await?;

        debug!("View counted for {}: {}", key, views);
        Ok(ViewOutcome {
            counted: true,
            views,
        })
    }

    /// 按 URL 计数一次访问（未见过的 URL 会先创建记录）
    pub async fn increment_view_by_url(
        &self,
        raw_url: &str,
        client_key: &str,
        now: DateTime<Utc>,
    ) -> Result<ViewOutcome> {
        let id = self.resolve_id(raw_url).await?;
        self.increment_view(&id, client_key, now).await
    }

    /// 按 ID 读取统计，不修改任何数据
    pub async fn get_stats(&self, id: &str) -> Result<UrlStats> {
        let record = self.require_record(id).await?;
        Ok(UrlStats {
            url: record.url,
            views: record.views,
        })
    }

    /// 按 URL 读取统计
    ///
    /// 未见过的 URL 会创建一条零访问量记录。
    pub async fn get_stats_by_url(&self, raw_url: &str) -> Result<UrlStats> {
        let id = self.resolve_id(raw_url).await?;
        self.get_stats(&id).await
    }

    async fn create_record(&self, raw_url: &str) -> Result<UrlRecord> {
        let record = UrlRecord::new(generate_id(), normalize_url(raw_url), Utc::now());
        self.store.insert_url(&record).await?;
        Ok(record)
    }

    async fn require_record(&self, id: &str) -> Result<UrlRecord> {
        self.store
            .find_url(id)
            .await?
            .ok_or_else(|| ViewCounterError::not_found(URL_ID_NOT_FOUND))
    }
}
