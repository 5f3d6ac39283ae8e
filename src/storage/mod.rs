//! Persistence for URL records and view sessions
//!
//! `ViewStore` is the seam the service layer talks to. Two implementations
//! exist: `SeaOrmStorage` (SQLite, MySQL/MariaDB, PostgreSQL) and
//! `MemoryStore` (process-local, selected with `memory://`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStore;
pub use models::{SessionRecord, UrlRecord, session_key};

/// 两个集合（urls / sessions）的存取接口
///
/// 所有方法都是单次原子操作；多步操作之间不提供事务保证。
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// 后端名称（sqlite / mysql / postgres / memory）
    fn backend_name(&self) -> &str;

    /// 插入新记录，不检查是否已有相同 URL
    async fn insert_url(&self, record: &UrlRecord) -> Result<()>;

    async fn find_url(&self, id: &str) -> Result<Option<UrlRecord>>;

    /// 按规范化 URL 查找；存在多条时返回最早创建的一条
    async fn find_url_by_normalized(&self, url: &str) -> Result<Option<UrlRecord>>;

    /// 原子地将访问量 +1，返回自增后的值；记录不存在时返回 NotFound
    async fn increment_views(&self, id: &str) -> Result<u64>;

    async fn get_session(&self, key: &str) -> Result<Option<SessionRecord>>;

    /// 原子 upsert 会话的最近计数时间
    async fn upsert_session(&self, key: &str, at: DateTime<Utc>) -> Result<()>;

    async fn count_urls(&self) -> Result<u64>;

    /// 关闭底层连接（进程退出前调用）
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// 存储后端类型，由连接串推断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    MySql,
    Postgres,
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::MySql => "mysql",
            BackendKind::Postgres => "postgres",
            BackendKind::Memory => "memory",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct StorageFactory;

impl StorageFactory {
    /// 根据给定的数据库配置创建存储
    pub async fn create_from_config(config: &DatabaseConfig) -> Result<Arc<dyn ViewStore>> {
        // 从 URL 自动推断数据库类型
        let kind = backend::infer_backend_from_url(&config.database_url)?;

        match kind {
            BackendKind::Memory => {
                warn!("MEMORY Storage initialized. Data is lost on exit.");
                Ok(Arc::new(MemoryStore::new()))
            }
            _ => {
                let storage = SeaOrmStorage::new(config, kind).await?;
                Ok(Arc::new(storage))
            }
        }
    }
}
