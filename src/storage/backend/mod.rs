//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::warn;

use super::{BackendKind, SessionRecord, UrlRecord, ViewStore};
use crate::config::DatabaseConfig;
use crate::errors::{Result, ViewCounterError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{
    model_to_session, model_to_url_record, session_to_active_model, url_record_to_active_model,
};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<BackendKind> {
    if database_url.is_empty() {
        return Err(ViewCounterError::database_config("DATABASE_URL 未设置"));
    }

    if database_url.starts_with("memory://") {
        Ok(BackendKind::Memory)
    } else if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok(BackendKind::Sqlite)
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok(BackendKind::MySql)
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok(BackendKind::Postgres)
    } else {
        Err(ViewCounterError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://, memory://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    kind: BackendKind,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, kind: BackendKind) -> Result<Self> {
        // 根据不同数据库类型配置连接选项
        let db = match kind {
            BackendKind::Sqlite => connect_sqlite(&config.database_url).await?,
            BackendKind::MySql | BackendKind::Postgres => connect_generic(config, kind).await?,
            BackendKind::Memory => {
                return Err(ViewCounterError::database_config(
                    "memory:// 不是 SeaORM 后端",
                ));
            }
        };

        let storage = Self::from_connection(db, kind);

        // 建表
        run_migrations(&storage.db).await?;

        warn!("{} Storage initialized.", kind.as_str().to_uppercase());
        Ok(storage)
    }

    /// 使用已建立（且已迁移）的连接构造
    pub fn from_connection(db: DatabaseConnection, kind: BackendKind) -> Self {
        Self { db, kind }
    }
}

#[async_trait]
impl ViewStore for SeaOrmStorage {
    fn backend_name(&self) -> &str {
        self.kind.as_str()
    }

    async fn insert_url(&self, record: &UrlRecord) -> Result<()> {
        self.insert_url_record(record).await
    }

    async fn find_url(&self, id: &str) -> Result<Option<UrlRecord>> {
        self.get_url_record(id).await
    }

    async fn find_url_by_normalized(&self, url: &str) -> Result<Option<UrlRecord>> {
        self.get_url_record_by_url(url).await
    }

    async fn increment_views(&self, id: &str) -> Result<u64> {
        self.increment_url_views(id).await
    }

    async fn get_session(&self, key: &str) -> Result<Option<SessionRecord>> {
        self.get_session_record(key).await
    }

    async fn upsert_session(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        self.upsert_session_record(key, at).await
    }

    async fn count_urls(&self) -> Result<u64> {
        self.count_url_records().await
    }

    async fn close(&self) -> Result<()> {
        self.db.clone().close().await.map_err(|e| {
            ViewCounterError::database_connection(format!("关闭数据库连接失败: {}", e))
        })
    }
}
