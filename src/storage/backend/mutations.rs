//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations. Each one is a single
//! statement; nothing here opens a transaction.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, EntityTrait, ExprTrait, QueryFilter};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{session_to_active_model, url_record_to_active_model};
use crate::errors::{Result, ViewCounterError};
use crate::storage::UrlRecord;

use migration::entities::{session, url_record};

impl SeaOrmStorage {
    pub async fn insert_url_record(&self, record: &UrlRecord) -> Result<()> {
        url_record::Entity::insert(url_record_to_active_model(record))
            .exec(&self.db)
            .await
            .map_err(|e| {
                ViewCounterError::database_operation(format!(
                    "插入 URL 记录 '{}' 失败 (url: {}): {}",
                    record.id,
                    truncate_for_log(&record.url),
                    e
                ))
            })?;

        info!("URL record created: {} -> {}", record.id, truncate_for_log(&record.url));
        Ok(())
    }

    /// `UPDATE urls SET views = views + 1 WHERE id = ?`，然后读回新值
    pub async fn increment_url_views(&self, id: &str) -> Result<u64> {
        let result = url_record::Entity::update_many()
            .col_expr(
                url_record::Column::Views,
                Expr::col(url_record::Column::Views).add(Expr::val(1i64)),
            )
            .filter(url_record::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                ViewCounterError::database_operation(format!("更新访问量失败 ({}): {}", id, e))
            })?;

        if result.rows_affected == 0 {
            return Err(ViewCounterError::not_found("URL ID not found"));
        }

        let record = self
            .get_url_record(id)
            .await?
            .ok_or_else(|| ViewCounterError::not_found("URL ID not found"))?;

        debug!("Views incremented: {} -> {}", id, record.views);
        Ok(record.views)
    }

    /// 使用 ON CONFLICT 的原子 upsert
    pub async fn upsert_session_record(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        session::Entity::insert(session_to_active_model(key, at))
            .on_conflict(
                OnConflict::column(session::Column::Id)
                    .update_column(session::Column::LastViewTime)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                ViewCounterError::database_operation(format!("Upsert 会话 '{}' 失败: {}", key, e))
            })?;

        debug!("Session upserted: {}", key);
        Ok(())
    }
}

fn truncate_for_log(url: &str) -> String {
    if url.chars().count() > 50 {
        format!("{}...", url.chars().take(50).collect::<String>())
    } else {
        url.to_string()
    }
}
