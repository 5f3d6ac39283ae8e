//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::trace;

use super::SeaOrmStorage;
use super::converters::{model_to_session, model_to_url_record};
use crate::errors::{Result, ViewCounterError};
use crate::storage::{SessionRecord, UrlRecord};

use migration::entities::{session, url_record};

impl SeaOrmStorage {
    pub async fn get_url_record(&self, id: &str) -> Result<Option<UrlRecord>> {
        let model = url_record::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ViewCounterError::database_operation(format!("查询 URL 记录失败: {}", e)))?;

        Ok(model.map(model_to_url_record))
    }

    /// 按规范化 URL 查找（最早创建的优先）
    pub async fn get_url_record_by_url(&self, url: &str) -> Result<Option<UrlRecord>> {
        let model = url_record::Entity::find()
            .filter(url_record::Column::Url.eq(url))
            .order_by_asc(url_record::Column::CreatedAt)
            .order_by_asc(url_record::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| {
                ViewCounterError::database_operation(format!("按 URL 查询记录失败: {}", e))
            })?;

        trace!("Lookup by url '{}': found={}", url, model.is_some());
        Ok(model.map(model_to_url_record))
    }

    pub async fn get_session_record(&self, key: &str) -> Result<Option<SessionRecord>> {
        let model = session::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ViewCounterError::database_operation(format!("查询会话失败: {}", e)))?;

        Ok(model.map(model_to_session))
    }

    pub async fn count_url_records(&self) -> Result<u64> {
        url_record::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| ViewCounterError::database_operation(format!("统计 URL 数量失败: {}", e)))
    }
}
