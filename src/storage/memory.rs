//! Process-local store
//!
//! Selected with `memory://`. Data lives only as long as the process; useful
//! for local runs and tests that don't need a database file.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{SessionRecord, UrlRecord, ViewStore};
use crate::errors::{Result, ViewCounterError};

#[derive(Default, Clone)]
pub struct MemoryStore {
    urls: Arc<DashMap<String, UrlRecord>>,
    sessions: Arc<DashMap<String, DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewStore for MemoryStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn insert_url(&self, record: &UrlRecord) -> Result<()> {
        // 与数据库主键约束一致：重复 id 视为写入失败
        match self.urls.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(ViewCounterError::database_operation(format!(
                "URL 记录已存在: {}",
                record.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find_url(&self, id: &str) -> Result<Option<UrlRecord>> {
        Ok(self.urls.get(id).map(|r| r.value().clone()))
    }

    async fn find_url_by_normalized(&self, url: &str) -> Result<Option<UrlRecord>> {
        let found = self
            .urls
            .iter()
            .filter(|r| r.value().url == url)
            .map(|r| r.value().clone())
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn increment_views(&self, id: &str) -> Result<u64> {
        // get_mut 持有分片写锁，自增是原子的
        let mut record = self
            .urls
            .get_mut(id)
            .ok_or_else(|| ViewCounterError::not_found("URL ID not found"))?;
        record.views = record.views.saturating_add(1);
        Ok(record.views)
    }

    async fn get_session(&self, key: &str) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.get(key).map(|entry| SessionRecord {
            key: key.to_string(),
            last_view_time: *entry.value(),
        }))
    }

    async fn upsert_session(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        self.sessions.insert(key.to_string(), at);
        Ok(())
    }

    async fn count_urls(&self) -> Result<u64> {
        Ok(self.urls.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str, url: &str, created_at: DateTime<Utc>) -> UrlRecord {
        UrlRecord::new(id.to_string(), url.to_string(), created_at)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        store
            .insert_url(&record("a", "x.com", Utc::now()))
            .await
            .unwrap();

        let found = store.find_url("a").await.unwrap().unwrap();
        assert_eq!(found.url, "x.com");
        assert!(store.find_url("b").await.unwrap().is_none());
        assert_eq!(store.count_urls().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        let r = record("a", "x.com", Utc::now());
        store.insert_url(&r).await.unwrap();
        assert!(store.insert_url(&r).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_normalized_prefers_oldest() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert_url(&record("newer", "x.com", now))
            .await
            .unwrap();
        store
            .insert_url(&record("older", "x.com", now - Duration::seconds(10)))
            .await
            .unwrap();

        let found = store.find_url_by_normalized("x.com").await.unwrap().unwrap();
        assert_eq!(found.id, "older");
        assert!(store.find_url_by_normalized("y.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_views() {
        let store = MemoryStore::new();
        store
            .insert_url(&record("a", "x.com", Utc::now()))
            .await
            .unwrap();

        assert_eq!(store.increment_views("a").await.unwrap(), 1);
        assert_eq!(store.increment_views("a").await.unwrap(), 2);
        assert!(store.increment_views("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_session_upsert_overwrites() {
        let store = MemoryStore::new();
        let t1 = Utc::now();
        let t2 = t1 + Duration::minutes(6);

        assert!(store.get_session("k").await.unwrap().is_none());
        store.upsert_session("k", t1).await.unwrap();
        store.upsert_session("k", t2).await.unwrap();

        let session = store.get_session("k").await.unwrap().unwrap();
        assert_eq!(session.last_view_time, t2);
        assert_eq!(store.sessions.len(), 1);
    }
}
