use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 被统计访问量的 URL 记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: String,
    /// 规范化后的 URL
    pub url: String,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// 新建一条零访问量的记录
    pub fn new(id: String, url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            url,
            views: 0,
            created_at,
        }
    }
}

/// 某客户端对某 URL 最近一次被计数的访问
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub key: String,
    pub last_view_time: DateTime<Utc>,
}

/// 会话主键：`{client_key}_{url_id}`
#[inline]
pub fn session_key(client_key: &str, url_id: &str) -> String {
    format!("{}_{}", client_key, url_id)
}
