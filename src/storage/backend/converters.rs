use chrono::{DateTime, Utc};

use crate::storage::{SessionRecord, UrlRecord};
use migration::entities::{session, url_record};

/// 将 Sea-ORM Model 转换为 UrlRecord
pub fn model_to_url_record(model: url_record::Model) -> UrlRecord {
    UrlRecord {
        id: model.id,
        url: model.url,
        views: model.views.max(0) as u64,
        created_at: model.created_at,
    }
}

/// 将 UrlRecord 转换为 ActiveModel（仅用于插入）
pub fn url_record_to_active_model(record: &UrlRecord) -> url_record::ActiveModel {
    use sea_orm::ActiveValue::Set;

    url_record::ActiveModel {
        id: Set(record.id.clone()),
        url: Set(record.url.clone()),
        views: Set(record.views.min(i64::MAX as u64) as i64),
        created_at: Set(record.created_at),
    }
}

pub fn model_to_session(model: session::Model) -> SessionRecord {
    SessionRecord {
        key: model.id,
        last_view_time: model.last_view_time,
    }
}

pub fn session_to_active_model(key: &str, at: DateTime<Utc>) -> session::ActiveModel {
    use sea_orm::ActiveValue::Set;

    session::ActiveModel {
        id: Set(key.to_string()),
        last_view_time: Set(at),
    }
}
