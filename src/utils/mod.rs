pub mod ip;
pub mod url;

pub use ip::client_key;
pub use url::normalize_url;

/// 生成新的 URL 记录 ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
