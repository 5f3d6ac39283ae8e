//! URL normalization
//!
//! Two raw URLs that normalize to the same string are counted as the same
//! resource.

/// 规范化 URL：去掉开头的 `http://` 或 `https://`（仅一次，区分大小写），
/// 再去掉末尾所有的 `/`。不做其他处理。
#[inline]
pub fn normalize_url(raw: &str) -> String {
    let without_scheme = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);

    without_scheme.trim_end_matches('/').to_string()
}
