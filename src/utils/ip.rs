//! 客户端标识提取
//!
//! 去重使用服务器看到的 TCP 对端 IP，不解析 X-Forwarded-For 等代理头。

use actix_web::HttpRequest;

/// 无法获取对端地址时使用的客户端标识
pub const UNKNOWN_CLIENT: &str = "unknown";

/// 从请求中提取客户端标识（对端 IP，不含端口）
pub fn client_key(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
