use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, Clone)]
pub enum ViewCounterError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    NotFound(String),
    Serialization(String),
}

impl ViewCounterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ViewCounterError::DatabaseConfig(_) => "E001",
            ViewCounterError::DatabaseConnection(_) => "E002",
            ViewCounterError::DatabaseOperation(_) => "E003",
            ViewCounterError::FileOperation(_) => "E004",
            ViewCounterError::NotFound(_) => "E005",
            ViewCounterError::Serialization(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ViewCounterError::DatabaseConfig(_) => "Database Configuration Error",
            ViewCounterError::DatabaseConnection(_) => "Database Connection Error",
            ViewCounterError::DatabaseOperation(_) => "Database Operation Error",
            ViewCounterError::FileOperation(_) => "File Operation Error",
            ViewCounterError::NotFound(_) => "Resource Not Found",
            ViewCounterError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ViewCounterError::DatabaseConfig(msg)
            | ViewCounterError::DatabaseConnection(msg)
            | ViewCounterError::DatabaseOperation(msg)
            | ViewCounterError::FileOperation(msg)
            | ViewCounterError::NotFound(msg)
            | ViewCounterError::Serialization(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式启动失败时）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewCounterError::NotFound(_))
    }
}

impl fmt::Display for ViewCounterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ViewCounterError {}

// 便捷的构造函数
impl ViewCounterError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ViewCounterError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ViewCounterError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ViewCounterError::DatabaseOperation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ViewCounterError::NotFound(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ViewCounterError {
    fn from(err: sea_orm::DbErr) -> Self {
        ViewCounterError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ViewCounterError {
    fn from(err: std::io::Error) -> Self {
        ViewCounterError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ViewCounterError {
    fn from(err: serde_json::Error) -> Self {
        ViewCounterError::Serialization(err.to_string())
    }
}

/// 404 响应体，与 `{"detail": "..."}` 保持一致
#[derive(Serialize)]
struct ErrorDetail<'a> {
    detail: &'a str,
}

impl ResponseError for ViewCounterError {
    fn status_code(&self) -> StatusCode {
        match self {
            ViewCounterError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ViewCounterError::NotFound(msg) => {
                HttpResponse::NotFound().json(ErrorDetail { detail: msg })
            }
            // 存储层故障不做特殊处理，也不向客户端暴露细节
            _ => HttpResponse::InternalServerError()
                .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                .body("Internal Server Error"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewCounterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ViewCounterError::not_found("URL ID not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.is_not_found());
        assert_eq!(err.message(), "URL ID not found");
    }

    #[test]
    fn test_store_errors_map_to_500() {
        for err in [
            ViewCounterError::database_connection("down"),
            ViewCounterError::database_operation("boom"),
            ViewCounterError::database_config("bad url"),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!err.is_not_found());
        }
    }

    #[test]
    fn test_format_simple() {
        let err = ViewCounterError::not_found("URL ID not found");
        assert_eq!(err.format_simple(), "Resource Not Found: URL ID not found");
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ViewCounterError::database_config(""),
            ViewCounterError::database_connection(""),
            ViewCounterError::database_operation(""),
            ViewCounterError::FileOperation(String::new()),
            ViewCounterError::not_found(""),
            ViewCounterError::Serialization(String::new()),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ViewCounterError = io.into();
        assert!(matches!(err, ViewCounterError::FileOperation(_)));
    }
}
