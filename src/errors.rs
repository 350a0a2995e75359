use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkstatError {
    InvalidUrl(String),
    InvalidValidity(String),
    InvalidShortcode(String),
    InvalidRequest(String),
    ShortcodeInUse(String),
    NotFound(String),
    Expired(String),
    Internal(String),
    Config(String),
}

impl LinkstatError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkstatError::InvalidUrl(_) => "E001",
            LinkstatError::InvalidValidity(_) => "E002",
            LinkstatError::InvalidShortcode(_) => "E003",
            LinkstatError::InvalidRequest(_) => "E004",
            LinkstatError::ShortcodeInUse(_) => "E005",
            LinkstatError::NotFound(_) => "E006",
            LinkstatError::Expired(_) => "E007",
            LinkstatError::Internal(_) => "E008",
            LinkstatError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkstatError::InvalidUrl(_) => "Invalid URL",
            LinkstatError::InvalidValidity(_) => "Invalid Validity",
            LinkstatError::InvalidShortcode(_) => "Invalid Shortcode",
            LinkstatError::InvalidRequest(_) => "Invalid Request",
            LinkstatError::ShortcodeInUse(_) => "Shortcode In Use",
            LinkstatError::NotFound(_) => "Resource Not Found",
            LinkstatError::Expired(_) => "Link Expired",
            LinkstatError::Internal(_) => "Internal Error",
            LinkstatError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkstatError::InvalidUrl(msg) => msg,
            LinkstatError::InvalidValidity(msg) => msg,
            LinkstatError::InvalidShortcode(msg) => msg,
            LinkstatError::InvalidRequest(msg) => msg,
            LinkstatError::ShortcodeInUse(msg) => msg,
            LinkstatError::NotFound(msg) => msg,
            LinkstatError::Expired(msg) => msg,
            LinkstatError::Internal(msg) => msg,
            LinkstatError::Config(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkstatError::InvalidUrl(_)
            | LinkstatError::InvalidValidity(_)
            | LinkstatError::InvalidShortcode(_)
            | LinkstatError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            LinkstatError::ShortcodeInUse(_) => StatusCode::CONFLICT,
            LinkstatError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkstatError::Expired(_) => StatusCode::GONE,
            LinkstatError::Internal(_) | LinkstatError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给客户端的消息，内部错误不暴露细节
    pub fn public_message(&self) -> &str {
        match self {
            LinkstatError::Internal(_) | LinkstatError::Config(_) => "Internal Server Error",
            other => other.message(),
        }
    }

    /// 格式化为简洁输出（用于 CLI 与日志）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkstatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkstatError {}

// 便捷的构造函数
impl LinkstatError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        LinkstatError::InvalidUrl(msg.into())
    }

    pub fn invalid_validity<T: Into<String>>(msg: T) -> Self {
        LinkstatError::InvalidValidity(msg.into())
    }

    pub fn invalid_shortcode<T: Into<String>>(msg: T) -> Self {
        LinkstatError::InvalidShortcode(msg.into())
    }

    pub fn invalid_request<T: Into<String>>(msg: T) -> Self {
        LinkstatError::InvalidRequest(msg.into())
    }

    pub fn shortcode_in_use<T: Into<String>>(msg: T) -> Self {
        LinkstatError::ShortcodeInUse(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkstatError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        LinkstatError::Expired(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        LinkstatError::Internal(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkstatError::Config(msg.into())
    }
}

impl From<config::ConfigError> for LinkstatError {
    fn from(err: config::ConfigError) -> Self {
        LinkstatError::Config(err.to_string())
    }
}

impl ResponseError for LinkstatError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.http_status()).json(json!({ "error": self.public_message() }))
    }
}

pub type Result<T> = std::result::Result<T, LinkstatError>;
