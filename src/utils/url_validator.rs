//! URL 验证模块
//!
//! 只接受可解析的绝对 http(s) URL

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => f.write_str("empty URL"),
            Self::InvalidProtocol(scheme) => write!(f, "unsupported scheme {}", scheme),
            Self::MissingHost => f.write_str("no host"),
            Self::InvalidFormat(reason) => write!(f, "unparsable URL ({})", reason),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证目标 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 能被解析为绝对 URL
/// 3. scheme 为 http 或 https
/// 4. 包含 host
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

#[inline]
pub fn is_valid_url(url: &str) -> bool {
    validate_url(url).is_ok()
}

/// 返回给客户端的错误文案
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL is required",
        UrlValidationError::InvalidProtocol(_) => "Invalid URL: only http and https are supported",
        UrlValidationError::MissingHost => "Invalid URL: missing host",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_absolute_http_urls() {
        for url in [
            "http://example.org",
            "https://docs.example.org/guide?page=2#install",
            "http://127.0.0.1:3000/health",
            "HTTPS://Example.ORG",
        ] {
            assert!(validate_url(url).is_ok(), "{}", url);
        }
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        for url in [
            "javascript:void(0)",
            "ftp://files.example.org",
            "mailto:ops@example.org",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(validate_url(url), Err(UrlValidationError::InvalidProtocol(_))),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(
            validate_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("/only/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(!is_valid_url("http://"));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url(" \t"), Err(UrlValidationError::EmptyUrl));
        assert_eq!(
            validation_error_message(&UrlValidationError::EmptyUrl),
            "URL is required"
        );
    }
}
