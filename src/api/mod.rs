//! HTTP surface
//!
//! Thin request/response translation over the [`RecordStore`]. The store and
//! the public base URL are injected as `web::Data` by [`configure`]'s caller.
//!
//! [`RecordStore`]: crate::storage::RecordStore

pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::warn;

use crate::errors::LinkstatError;
use services::{redirect_routes, shorturl_routes};

/// Externally visible origin that shortlinks are built from.
#[derive(Debug, Clone)]
pub struct PublicBase(Arc<str>);

impl PublicBase {
    pub fn new(base: impl AsRef<str>) -> Self {
        Self(Arc::from(base.as_ref().trim_end_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn shortlink(&self, code: &str) -> String {
        format!("{}/{}", self.0, code)
    }
}

/// JSON 解析失败统一返回 400 `{error}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            warn!("Rejected request body: {}", err);
            LinkstatError::invalid_request(format!("Invalid JSON body: {}", err)).into()
        })
}

/// Fallback for anything no route matched.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    warn!("404 Not Found: {} {}", req.method(), req.uri());
    HttpResponse::NotFound().json(json!({ "error": "Not Found" }))
}

/// Register every route plus the JSON extractor config.
///
/// `/shorturls` must be registered before the catch-all `/{shortcode}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(shorturl_routes())
        .service(redirect_routes())
        .default_service(web::to(route_not_found));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_base_trims_trailing_slash() {
        let base = PublicBase::new("https://sho.rt/");
        assert_eq!(base.as_str(), "https://sho.rt");
        assert_eq!(base.shortlink("abc123"), "https://sho.rt/abc123");
    }
}
