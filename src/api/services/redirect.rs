use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use tracing::{info, trace, warn};

use crate::errors::LinkstatError;
use crate::storage::{DEFAULT_GEO, DEFAULT_REFERRER, RecordStore};
use crate::utils::is_valid_short_code;

pub struct RedirectService;

impl RedirectService {
    /// `GET /{shortcode}`
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        store: web::Data<Arc<RecordStore>>,
    ) -> HttpResponse {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            // 非法短码，直接 404（不进 store）
            trace!("Invalid short code rejected: {}", code);
            return Self::failure(&code, LinkstatError::not_found("Shortcode not found"));
        }

        let referrer = Self::referrer(&req);
        match store.visit(&code, referrer, DEFAULT_GEO) {
            Ok(target) => {
                info!("Redirect: {} clicked. Referrer: {}", code, referrer);
                HttpResponse::build(StatusCode::FOUND)
                    .insert_header((header::LOCATION, target))
                    .finish()
            }
            Err(e) => Self::failure(&code, e),
        }
    }

    fn failure(code: &str, err: LinkstatError) -> HttpResponse {
        match err {
            LinkstatError::Expired(_) => {
                warn!("Redirect failed: shortcode expired - {}", code)
            }
            LinkstatError::NotFound(_) => {
                warn!("Redirect failed: shortcode not found - {}", code)
            }
            ref other => warn!("Redirect failed for {}: {}", code, other),
        }
        err.error_response()
    }

    /// `Referer`（或拼写正确的 `Referrer`），缺省为 "direct"
    fn referrer(req: &HttpRequest) -> &str {
        [header::REFERER.as_str(), "referrer"]
            .into_iter()
            .filter_map(|name| req.headers().get(name))
            .filter_map(|value| value.to_str().ok())
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_REFERRER)
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("").service(
        web::resource("/{shortcode}")
            .route(web::get().to(RedirectService::handle_redirect))
            .default_service(web::to(crate::api::route_not_found)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_referrer_defaults_to_direct() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(RedirectService::referrer(&req), "direct");
    }

    #[test]
    fn test_referrer_prefers_referer_header() {
        let req = TestRequest::default()
            .insert_header(("Referer", "https://news.example/item"))
            .insert_header(("Referrer", "https://other.example"))
            .to_http_request();
        assert_eq!(RedirectService::referrer(&req), "https://news.example/item");
    }

    #[test]
    fn test_referrer_falls_back_to_referrer_spelling() {
        let req = TestRequest::default()
            .insert_header(("Referrer", "https://other.example"))
            .to_http_request();
        assert_eq!(RedirectService::referrer(&req), "https://other.example");
    }

    #[test]
    fn test_blank_referer_counts_as_direct() {
        let req = TestRequest::default()
            .insert_header(("Referer", "   "))
            .to_http_request();
        assert_eq!(RedirectService::referrer(&req), "direct");
    }
}
