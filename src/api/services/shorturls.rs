use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::{info, warn};

use super::types::{
    CreateShortUrlRequest, CreateShortUrlResponse, LinkListItem, LinkStatsResponse, iso_timestamp,
};
use crate::api::PublicBase;
use crate::errors::{LinkstatError, Result};
use crate::storage::RecordStore;

pub struct ShortUrlService;

impl ShortUrlService {
    /// `POST /shorturls`
    pub async fn create(
        body: web::Json<CreateShortUrlRequest>,
        store: web::Data<Arc<RecordStore>>,
        base: web::Data<PublicBase>,
    ) -> Result<HttpResponse> {
        let req = body.into_inner();

        let result = Self::validate_request(&req).and_then(|(url, validity)| {
            store
                .create(url, validity, req.shortcode.as_deref())
                .map(|created| (url, created))
        });

        let (url, created) = match result {
            Ok(ok) => ok,
            Err(e) => {
                warn!("Short URL creation failed: {}", e.message());
                return Err(e);
            }
        };

        let shortlink = base.shortlink(&created.code);
        info!("Short URL created: {} -> {}", shortlink, url);

        Ok(HttpResponse::Created().json(CreateShortUrlResponse {
            shortlink,
            expiry: iso_timestamp(created.expires_at),
        }))
    }

    /// 请求体校验：url 必填，validity 只接受正整数分钟（缺省交给 store 使用默认值）
    fn validate_request(req: &CreateShortUrlRequest) -> Result<(&str, Option<i64>)> {
        let url = req
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| LinkstatError::invalid_request("Missing required field: url"))?;

        let validity = match &req.validity {
            None => None,
            Some(number) => match number.as_i64() {
                Some(minutes) if minutes > 0 => Some(minutes),
                _ => {
                    return Err(LinkstatError::invalid_validity(
                        "Validity must be a positive integer (minutes)",
                    ));
                }
            },
        };

        Ok((url, validity))
    }

    /// `GET /shorturls/{shortcode}`
    pub async fn stats(
        path: web::Path<String>,
        store: web::Data<Arc<RecordStore>>,
    ) -> Result<HttpResponse> {
        let code = path.into_inner();
        let Some(record) = store.get(&code) else {
            warn!("Stats retrieval failed: shortcode not found - {}", code);
            return Err(LinkstatError::not_found("Shortcode not found"));
        };

        info!("Stats request for shortcode: {}", code);
        let expired = store.is_expired(&code);
        Ok(HttpResponse::Ok().json(LinkStatsResponse::from_record(&record, expired)))
    }

    /// `GET /shorturls`
    pub async fn list(
        store: web::Data<Arc<RecordStore>>,
        base: web::Data<PublicBase>,
    ) -> HttpResponse {
        let items: Vec<LinkListItem> = store
            .list_all()
            .iter()
            .map(|summary| LinkListItem::new(summary, base.shortlink(&summary.record.code)))
            .collect();

        info!("Stats summary requested. Total entries: {}", items.len());
        HttpResponse::Ok().json(items)
    }
}

/// `/shorturls` 路由配置
pub fn shorturl_routes() -> actix_web::Scope {
    web::scope("/shorturls")
        .service(
            web::resource(["", "/"])
                .route(web::post().to(ShortUrlService::create))
                .route(web::get().to(ShortUrlService::list))
                .default_service(web::to(crate::api::route_not_found)),
        )
        .service(
            web::resource("/{shortcode}")
                .route(web::get().to(ShortUrlService::stats))
                .default_service(web::to(crate::api::route_not_found)),
        )
}
