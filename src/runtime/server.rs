//! HTTP server bootstrap
//!
//! Builds the shared record store from `[links]` and serves the public API
//! with CORS, compression and the access log in front of it.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::AccessLog;
use crate::api::{self, PublicBase};
use crate::config::{CorsConfig, get_config};
use crate::storage::{RecordStore, StoreSettings};

/// 启动时检查一次 CORS 配置
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.enabled && cors_config.allowed_origins.is_empty() {
        warn!("cors.enabled is set but cors.allowed_origins is empty; all cross-origin requests will be refused");
    }
}

fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 关闭时退回同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(cors_config.max_age);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// This function:
/// 1. Creates the process-scoped record store
/// 2. Configures CORS, access logging and routes
/// 3. Serves until actix receives a shutdown signal (SIGINT/SIGTERM)
///
/// **Note**: `init_config` and the logging system must be initialized before
/// calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();
    let store = Arc::new(RecordStore::new(StoreSettings::from(&config.links)));
    let base = PublicBase::new(config.server.public_base());

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let workers = config.server.workers.clamp(1, 32);
    info!(
        "Shortlinks will be issued under {} (default validity {} minutes, {}-char codes)",
        base.as_str(),
        config.links.default_validity_minutes,
        config.links.code_length
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(base.clone()))
            .configure(api::configure)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .wrap(build_cors_middleware(&cors_config))
            .wrap(AccessLog) // 最外层，记录所有请求（含 CORS 拒绝）
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(workers);

    let bind_address = (config.server.host.as_str(), config.server.port);
    info!(
        "URL shortener listening on http://{}:{} with {} workers",
        bind_address.0, bind_address.1, workers
    );

    server.bind(bind_address)?.run().await?;

    info!("Server stopped");
    Ok(())
}
