//! HTTP access log middleware
//!
//! Emits one line per finished request on the `access` target:
//! `GET /abc123 302 - IP: 203.0.113.7 (0.41ms)`. Lines go through the
//! regular tracing pipeline, so the file writer's non-blocking queue applies.

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::Instant;

use crate::system::logging::ACCESS_LOG_TARGET;
use crate::utils::ip::extract_client_ip;

/// Access log middleware factory
#[derive(Clone, Default)]
pub struct AccessLog;

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService {
            service: Rc::new(service),
        }))
    }
}

pub struct AccessLogService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();

        let method = req.method().to_string();
        let path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.path().to_string());
        let ip = extract_client_ip(&req);

        Box::pin(async move {
            let result = srv.call(req).await;

            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(e) => e.as_response_error().status_code().as_u16(),
            };
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            tracing::info!(
                target: ACCESS_LOG_TARGET,
                "{} {} {} - IP: {} ({:.2}ms)",
                method,
                path,
                status,
                ip,
                elapsed_ms
            );

            result
        })
    }
}
