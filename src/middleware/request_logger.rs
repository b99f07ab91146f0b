use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::debug;
use uuid::Uuid;

const TENANT_PREFIX: &str = "/api/tenants/";

/// Response header carrying the per-request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags every response with a fresh request ID and, when debug logging is
/// enabled, logs each request with its tenant and latency
pub struct RequestLogger {
    enable_debug_logging: bool,
}

impl RequestLogger {
    pub fn new(enable_debug_logging: bool) -> Self {
        Self {
            enable_debug_logging,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggerMiddleware {
            service: Rc::new(service),
            enable_debug_logging: self.enable_debug_logging,
        })
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: Rc<S>,
    enable_debug_logging: bool,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let enable_debug_logging = self.enable_debug_logging;
        let request_id = Uuid::new_v4().to_string();

        let started = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let tenant = tenant_from_path(&path).unwrap_or("-").to_owned();
        if enable_debug_logging {
            debug!(
                "Processing request {}: {} {} (tenant {})",
                request_id, method, path, tenant
            );
        }

        Box::pin(async move {
            let mut res = service.call(req).await?;
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }

            if enable_debug_logging {
                debug!(
                    "Response {}: {} {} (tenant {}) - status: {} in {:?}",
                    request_id,
                    method,
                    path,
                    tenant,
                    res.status(),
                    started.elapsed()
                );
            }
            Ok(res)
        })
    }
}

/// Extracts the tenant segment from `/api/tenants/{tenant}/...`
fn tenant_from_path(path: &str) -> Option<&str> {
    path.strip_prefix(TENANT_PREFIX)?
        .split('/')
        .next()
        .filter(|tenant| !tenant.is_empty())
}
