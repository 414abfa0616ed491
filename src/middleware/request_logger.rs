use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::debug;
use uuid::Uuid;

use crate::utils::client_identifier;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Stamps every response with a fresh `X-Request-ID`. When enabled it also
/// traces each request at debug level with the caller's throttle bucket and
/// the time spent handling it.
pub struct RequestLogger {
    enabled: bool,
}

impl RequestLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
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
            enabled: self.enabled,
        })
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: Rc<S>,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let request_id = Uuid::new_v4().to_string();

        if !self.enabled {
            return Box::pin(async move {
                let mut res = service.call(req).await?;
                stamp_request_id(&mut res, &request_id);
                Ok(res)
            });
        }

        let method = req.method().clone();
        let path = req.path().to_owned();
        let caller = client_identifier(req.headers());
        let started = Instant::now();
        debug!("--> [{}] {} {} from '{}'", request_id, method, path, caller);

        Box::pin(async move {
            let mut res = service.call(req).await?;
            stamp_request_id(&mut res, &request_id);
            debug!(
                "<-- [{}] {} {} {} in {}ms",
                request_id,
                method,
                path,
                res.status(),
                started.elapsed().as_millis()
            );
            Ok(res)
        })
    }
}

fn stamp_request_id<B>(res: &mut ServiceResponse<B>, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
}
