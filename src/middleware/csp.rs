use crate::core::config::CspConfig;
use crate::core::manager::{PolicyManager, RequestPolicy};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Gives every request its own [`PolicyManager`] and writes the
/// accumulated policy header onto the response.
#[derive(Clone)]
pub struct CspMiddleware {
    config: CspConfig,
}

impl CspMiddleware {
    #[inline]
    pub fn new(config: CspConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &CspConfig {
        &self.config
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CspMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct CspMiddlewareService<S> {
    service: Rc<S>,
    config: CspConfig,
}

impl<S, B> Service<ServiceRequest> for CspMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4();
            config.stats().increment_request_count();

            let policy = RequestPolicy::new(PolicyManager::new(&config));
            req.extensions_mut().insert(policy.clone());

            let mut res = service.call(req).await?;

            let mut manager = policy.lock();
            if !manager.settings().enabled {
                log::debug!("[{}] CSP disabled, no header emitted", request_id);
                return Ok(res);
            }

            if let Err(e) = manager.apply_settings() {
                log::warn!("[{}] Failed to merge CSP settings: {}", request_id, e);
                config.stats().increment_suppressed_header_count();
                return Ok(res);
            }

            let header = manager.header();
            drop(manager);

            if header.is_empty() {
                log::debug!("[{}] Empty policy, no header emitted", request_id);
                config.stats().increment_suppressed_header_count();
                return Ok(res);
            }

            match header.into_header_pair() {
                Ok((name, value)) => {
                    log::debug!("[{}] Emitting {}", request_id, name);
                    res.headers_mut().insert(name, value);
                    config.stats().increment_header_count();
                }
                Err(e) => {
                    log::warn!("[{}] Dropping unrepresentable CSP header: {}", request_id, e);
                    config.stats().increment_suppressed_header_count();
                }
            }

            Ok(res)
        })
    }
}

#[inline]
pub fn csp_middleware(config: CspConfig) -> CspMiddleware {
    CspMiddleware::new(config)
}
