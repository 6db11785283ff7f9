use crate::constants::DEFAULT_MAX_REPORT_SIZE;
use crate::core::config::CspConfig;
use crate::monitoring::report::CspViolationReport;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, FromRequest, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};

type ViolationHandler = Arc<dyn Fn(CspViolationReport) + Send + Sync + 'static>;

/// Receives violation reports POSTed to the configured report path.
///
/// The path is read from the settings on every request, so it follows
/// [`CspConfig::reload`].
pub struct CspReportingMiddleware {
    config: CspConfig,
    handler: ViolationHandler,
    max_report_size: usize,
}

impl CspReportingMiddleware {
    pub fn new<F>(config: CspConfig, handler: F) -> Self
    where
        F: Fn(CspViolationReport) + Send + Sync + 'static,
    {
        Self {
            config,
            handler: Arc::new(handler),
            max_report_size: DEFAULT_MAX_REPORT_SIZE,
        }
    }

    #[inline]
    pub fn with_max_report_size(mut self, size: usize) -> Self {
        self.max_report_size = size;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspReportingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CspReportingMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspReportingMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
            handler: self.handler.clone(),
            max_report_size: self.max_report_size,
        }))
    }
}

pub struct CspReportingMiddlewareService<S> {
    service: Rc<S>,
    config: CspConfig,
    handler: ViolationHandler,
    max_report_size: usize,
}

impl<S, B> Service<ServiceRequest> for CspReportingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_report = req.method() == &Method::POST
            && req.path() == self.config.settings().report_path;

        if !is_report {
            let service = self.service.clone();
            return Box::pin(async move {
                let res = service.call(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        let handler = self.handler.clone();
        let stats = self.config.stats().clone();
        let max_size = self.max_report_size;

        Box::pin(async move {
            let (http_req, mut payload) = req.into_parts();
            let body = web::Bytes::from_request(&http_req, &mut payload).await?;
            if body.len() > max_size {
                log::warn!("Rejecting CSP report of {} bytes", body.len());
                let response = HttpResponse::PayloadTooLarge().finish().map_into_right_body();
                return Ok(ServiceResponse::new(http_req, response));
            }

            match CspViolationReport::from_body(&body) {
                Ok(Some(report)) => {
                    log::info!(
                        "CSP violation of '{}' by '{}' on {}",
                        report.violated_directive,
                        report.blocked_uri,
                        report.document_uri
                    );
                    stats.increment_violation_count();
                    handler(report);
                }
                Ok(None) => {
                    log::debug!("CSP violation report missing 'csp-report' field");
                }
                Err(e) => {
                    log::error!("Failed to process CSP violation report: {}", e);
                }
            }

            let response = HttpResponse::NoContent().finish().map_into_right_body();
            Ok(ServiceResponse::new(http_req, response))
        })
    }
}

#[inline]
pub fn csp_reporting_middleware<F>(config: CspConfig, handler: F) -> CspReportingMiddleware
where
    F: Fn(CspViolationReport) + Send + Sync + 'static,
{
    CspReportingMiddleware::new(config, handler)
}
