pub mod csp;
pub mod extensions;
#[cfg(feature = "reporting")]
pub mod reporting;

pub use csp::{csp_middleware, CspMiddleware, CspMiddlewareService};
pub use extensions::CspExtensions;
#[cfg(feature = "reporting")]
pub use reporting::{
    csp_reporting_middleware, CspReportingMiddleware, CspReportingMiddlewareService,
};
