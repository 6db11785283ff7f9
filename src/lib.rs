pub mod constants;
pub mod core;
pub mod error;
pub mod middleware;
pub mod monitoring;
pub mod prelude;
pub mod security;

// Re-export commonly used types for convenience
pub use core::{
    BuilderFactory, BuilderRegistry, ContentSecurityPolicyHeaderBuilder, CspConfig,
    CspConfigBuilder, CspSettings, Directive, DirectiveTable, HeaderBuilder, InlineScript,
    PolicyHeader, PolicyManager, Preset, ReportingMode, RequestPolicy, ScriptMethod, Source,
};
pub use error::CspError;
pub use middleware::{csp_middleware, CspExtensions, CspMiddleware};
#[cfg(feature = "reporting")]
pub use middleware::{csp_reporting_middleware, CspReportingMiddleware};
pub use monitoring::{CspStats, CspViolationReport};
pub use security::{HashAlgorithm, InlineScriptHasher, NonceGenerator, NonceProvider};
