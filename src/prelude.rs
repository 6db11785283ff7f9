pub use crate::core::{
    CspConfig, CspConfigBuilder, CspSettings, HeaderBuilder, PolicyManager, Preset,
    RequestPolicy, ScriptMethod, Source,
};
pub use crate::middleware::{csp_middleware, CspExtensions, CspMiddleware};
pub use crate::monitoring::{CspStats, CspViolationReport};
pub use crate::security::HashAlgorithm;
