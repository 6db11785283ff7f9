pub mod builder;
pub mod config;
pub mod directives;
pub mod manager;
pub mod source;

pub use builder::{
    BuilderFactory, BuilderOptions, BuilderRegistry, ContentSecurityPolicyHeaderBuilder,
    HeaderBuilder, PolicyHeader, ReportingMode,
};
pub use config::{CspConfig, CspConfigBuilder, CspSettings, Preset, RuleSources, ScriptMethod};
pub use directives::{Directive, DirectiveTable};
pub use manager::{InlineScript, PolicyManager, RequestPolicy};
pub use source::Source;
