use crate::constants::{DEFAULT_BUILDER, HEADER_CSP, HEADER_CSP_REPORT_ONLY};
use crate::core::directives::{Directive, DirectiveTable};
use crate::core::source::{quote_keyword, Source};
use crate::error::CspError;
use crate::security::hash::{HashAlgorithm, InlineScriptHasher};
use actix_web::http::header::{HeaderName, HeaderValue};
use bytes::Bytes;
use rustc_hash::FxHashMap;
use std::{borrow::Cow, fmt};

/// Enforce or report-only. The only transition is `Enforce -> ReportOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportingMode {
    #[default]
    Enforce,
    ReportOnly,
}

impl ReportingMode {
    #[inline(always)]
    pub const fn header_name(&self) -> &'static str {
        match self {
            ReportingMode::Enforce => HEADER_CSP,
            ReportingMode::ReportOnly => HEADER_CSP_REPORT_ONLY,
        }
    }
}

/// A serialized policy, ready to be written to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyHeader {
    pub name: &'static str,
    pub value: String,
}

impl PolicyHeader {
    /// An empty value means no header must be emitted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    #[inline]
    pub fn to_header_line(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }

    pub fn into_header_pair(self) -> Result<(HeaderName, HeaderValue), CspError> {
        let name = HeaderName::from_bytes(self.name.as_bytes())
            .map_err(|e| CspError::Header(e.to_string()))?;
        let value = HeaderValue::from_maybe_shared(Bytes::from(self.value))
            .map_err(|e| CspError::Header(e.to_string()))?;
        Ok((name, value))
    }
}

/// The operations every policy header builder offers.
///
/// Directives are passed by name because they usually come from
/// configuration; names outside the closed set fail with
/// [`CspError::InvalidDirective`] before anything is mutated.
pub trait HeaderBuilder: Send + fmt::Debug {
    fn add_source_expression(&mut self, directive: &str, expression: &str)
        -> Result<(), CspError>;

    fn add_hash(&mut self, algorithm: &str, script_body: &str) -> Result<(), CspError>;

    fn add_nonce(&mut self, directive: &str, nonce: &str) -> Result<(), CspError>;

    fn reset_directive(&mut self, directive: &str) -> Result<(), CspError>;

    fn use_reporting_mode(&mut self);

    fn get_header(&self) -> PolicyHeader;
}

/// Options handed to every builder constructor.
#[derive(Debug, Clone, Copy)]
pub struct BuilderOptions {
    pub trim_scripts: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self { trim_scripts: true }
    }
}

#[derive(Debug, Default)]
pub struct ContentSecurityPolicyHeaderBuilder {
    directives: DirectiveTable,
    mode: ReportingMode,
    hasher: InlineScriptHasher,
}

impl ContentSecurityPolicyHeaderBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            hasher: InlineScriptHasher::new(options.trim_scripts),
            ..Self::default()
        }
    }

    #[inline]
    pub fn directives(&self) -> &DirectiveTable {
        &self.directives
    }

    #[inline]
    pub fn reporting_mode(&self) -> ReportingMode {
        self.mode
    }

    /// Typed variant of [`HeaderBuilder::add_source_expression`].
    pub fn add_source(&mut self, directive: Directive, source: Source) {
        self.directives.add(directive, source.to_expression());
    }

    fn boxed(options: BuilderOptions) -> Box<dyn HeaderBuilder> {
        Box::new(Self::with_options(options))
    }
}

impl HeaderBuilder for ContentSecurityPolicyHeaderBuilder {
    fn add_source_expression(
        &mut self,
        directive: &str,
        expression: &str,
    ) -> Result<(), CspError> {
        let directive: Directive = directive.parse()?;
        let expression = quote_keyword(expression);
        self.directives
            .add(directive, Cow::Owned(expression.into_owned()));
        Ok(())
    }

    fn add_hash(&mut self, algorithm: &str, script_body: &str) -> Result<(), CspError> {
        let algorithm: HashAlgorithm = algorithm.parse()?;
        let source = self.hasher.hash_source(script_body, algorithm);
        self.add_source(Directive::ScriptSrc, source);
        Ok(())
    }

    fn add_nonce(&mut self, directive: &str, nonce: &str) -> Result<(), CspError> {
        let directive: Directive = directive.parse()?;
        if !nonce.trim().is_empty() {
            self.add_source(directive, Source::Nonce(nonce.to_owned().into()));
        }
        Ok(())
    }

    fn reset_directive(&mut self, directive: &str) -> Result<(), CspError> {
        self.directives.reset(directive.parse()?);
        Ok(())
    }

    fn use_reporting_mode(&mut self) {
        self.mode = ReportingMode::ReportOnly;
    }

    fn get_header(&self) -> PolicyHeader {
        PolicyHeader {
            name: self.mode.header_name(),
            value: self.directives.serialize(),
        }
    }
}

pub type BuilderConstructor = fn(BuilderOptions) -> Box<dyn HeaderBuilder>;

/// Named [`HeaderBuilder`] implementations that configuration may select.
#[derive(Debug, Clone)]
pub struct BuilderRegistry {
    constructors: FxHashMap<Cow<'static, str>, BuilderConstructor>,
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        let mut registry = Self {
            constructors: FxHashMap::default(),
        };
        registry.register(DEFAULT_BUILDER, ContentSecurityPolicyHeaderBuilder::boxed);
        registry
    }
}

impl BuilderRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        constructor: BuilderConstructor,
    ) -> &mut Self {
        self.constructors.insert(name.into(), constructor);
        self
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<BuilderConstructor> {
        self.constructors.get(name).copied()
    }
}

/// Creates builders of one implementation, validated up front.
#[derive(Clone)]
pub struct BuilderFactory {
    name: Cow<'static, str>,
    constructor: BuilderConstructor,
    options: BuilderOptions,
}

impl fmt::Debug for BuilderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderFactory")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for BuilderFactory {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed(DEFAULT_BUILDER),
            constructor: ContentSecurityPolicyHeaderBuilder::boxed,
            options: BuilderOptions::default(),
        }
    }
}

impl BuilderFactory {
    pub fn new(
        registry: &BuilderRegistry,
        name: &str,
        options: BuilderOptions,
    ) -> Result<Self, CspError> {
        let constructor = registry.get(name).ok_or_else(|| {
            log::warn!("Rejected unregistered header builder '{}'", name);
            CspError::InvalidClass(name.to_string())
        })?;

        Ok(Self {
            name: Cow::Owned(name.to_string()),
            constructor,
            options,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn options(&self) -> BuilderOptions {
        self.options
    }

    #[inline]
    pub fn create(&self) -> Box<dyn HeaderBuilder> {
        (self.constructor)(self.options)
    }
}
