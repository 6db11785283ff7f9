use crate::constants::{DEFAULT_BUILDER, DEFAULT_REPORT_PATH};
use crate::core::builder::{BuilderFactory, BuilderOptions, BuilderRegistry};
use crate::error::CspError;
use crate::monitoring::stats::CspStats;
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How inline scripts are whitelisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptMethod {
    #[default]
    Hash,
    Nonce,
}

/// A preset rule value: either one expression or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSources {
    One(String),
    Many(Vec<String>),
}

impl RuleSources {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let sources: &[String] = match self {
            RuleSources::One(source) => std::slice::from_ref(source),
            RuleSources::Many(sources) => sources,
        };
        sources.iter().map(String::as_str)
    }
}

impl From<&str> for RuleSources {
    fn from(source: &str) -> Self {
        RuleSources::One(source.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub enabled: bool,
    /// Directive base name (without `-src`) -> expression(s).
    pub rules: IndexMap<String, RuleSources>,
}

impl Preset {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            rules: IndexMap::new(),
        }
    }

    pub fn rule(mut self, directive: impl Into<String>, sources: impl Into<RuleSources>) -> Self {
        self.rules.insert(directive.into(), sources.into());
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_builder() -> String {
    DEFAULT_BUILDER.to_string()
}

fn default_report_path() -> String {
    DEFAULT_REPORT_PATH.to_string()
}

/// External settings that drive policy construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CspSettings {
    pub script_method: ScriptMethod,
    pub enabled: bool,
    /// Directive base name (without `-src`) -> ordered expressions.
    pub additional_sources: IndexMap<String, Vec<String>>,
    pub presets: IndexMap<String, Preset>,
    pub report_only: bool,
    #[serde(rename = "report-uri", skip_serializing_if = "Option::is_none")]
    pub report_uri: Option<String>,
    /// Endpoint used as `report-uri` when report-only mode has no explicit URI.
    #[serde(default = "default_report_path")]
    pub report_path: String,
    #[serde(default = "default_builder")]
    pub builder: String,
    #[serde(default = "default_true")]
    pub trim_scripts: bool,
}

impl Default for CspSettings {
    fn default() -> Self {
        Self {
            script_method: ScriptMethod::Hash,
            enabled: false,
            additional_sources: IndexMap::new(),
            presets: IndexMap::new(),
            report_only: false,
            report_uri: None,
            report_path: default_report_path(),
            builder: default_builder(),
            trim_scripts: true,
        }
    }
}

impl CspSettings {
    pub fn from_json(json: &str) -> Result<Self, CspError> {
        Ok(serde_json::from_str(json)?)
    }

    #[inline]
    pub fn is_nonce_mode(&self) -> bool {
        self.script_method == ScriptMethod::Nonce
    }

    /// The explicit report URI, ignoring blank values.
    #[inline]
    pub fn explicit_report_uri(&self) -> Option<&str> {
        self.report_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
    }

    fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            trim_scripts: self.trim_scripts,
        }
    }
}

/// Settings together with the builder factory validated for them.
#[derive(Debug)]
pub(crate) struct ConfigSnapshot {
    pub(crate) settings: Arc<CspSettings>,
    pub(crate) factory: Arc<BuilderFactory>,
}

impl ConfigSnapshot {
    fn new(settings: CspSettings, registry: &BuilderRegistry) -> Result<Self, CspError> {
        let factory = BuilderFactory::new(registry, &settings.builder, settings.builder_options())?;
        Ok(Self {
            settings: Arc::new(settings),
            factory: Arc::new(factory),
        })
    }
}

/// Shared configuration: settings, the validated builder factory and stats.
#[derive(Clone)]
pub struct CspConfig {
    snapshot: Arc<ArcSwap<ConfigSnapshot>>,
    registry: Arc<BuilderRegistry>,
    stats: Arc<CspStats>,
}

impl CspConfig {
    pub fn new(settings: CspSettings) -> Result<Self, CspError> {
        Self::with_registry(settings, BuilderRegistry::default())
    }

    pub fn with_registry(settings: CspSettings, registry: BuilderRegistry) -> Result<Self, CspError> {
        let snapshot = ConfigSnapshot::new(settings, &registry)?;
        Ok(Self {
            snapshot: Arc::new(ArcSwap::from_pointee(snapshot)),
            registry: Arc::new(registry),
            stats: Arc::new(CspStats::new()),
        })
    }

    #[inline]
    pub fn settings(&self) -> Arc<CspSettings> {
        self.snapshot.load().settings.clone()
    }

    #[inline]
    pub fn factory(&self) -> Arc<BuilderFactory> {
        self.snapshot.load().factory.clone()
    }

    /// Settings and factory read in one load, so a concurrent reload never
    /// splits them.
    #[inline]
    pub(crate) fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.snapshot.load_full()
    }

    #[inline]
    pub fn stats(&self) -> &Arc<CspStats> {
        &self.stats
    }

    /// Swaps in new settings. The builder is validated first; on error the
    /// previous settings stay active.
    pub fn reload(&self, settings: CspSettings) -> Result<(), CspError> {
        let snapshot = ConfigSnapshot::new(settings, &self.registry)?;
        self.snapshot.store(Arc::new(snapshot));
        log::debug!("Reloaded CSP settings");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CspConfigBuilder {
    settings: CspSettings,
    registry: BuilderRegistry,
}

impl CspConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn settings(mut self, settings: CspSettings) -> Self {
        self.settings = settings;
        self
    }

    #[inline]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.settings.enabled = enabled;
        self
    }

    #[inline]
    pub fn script_method(mut self, method: ScriptMethod) -> Self {
        self.settings.script_method = method;
        self
    }

    pub fn additional_sources(
        mut self,
        directive: impl Into<String>,
        sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.settings
            .additional_sources
            .entry(directive.into())
            .or_default()
            .extend(sources.into_iter().map(Into::into));
        self
    }

    #[inline]
    pub fn preset(mut self, name: impl Into<String>, preset: Preset) -> Self {
        self.settings.presets.insert(name.into(), preset);
        self
    }

    #[inline]
    pub fn report_only(mut self, report_only: bool) -> Self {
        self.settings.report_only = report_only;
        self
    }

    #[inline]
    pub fn report_uri(mut self, uri: impl Into<String>) -> Self {
        self.settings.report_uri = Some(uri.into());
        self
    }

    #[inline]
    pub fn report_path(mut self, path: impl Into<String>) -> Self {
        self.settings.report_path = path.into();
        self
    }

    #[inline]
    pub fn trim_scripts(mut self, trim: bool) -> Self {
        self.settings.trim_scripts = trim;
        self
    }

    #[inline]
    pub fn builder_name(mut self, name: impl Into<String>) -> Self {
        self.settings.builder = name.into();
        self
    }

    #[inline]
    pub fn registry(mut self, registry: BuilderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> Result<CspConfig, CspError> {
        CspConfig::with_registry(self.settings, self.registry)
    }
}
