use crate::constants::{CHILD_SRC, DIRECTIVE_POSTFIX, FRAME_SRC, REPORT_URI, SCRIPT_SRC};
use crate::core::builder::{BuilderFactory, HeaderBuilder, PolicyHeader};
use crate::core::config::{CspConfig, CspSettings};
use crate::core::directives::Directive;
use crate::error::CspError;
use crate::monitoring::stats::CspStats;
use crate::security::hash::{HashAlgorithm, InlineScriptHasher};
use crate::security::nonce::NonceProvider;
use parking_lot::{Mutex, MutexGuard};
use std::{fmt, sync::Arc};
use url::Url;

/// An inline script after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineScript {
    /// The body the renderer must emit; it is exactly what was hashed.
    pub content: String,
    /// Set in nonce mode; the renderer stamps it as `nonce="…"` on the tag.
    pub nonce: Option<String>,
}

/// Per-request policy context.
///
/// Owns the active [`HeaderBuilder`] and the request nonce. A manager is
/// created when a request starts and dropped when its response is sent;
/// [`reset`](PolicyManager::reset) starts a new cycle in place.
pub struct PolicyManager {
    settings: Arc<CspSettings>,
    factory: Arc<BuilderFactory>,
    stats: Option<Arc<CspStats>>,
    builder: Option<Box<dyn HeaderBuilder>>,
    nonce: NonceProvider,
}

impl fmt::Debug for PolicyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyManager")
            .field("factory", &self.factory)
            .field("builder", &self.builder)
            .field("nonce_generated", &self.nonce.current().is_some())
            .finish()
    }
}

impl Default for PolicyManager {
    fn default() -> Self {
        Self::from_parts(CspSettings::default(), BuilderFactory::default())
    }
}

impl PolicyManager {
    pub fn new(config: &CspConfig) -> Self {
        let snapshot = config.snapshot();
        Self {
            settings: snapshot.settings.clone(),
            factory: snapshot.factory.clone(),
            stats: Some(config.stats().clone()),
            builder: None,
            nonce: NonceProvider::new(),
        }
    }

    pub fn from_parts(settings: CspSettings, factory: BuilderFactory) -> Self {
        Self {
            settings: Arc::new(settings),
            factory: Arc::new(factory),
            stats: None,
            builder: None,
            nonce: NonceProvider::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &CspSettings {
        &self.settings
    }

    /// The active builder, created through the factory on first access.
    pub fn get_builder(&mut self) -> &mut dyn HeaderBuilder {
        let factory = &self.factory;
        &mut **self.builder.get_or_insert_with(|| {
            log::debug!("Creating '{}' header builder", factory.name());
            factory.create()
        })
    }

    pub fn reset_builder(&mut self) {
        log::debug!("Resetting '{}' header builder", self.factory.name());
        self.builder = Some(self.factory.create());
    }

    /// Marks a request boundary: fresh builder, no nonce.
    pub fn reset(&mut self) {
        self.reset_builder();
        self.nonce.reset();
    }

    #[inline]
    pub fn is_nonce_mode_enabled(&self) -> bool {
        self.settings.is_nonce_mode()
    }

    /// The request nonce; generated once, then stable until [`reset`](Self::reset).
    pub fn get_nonce(&mut self) -> Result<String, CspError> {
        if self.nonce.current().is_none() {
            if let Some(stats) = &self.stats {
                stats.increment_nonce_generation_count();
            }
        }
        self.nonce.get_nonce().map(str::to_owned)
    }

    /// Merges this request's own settings into the builder.
    pub fn apply_settings(&mut self) -> Result<(), CspError> {
        let settings = self.settings.clone();
        self.merge_external_config(&settings)
    }

    /// Applies additional sources, then enabled presets, then report-only
    /// defaulting, then the explicit report URI. Every directive name is
    /// validated before the builder is touched.
    pub fn merge_external_config(&mut self, settings: &CspSettings) -> Result<(), CspError> {
        if !settings.enabled {
            log::debug!("CSP disabled, skipping external configuration");
            return Ok(());
        }

        let mut additions: Vec<(String, &str)> = Vec::new();

        for (base, sources) in &settings.additional_sources {
            let directive = expand_directive(base)?;
            additions.extend(sources.iter().map(|source| (directive.clone(), source.as_str())));
        }

        for (name, preset) in &settings.presets {
            if !preset.enabled {
                log::debug!("Skipping disabled preset '{}'", name);
                continue;
            }
            for (base, sources) in &preset.rules {
                let directive = expand_directive(base)?;
                additions.extend(sources.iter().map(|source| (directive.clone(), source)));
            }
        }

        let builder = self.get_builder();
        for (directive, source) in additions {
            builder.add_source_expression(&directive, source)?;
        }

        let explicit_report_uri = settings.explicit_report_uri();

        if settings.report_only {
            builder.use_reporting_mode();
            if explicit_report_uri.is_none() {
                builder.add_source_expression(REPORT_URI, &settings.report_path)?;
            }
        }

        if let Some(uri) = explicit_report_uri {
            builder.add_source_expression(REPORT_URI, uri)?;
        }

        Ok(())
    }

    #[inline]
    pub fn header(&mut self) -> PolicyHeader {
        self.get_builder().get_header()
    }

    /// `"<name>: <value>"`, or an empty string when there is nothing to send.
    pub fn extract_headers(&mut self) -> String {
        let header = self.header();
        if header.is_empty() {
            String::new()
        } else {
            header.to_header_line()
        }
    }

    /// Whitelists an inline script: by hash in hash mode, by the request
    /// nonce in nonce mode. The hash method is validated in both modes.
    pub fn register_inline_script(
        &mut self,
        script_body: &str,
        hash_method: &str,
    ) -> Result<InlineScript, CspError> {
        let algorithm: HashAlgorithm = hash_method.parse()?;
        let hasher = InlineScriptHasher::new(self.settings.trim_scripts);
        let content = hasher.normalize(script_body).to_owned();

        if content.trim().is_empty() {
            return Ok(InlineScript {
                content,
                nonce: None,
            });
        }

        if self.is_nonce_mode_enabled() {
            let nonce = self.get_nonce()?;
            self.get_builder().add_nonce(SCRIPT_SRC, &nonce)?;
            Ok(InlineScript {
                content,
                nonce: Some(nonce),
            })
        } else {
            // The token must hash exactly what the renderer emits.
            let token = hasher.hash_source(&content, algorithm).to_string();
            self.get_builder().add_source_expression(SCRIPT_SRC, &token)?;
            if let Some(stats) = &self.stats {
                stats.increment_hash_count();
            }
            Ok(InlineScript {
                content,
                nonce: None,
            })
        }
    }

    /// Allows the host of an embedded frame under `frame-src` and `child-src`.
    pub fn register_frame_source(&mut self, src: &str) -> Result<(), CspError> {
        let host = frame_host(src)?;
        let builder = self.get_builder();
        builder.add_source_expression(FRAME_SRC, &host)?;
        builder.add_source_expression(CHILD_SRC, &host)?;
        Ok(())
    }
}

fn expand_directive(base: &str) -> Result<String, CspError> {
    let name = format!("{}{}", base.trim_end_matches('.'), DIRECTIVE_POSTFIX);
    name.parse::<Directive>()?;
    Ok(name)
}

fn frame_host(src: &str) -> Result<String, CspError> {
    let src = src.trim();
    let parsed = if src.starts_with("//") {
        Url::parse(&format!("https:{}", src))
    } else {
        Url::parse(src)
    }
    .map_err(|e| CspError::InvalidSourceUrl(format!("{}: {}", src, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| CspError::InvalidSourceUrl(format!("{}: missing host", src)))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Shareable handle to one request's [`PolicyManager`].
///
/// Fragments rendered concurrently for the same request go through the
/// mutex, so insertion order stays deterministic per call sequence.
#[derive(Debug, Clone, Default)]
pub struct RequestPolicy(Arc<Mutex<PolicyManager>>);

impl RequestPolicy {
    #[inline]
    pub fn new(manager: PolicyManager) -> Self {
        Self(Arc::new(Mutex::new(manager)))
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, PolicyManager> {
        self.0.lock()
    }
}
