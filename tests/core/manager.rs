use actix_web_inline_csp::core::{
    BuilderFactory, BuilderRegistry, CspConfigBuilder, CspSettings, PolicyManager, Preset,
    ScriptMethod,
};
use actix_web_inline_csp::security::InlineScriptHasher;
use actix_web_inline_csp::CspError;

const ANALYTICS: &str =
    "www.google-analytics.com stats.g.doubleclick.net https://stats.g.doubleclick.net";

/// Settings with an enabled analytics preset and a disabled vimeo preset.
fn preset_settings() -> CspSettings {
    let mut settings = CspSettings {
        enabled: true,
        ..CspSettings::default()
    };
    settings.presets.insert(
        "googleAnalytics".into(),
        Preset::new(true).rule("script", ANALYTICS).rule("img", ANALYTICS),
    );
    settings.presets.insert(
        "vimeo".into(),
        Preset::new(false).rule("frame", "*.vimeo.com *.vimeocdn.com"),
    );
    settings
}

fn manager_for(settings: CspSettings) -> PolicyManager {
    PolicyManager::from_parts(settings, BuilderFactory::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_headers_empty_by_default() {
        let mut manager = PolicyManager::default();
        assert_eq!(manager.extract_headers(), "");
    }

    #[test]
    fn test_merge_does_nothing_if_disabled() {
        let settings = CspSettings {
            enabled: false,
            ..preset_settings()
        };
        let mut manager = manager_for(settings);
        manager.apply_settings().unwrap();
        assert_eq!(manager.extract_headers(), "");
    }

    #[test]
    fn test_merge_adds_only_enabled_presets() {
        let mut manager = manager_for(preset_settings());
        manager.apply_settings().unwrap();

        assert_eq!(
            manager.extract_headers(),
            format!(
                "Content-Security-Policy: script-src {}; img-src {};",
                ANALYTICS, ANALYTICS
            )
        );
    }

    #[test]
    fn test_additional_sources_precede_presets() {
        let mut settings = preset_settings();
        settings
            .additional_sources
            .insert("script".into(), vec!["self".into(), "www.test.de".into()]);

        let mut manager = manager_for(settings);
        manager.apply_settings().unwrap();

        assert_eq!(
            manager.extract_headers(),
            format!(
                "Content-Security-Policy: script-src 'self' www.test.de {}; img-src {};",
                ANALYTICS, ANALYTICS
            )
        );
    }

    #[test]
    fn test_report_only_adds_default_report_uri() {
        let mut settings = preset_settings();
        settings
            .additional_sources
            .insert("script".into(), vec!["self".into(), "www.test.de".into()]);
        settings.report_only = true;

        let mut manager = manager_for(settings);
        manager.apply_settings().unwrap();

        assert_eq!(
            manager.extract_headers(),
            format!(
                "Content-Security-Policy-Report-Only: script-src 'self' www.test.de {}; img-src {}; report-uri /csp-report;",
                ANALYTICS, ANALYTICS
            )
        );
    }

    #[test]
    fn test_explicit_report_uri_is_registered() {
        let settings = CspSettings {
            report_uri: Some("/test/".into()),
            ..preset_settings()
        };

        let mut manager = manager_for(settings);
        manager.apply_settings().unwrap();

        assert_eq!(
            manager.extract_headers(),
            format!(
                "Content-Security-Policy: script-src {}; img-src {}; report-uri /test/;",
                ANALYTICS, ANALYTICS
            )
        );
    }

    #[test]
    fn test_explicit_report_uri_suppresses_default() {
        let settings = CspSettings {
            report_only: true,
            report_uri: Some("https://reports.example.com/csp".into()),
            ..CspSettings {
                enabled: true,
                ..CspSettings::default()
            }
        };

        let mut manager = manager_for(settings);
        manager.apply_settings().unwrap();

        assert_eq!(
            manager.extract_headers(),
            "Content-Security-Policy-Report-Only: report-uri https://reports.example.com/csp;"
        );
    }

    #[test]
    fn test_merge_appends_to_existing_sources() {
        let mut manager = manager_for(preset_settings());
        manager
            .get_builder()
            .add_source_expression("script-src", "cdn.example.com")
            .unwrap();
        manager.apply_settings().unwrap();

        let header = manager.header();
        assert!(header
            .value
            .starts_with(&format!("script-src cdn.example.com {};", ANALYTICS)));
    }

    #[test]
    fn test_reset_builder_discards_state() {
        let mut manager = PolicyManager::default();
        manager.get_builder().add_nonce("script-src", "abc").unwrap();
        manager.reset_builder();
        assert_eq!(manager.extract_headers(), "");
    }

    #[test]
    fn test_nonce_is_stable_within_request() {
        let mut manager = PolicyManager::default();
        let first = manager.get_nonce().unwrap();
        let second = manager.get_nonce().unwrap();
        assert_eq!(first, second);

        manager.reset();
        let third = manager.get_nonce().unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn test_separate_requests_get_separate_nonces() {
        let mut first = PolicyManager::default();
        let mut second = PolicyManager::default();
        assert_ne!(first.get_nonce().unwrap(), second.get_nonce().unwrap());
    }

    #[test]
    fn test_inline_script_hash_mode() {
        let mut manager = PolicyManager::default();
        assert!(!manager.is_nonce_mode_enabled());

        let script = manager
            .register_inline_script("\n    var foo = \"314\"\n  ", "sha256")
            .unwrap();

        assert_eq!(script.content, "var foo = \"314\"");
        assert!(script.nonce.is_none());
        assert_eq!(
            manager.extract_headers(),
            "Content-Security-Policy: script-src 'sha256-gPMJwWBMWDx0Cm7ZygJKZIU2vZpiYvzUQjl5Rh37hKs=';"
        );
    }

    #[test]
    fn test_inline_script_nonce_mode() {
        let settings = CspSettings {
            script_method: ScriptMethod::Nonce,
            ..CspSettings::default()
        };
        let mut manager = manager_for(settings);
        assert!(manager.is_nonce_mode_enabled());

        let nonce = manager.get_nonce().unwrap();
        let script = manager
            .register_inline_script("var foo = \"314\"", "sha512")
            .unwrap();
        manager.register_inline_script("var bar = 1", "sha256").unwrap();

        assert_eq!(script.nonce.as_deref(), Some(nonce.as_str()));
        assert_eq!(
            manager.extract_headers(),
            format!("Content-Security-Policy: script-src 'nonce-{}';", nonce)
        );
    }

    #[test]
    fn test_inline_script_validates_hash_method_in_nonce_mode() {
        let settings = CspSettings {
            script_method: ScriptMethod::Nonce,
            ..CspSettings::default()
        };
        let mut manager = manager_for(settings);

        let err = manager.register_inline_script("alert(1)", "test").unwrap_err();
        assert!(matches!(err, CspError::UnsupportedHashAlgorithm(value) if value == "test"));
        assert_eq!(manager.extract_headers(), "");
    }

    #[test]
    fn test_inline_script_without_trimming() {
        let settings = CspSettings {
            trim_scripts: false,
            ..CspSettings::default()
        };
        let mut manager = manager_for(settings);

        let body = "    \n    alert(\"fine\");    \n    ";
        let script = manager.register_inline_script(body, "sha256").unwrap();
        assert_eq!(script.content, body);

        let emitted = InlineScriptHasher::new(false)
            .hash(&script.content, "sha256")
            .unwrap();
        assert_eq!(
            emitted,
            "'sha256-vs1juPmrisap2ZC7aFigd6CTyYGLfQb/Yfik73MvDp0='"
        );
        assert_eq!(manager.header().value, format!("script-src {};", emitted));
    }

    #[test]
    fn test_inline_script_hash_follows_manager_settings_not_factory() {
        let settings = CspSettings {
            trim_scripts: false,
            ..CspSettings::default()
        };
        // The default factory trims; the manager's settings must win.
        let mut manager = PolicyManager::from_parts(settings, BuilderFactory::default());

        let script = manager
            .register_inline_script("  alert(1);  ", "sha256")
            .unwrap();
        assert_eq!(script.content, "  alert(1);  ");
        assert_eq!(
            manager.extract_headers(),
            "Content-Security-Policy: script-src 'sha256-wpiZ1sk8cD8LTHLJN3tnV0a//ELgGevjYaBWDFPRLII=';"
        );
    }

    #[test]
    fn test_empty_inline_script_registers_nothing() {
        let mut manager = PolicyManager::default();
        let script = manager.register_inline_script("   ", "sha256").unwrap();
        assert!(script.content.is_empty());
        assert_eq!(manager.extract_headers(), "");
    }

    #[test]
    fn test_frame_source_registration() {
        let mut manager = PolicyManager::default();
        manager
            .register_frame_source("https://player.vimeo.com/video/12345")
            .unwrap();

        assert_eq!(
            manager.header().value,
            "frame-src player.vimeo.com; child-src player.vimeo.com;"
        );
        assert!(matches!(
            manager.register_frame_source("no host"),
            Err(CspError::InvalidSourceUrl(_))
        ));
    }

    #[test]
    fn test_manager_uses_configured_builder() {
        let config = CspConfigBuilder::new()
            .registry(BuilderRegistry::new())
            .builder_name("default")
            .script_method(ScriptMethod::Nonce)
            .build()
            .unwrap();

        let mut manager = PolicyManager::new(&config);
        manager.register_inline_script("alert(1)", "sha256").unwrap();
        assert_eq!(config.stats().nonce_generation_count(), 1);
        assert!(manager.extract_headers().contains("'nonce-"));
    }

    #[test]
    fn test_config_rejects_unregistered_builder() {
        let result = CspConfigBuilder::new().builder_name("legacy").build();
        assert!(matches!(result, Err(CspError::InvalidClass(_))));
    }
}
