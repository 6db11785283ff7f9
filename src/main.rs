use actix_web_inline_csp::{CspConfigBuilder, PolicyManager, Preset};

fn main() -> Result<(), actix_web_inline_csp::CspError> {
    println!("Actix Web inline CSP example");

    let config = CspConfigBuilder::new()
        .enabled(true)
        .additional_sources("script", ["self"])
        .preset(
            "googleAnalytics",
            Preset::new(true)
                .rule("script", "www.google-analytics.com")
                .rule("img", "www.google-analytics.com"),
        )
        .build()?;

    let mut manager = PolicyManager::new(&config);
    manager.register_inline_script("console.log('hello');", "sha256")?;
    manager.apply_settings()?;

    println!("{}", manager.extract_headers());
    Ok(())
}
