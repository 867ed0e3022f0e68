//! Semantic validation.

use elmdev_config::{ConfigError, DevkitConfig};

fn invalid_field(config: &DevkitConfig) -> String {
    match config.validate().unwrap_err() {
        ConfigError::Invalid { field, .. } => field,
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn prefix_must_start_with_slash() {
    let mut config = DevkitConfig::default();
    config.proxy.prefix = "api".into();
    assert_eq!(invalid_field(&config), "proxy.prefix");
}

#[test]
fn prefix_must_not_end_with_slash() {
    let mut config = DevkitConfig::default();
    config.proxy.prefix = "/api/".into();
    assert_eq!(invalid_field(&config), "proxy.prefix");

    config.proxy.prefix = "/".into();
    assert_eq!(invalid_field(&config), "proxy.prefix");
}

#[test]
fn bundle_must_be_a_js_file_name() {
    let mut config = DevkitConfig::default();
    config.paths.bundle = "elm-app.css".into();
    assert_eq!(invalid_field(&config), "paths.bundle");

    config.paths.bundle = "js/elm-app.js".into();
    assert_eq!(invalid_field(&config), "paths.bundle");
}

#[test]
fn extensions_are_bare_and_non_empty() {
    let mut config = DevkitConfig::default();
    config.watch.extensions.clear();
    assert_eq!(invalid_field(&config), "watch.extensions");

    config.watch.extensions = vec![".elm".into()];
    assert_eq!(invalid_field(&config), "watch.extensions");
}

#[test]
fn target_must_be_plain_http() {
    let mut config = DevkitConfig::default();
    config.proxy.target = "https://localhost:8000".into();
    assert_eq!(invalid_field(&config), "proxy.target");
}

#[test]
fn proxying_to_itself_is_rejected() {
    let mut config = DevkitConfig::default();
    config.proxy.target = "http://localhost:8080".into();
    assert_eq!(invalid_field(&config), "proxy.target");

    // Same port on another host is fine.
    config.proxy.target = "http://backend:8080".into();
    config.validate().unwrap();
}

#[test]
fn self_proxy_check_ignores_host_case() {
    let mut config = DevkitConfig::default();
    for target in [
        "http://LOCALHOST:8080",
        "HTTP://Localhost:8080/api",
        "http://localhost.:8080",
    ] {
        config.proxy.target = target.into();
        assert_eq!(invalid_field(&config), "proxy.target", "{target}");
    }
}

#[test]
fn empty_compiler_program_is_rejected() {
    let mut config = DevkitConfig::default();
    config.compiler.program = "  ".into();
    assert_eq!(invalid_field(&config), "compiler.program");
}
