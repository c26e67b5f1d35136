//! Config parsing, file loading and the process-wide instance.

use std::fs;

use serde_json::json;

use scrim::config::{self, Config, keys};
use scrim::context::OverlayContext;
use scrim::error::ConfigError;
use scrim::platform::{Mode, StaticPlatform, resolve_mode};

#[test]
fn test_from_json_str() {
    let config = Config::from_json_str(r#"{"mode": "ios", "animated": false, "scale": 2}"#).unwrap();
    assert_eq!(config.get_str(keys::MODE, "md"), "ios");
    assert!(!config.get_bool(keys::ANIMATED, true));
    assert_eq!(config.get_number("scale", 1.0), 2.0);
    assert_eq!(config.get("missing"), None);
}

#[test]
fn test_non_object_rejected() {
    assert!(matches!(
        Config::from_json_str("[1, 2]"),
        Err(ConfigError::NotAnObject)
    ));
    assert!(matches!(
        Config::from_json_str("{not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_fallbacks_for_wrong_types() {
    let config = Config::new().with("flag", 3).with("name", json!(["a"]));
    assert!(config.get_bool("flag", true));
    assert_eq!(config.get_str("name", "default"), "default");
    assert_eq!(config.get_number("name", 7.5), 7.5);
}

#[test]
fn test_load_from_file() {
    let dir = std::env::temp_dir().join(format!("scrim-config-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    fs::write(&path, r#"{"spinner": "dots", "html_content_enabled": false}"#).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.get_str(keys::SPINNER, ""), "dots");
    assert!(!config.get_bool(keys::HTML_CONTENT_ENABLED, true));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("scrim-does-not-exist/config.json");
    assert!(matches!(Config::load(path), Err(ConfigError::Io(_))));
}

#[test]
fn test_mode_resolution_order() {
    let ios_config = Config::new().with(keys::MODE, "ios");
    let desktop = StaticPlatform::desktop();
    let iphone = StaticPlatform::ios_mobile();

    assert_eq!(resolve_mode(Some(Mode::Md), &ios_config, &desktop), Mode::Md);
    assert_eq!(resolve_mode(None, &ios_config, &desktop), Mode::Ios);
    assert_eq!(resolve_mode(None, &Config::new(), &iphone), Mode::Ios);
    assert_eq!(resolve_mode(None, &Config::new(), &desktop), Mode::Md);
}

// The only test in this binary that touches the process-wide config.
#[test]
fn test_global_init_once() {
    let installed = Config::new().with(keys::MODE, "ios");
    config::init(installed.clone()).unwrap();

    assert!(matches!(
        config::init(Config::new()),
        Err(ConfigError::AlreadyInitialized)
    ));
    assert_eq!(config::global(), &installed);

    let ctx = OverlayContext::new();
    assert_eq!(ctx.config().get_str(keys::MODE, "md"), "ios");
}
