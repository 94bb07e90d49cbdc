use eventgraph::config::*;
use tempfile::TempDir;

#[test]
fn test_default_config_tolerates_unresolved() {
    let config = ImporterConfig::default();
    assert_eq!(config.max_unresolved, None);
    assert_eq!(config.display, DisplayMode::Short);
    assert!(config.fetch_timeout_secs > 0);
}

#[test]
fn test_load_missing_config_returns_default() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, ImporterConfig::default());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config = ImporterConfig {
        default_source: Some("https://sessionize.com/api/v2/abc/view/All".to_string()),
        max_unresolved: Some(3),
        display: DisplayMode::Long,
        ..ImporterConfig::default()
    };
    save_config(dir.path(), &config).unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
    assert!(!get_config_path(dir.path()).with_extension("tmp").exists());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_eventgraph_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), r#"{ "display": "long" }"#).unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.display, DisplayMode::Long);
    assert_eq!(loaded.version, 1);
}

#[test]
fn test_corrupt_config_is_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_eventgraph_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), "{ nope").unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().starts_with("config error: cannot parse"));
}

#[test]
fn test_newer_config_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_eventgraph_dir(dir.path())).unwrap();
    let newer = format!(r#"{{ "version": {} }}"#, CONFIG_VERSION + 1);
    std::fs::write(get_config_path(dir.path()), newer).unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().contains("this build understands up to 1"));
}

#[test]
fn test_save_leaves_no_staging_file() {
    let dir = TempDir::new().unwrap();
    save_config(dir.path(), &ImporterConfig::default()).unwrap();

    let entries: Vec<_> = std::fs::read_dir(get_eventgraph_dir(dir.path()))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from(CONFIG_FILENAME)]);
}

#[test]
fn test_eventgraph_dir_location() {
    let dir = TempDir::new().unwrap();
    assert!(get_eventgraph_dir(dir.path()).ends_with(".eventgraph"));
    assert!(get_config_path(dir.path()).ends_with(".eventgraph/config.json"));
}

#[test]
fn test_is_remote_source() {
    assert!(is_remote_source("https://sessionize.com/api/v2/x/view/All"));
    assert!(is_remote_source("HTTP://example.com/all.json"));
    assert!(!is_remote_source("data/all.json"));
    assert!(!is_remote_source("/tmp/http-dump.json"));
}
