use cosmictasks::config::*;
use cosmictasks::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use yare::parameterized;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults_without_environment() {
    let config = Config::from_lookup(|_| None).unwrap();
    assert_eq!(config.backend, BackendKind::Json);
    assert_eq!(config.log_filter, "warn");
    assert!(config.data_dir.to_string_lossy().ends_with("cosmictasks"));
}

#[test]
fn test_values_from_environment() {
    let config = Config::from_lookup(lookup_from(&[
        (DATA_DIR_VAR, "/tmp/cosmic-data"),
        (BACKEND_VAR, "fixture"),
        (LOG_VAR, "cosmictasks=debug"),
    ]))
    .unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/tmp/cosmic-data"));
    assert_eq!(config.backend, BackendKind::Fixture);
    assert_eq!(config.log_filter, "cosmictasks=debug");
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let config = Config::from_lookup(lookup_from(&[(DATA_DIR_VAR, "  "), (BACKEND_VAR, ""), (LOG_VAR, "")])).unwrap();
    assert_ne!(config.data_dir, PathBuf::from("  "));
    assert_eq!(config.backend, BackendKind::Json);
    assert_eq!(config.log_filter, "warn");
}

#[test]
fn test_unknown_backend_is_an_error() {
    let err = Config::from_lookup(lookup_from(&[(BACKEND_VAR, "postgres")])).unwrap_err();
    assert!(matches!(err, Error::InvalidBackend(ref b) if b == "postgres"));
    assert!(err.to_string().contains("hint"));
}

#[parameterized(
    json = { "json", BackendKind::Json },
    json_upper = { "JSON", BackendKind::Json },
    fixture = { "fixture", BackendKind::Fixture },
    demo = { " demo ", BackendKind::Fixture },
)]
fn test_backend_kind_parsing(raw: &str, expected: BackendKind) {
    assert_eq!(raw.parse::<BackendKind>().unwrap(), expected);
}

#[test]
fn test_with_data_dir() {
    let config = Config::with_data_dir("/srv/cosmic");
    assert_eq!(config.data_dir, PathBuf::from("/srv/cosmic"));
    assert_eq!(config.backend, BackendKind::Json);
    assert_eq!(config.backend.to_string(), "json");
}
