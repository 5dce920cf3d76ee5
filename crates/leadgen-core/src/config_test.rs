use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GEMINI_API_KEY", "test-key");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEMINI_API_KEY"),
        "expected MissingEnvVar(GEMINI_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_applies_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.gemini_api_key, "test-key");
    assert_eq!(
        cfg.gemini_base_url,
        "https://generativelanguage.googleapis.com/"
    );
    assert_eq!(cfg.discovery_model, "gemini-2.5-flash");
    assert_eq!(cfg.enrichment_model, "gemini-3-flash-preview");
    assert_eq!(cfg.request_timeout_secs, 60);
    assert_eq!(cfg.enrich_batch_size, 3);
    assert_eq!(cfg.discovery_limit, 10);
    assert!((cfg.default_latitude - 37.0902).abs() < f64::EPSILON);
    assert!((cfg.default_longitude + 95.7129).abs() < f64::EPSILON);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("LEADGEN_ENV", "production");
    map.insert("LEADGEN_ENRICH_BATCH_SIZE", "5");
    map.insert("LEADGEN_DISCOVERY_MODEL", "gemini-custom");
    map.insert("LEADGEN_DEFAULT_LATITUDE", "45.764");
    map.insert("LEADGEN_DEFAULT_LONGITUDE", "4.8357");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.enrich_batch_size, 5);
    assert_eq!(cfg.discovery_model, "gemini-custom");
    assert!((cfg.default_latitude - 45.764).abs() < f64::EPSILON);
}

#[test]
fn build_app_config_rejects_zero_batch_size() {
    let mut map = full_env();
    map.insert("LEADGEN_ENRICH_BATCH_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADGEN_ENRICH_BATCH_SIZE"),
        "expected InvalidEnvVar(LEADGEN_ENRICH_BATCH_SIZE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = full_env();
    map.insert("LEADGEN_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADGEN_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(LEADGEN_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_out_of_range_latitude() {
    let mut map = full_env();
    map.insert("LEADGEN_DEFAULT_LATITUDE", "91.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADGEN_DEFAULT_LATITUDE"),
        "expected InvalidEnvVar(LEADGEN_DEFAULT_LATITUDE), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = full_env();
    map.insert("GEMINI_API_KEY", "super-secret-value");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-value"));
    assert!(rendered.contains("[redacted]"));
}
