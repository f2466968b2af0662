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

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "POISCOUT_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.overpass_url, "https://overpass-api.de/api/interpreter");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.min_request_interval_ms, 1000);
    assert_eq!(cfg.cache_ttl_secs, 900);
    assert_eq!(cfg.cache_sweep_secs, 300);
    assert_eq!(cfg.query_timeout_secs, 25);
    assert_eq!(cfg.user_agent, "poiscout/0.1 (poi-aggregation)");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("POISCOUT_ENV", "production");
    map.insert("POISCOUT_OVERPASS_URL", "http://localhost:12345/api/interpreter");
    map.insert("POISCOUT_REQUEST_TIMEOUT_SECS", "3");
    map.insert("POISCOUT_MIN_REQUEST_INTERVAL_MS", "0");
    map.insert("POISCOUT_CACHE_TTL_SECS", "60");
    map.insert("POISCOUT_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.overpass_url, "http://localhost:12345/api/interpreter");
    assert_eq!(cfg.request_timeout_secs, 3);
    assert_eq!(cfg.min_request_interval_ms, 0);
    assert_eq!(cfg.cache_ttl_secs, 60);
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn build_app_config_rejects_zero_request_timeout() {
    let mut map = HashMap::new();
    map.insert("POISCOUT_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POISCOUT_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(POISCOUT_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_overpass_url() {
    let mut map = HashMap::new();
    map.insert("POISCOUT_OVERPASS_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POISCOUT_OVERPASS_URL"),
        "expected InvalidEnvVar(POISCOUT_OVERPASS_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_interval() {
    let mut map = HashMap::new();
    map.insert("POISCOUT_MIN_REQUEST_INTERVAL_MS", "fast");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POISCOUT_MIN_REQUEST_INTERVAL_MS"),
        "expected InvalidEnvVar(POISCOUT_MIN_REQUEST_INTERVAL_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_negative_query_timeout() {
    let mut map = HashMap::new();
    map.insert("POISCOUT_QUERY_TIMEOUT_SECS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POISCOUT_QUERY_TIMEOUT_SECS"),
        "expected InvalidEnvVar(POISCOUT_QUERY_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn display_environment_round_trips_through_parser() {
    for env in [
        Environment::Development,
        Environment::Test,
        Environment::Production,
    ] {
        assert_eq!(parse_environment(&env.to_string()).unwrap(), env);
    }
}
