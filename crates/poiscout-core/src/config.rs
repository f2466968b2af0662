use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does not load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config pointed at the public Overpass instance.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("POISCOUT_ENV", "development"))?;
    let log_level = or_default("POISCOUT_LOG_LEVEL", "info");

    let overpass_url = or_default(
        "POISCOUT_OVERPASS_URL",
        "https://overpass-api.de/api/interpreter",
    );
    if overpass_url.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "POISCOUT_OVERPASS_URL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("POISCOUT_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "POISCOUT_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let min_request_interval_ms = parse_u64("POISCOUT_MIN_REQUEST_INTERVAL_MS", "1000")?;
    let cache_ttl_secs = parse_u64("POISCOUT_CACHE_TTL_SECS", "900")?;
    let cache_sweep_secs = parse_u64("POISCOUT_CACHE_SWEEP_SECS", "300")?;
    let query_timeout_secs = parse_u32("POISCOUT_QUERY_TIMEOUT_SECS", "25")?;
    let user_agent = or_default("POISCOUT_USER_AGENT", "poiscout/0.1 (poi-aggregation)");

    Ok(AppConfig {
        env,
        log_level,
        overpass_url,
        request_timeout_secs,
        min_request_interval_ms,
        cache_ttl_secs,
        cache_sweep_secs,
        query_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POISCOUT_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
