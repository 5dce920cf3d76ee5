use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_coordinate = |var: &str, default: &str, bound: f64| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value.abs() > bound {
            return Err(invalid(var, format!("must be within ±{bound}")));
        }
        Ok(value)
    };

    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("LEADGEN_ENV", "development"));
    let log_level = or_default("LEADGEN_LOG_LEVEL", "info");

    let gemini_base_url = or_default(
        "LEADGEN_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com/",
    );
    let discovery_model = or_default("LEADGEN_DISCOVERY_MODEL", "gemini-2.5-flash");
    let enrichment_model = or_default("LEADGEN_ENRICHMENT_MODEL", "gemini-3-flash-preview");

    let request_timeout_secs = parse_u64("LEADGEN_REQUEST_TIMEOUT_SECS", "60")?;

    let enrich_batch_size = parse_usize("LEADGEN_ENRICH_BATCH_SIZE", "3")?;
    if enrich_batch_size == 0 {
        return Err(invalid(
            "LEADGEN_ENRICH_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }

    let discovery_limit = parse_u32("LEADGEN_DISCOVERY_LIMIT", "10")?;
    let default_latitude = parse_coordinate("LEADGEN_DEFAULT_LATITUDE", "37.0902", 90.0)?;
    let default_longitude = parse_coordinate("LEADGEN_DEFAULT_LONGITUDE", "-95.7129", 180.0)?;

    Ok(AppConfig {
        env,
        log_level,
        gemini_api_key,
        gemini_base_url,
        discovery_model,
        enrichment_model,
        request_timeout_secs,
        enrich_batch_size,
        discovery_limit,
        default_latitude,
        default_longitude,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
