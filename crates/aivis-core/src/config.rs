use std::collections::HashMap;
use std::env::VarError;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from the process environment, with
/// `overrides` taking precedence over any variable of the same name.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config(overrides: &HashMap<&str, String>) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(with_overrides(overrides, |key| std::env::var(key)))
}

/// Lookup that answers from `overrides` first and `fallback` otherwise.
fn with_overrides<'a, F>(
    overrides: &'a HashMap<&'a str, String>,
    fallback: F,
) -> impl Fn(&str) -> Result<String, VarError> + 'a
where
    F: Fn(&str) -> Result<String, VarError> + 'a,
{
    move |key| {
        overrides
            .get(key)
            .cloned()
            .map_or_else(|| fallback(key), Ok)
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let records_path = PathBuf::from(require("AIVIS_RECORDS_PATH")?);
    let env = parse_environment(&or_default("AIVIS_ENV", "development"));
    let log_level = or_default("AIVIS_LOG_LEVEL", "info");
    let tracking_path = PathBuf::from(or_default("AIVIS_TRACKING_PATH", "./config/tracking.yaml"));

    let default_days = parse_u32("AIVIS_DEFAULT_DAYS", "30")?;
    if default_days == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "AIVIS_DEFAULT_DAYS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        tracking_path,
        records_path,
        default_days,
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
