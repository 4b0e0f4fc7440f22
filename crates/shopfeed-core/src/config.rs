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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
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
/// development configuration.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SHOPFEED_ENV", "development"));
    let log_level = or_default("SHOPFEED_LOG_LEVEL", "info");

    let api_base_url = or_default("API_BASE_URL", "http://localhost:3000")
        .trim()
        .trim_end_matches('/')
        .to_string();
    if api_base_url.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "API_BASE_URL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("SHOPFEED_REQUEST_TIMEOUT_SECS", "30")?;
    let api_timeout_secs = parse_u64("SHOPFEED_API_TIMEOUT_SECS", "15")?;
    let render_wait_secs = parse_u64("SHOPFEED_RENDER_WAIT_SECS", "10")?;
    let render_settle_ms = parse_u64("SHOPFEED_RENDER_SETTLE_MS", "2000")?;
    let page_delay_ms = parse_u64("SHOPFEED_PAGE_DELAY_MS", "1500")?;
    let page_delay_jitter_ms = parse_u64("SHOPFEED_PAGE_DELAY_JITTER_MS", "500")?;
    let api_result_limit = parse_usize("SHOPFEED_API_RESULT_LIMIT", "60")?;

    let import_batch_size = parse_usize("SHOPFEED_IMPORT_BATCH_SIZE", "50")?;
    if import_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPFEED_IMPORT_BATCH_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let import_timeout_secs = parse_u64("SHOPFEED_IMPORT_TIMEOUT_SECS", "60")?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        api_timeout_secs,
        render_wait_secs,
        render_settle_ms,
        page_delay_ms,
        page_delay_jitter_ms,
        api_result_limit,
        import_batch_size,
        import_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s.trim().to_ascii_lowercase().as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
