use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, SearchRadius};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

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

/// Log filter directive from `RXDROP_LOG_LEVEL`, defaulting to `info`.
///
/// Reads only that variable, so logging can be set up before (and
/// regardless of) full configuration validation. Loads `.env` first.
#[must_use]
pub fn load_log_level() -> String {
    dotenvy::dotenv().ok();
    log_level_with(|key| std::env::var(key))
}

fn log_level_with<F>(lookup: F) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup("RXDROP_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("RXDROP_ENV", "development"));
    let log_level = log_level_with(&lookup);
    let optional = |var: &str| {
        lookup(var)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let results_url = optional("RXDROP_RESULTS_URL");
    let page_base_url = optional("RXDROP_PAGE_BASE_URL");

    let lookup_timeout_secs = parse_u64("RXDROP_LOOKUP_TIMEOUT_SECS", "30")?;
    if lookup_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RXDROP_LOOKUP_TIMEOUT_SECS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default("RXDROP_USER_AGENT", DEFAULT_USER_AGENT);

    let default_radius = or_default("RXDROP_DEFAULT_RADIUS", "20")
        .parse::<SearchRadius>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "RXDROP_DEFAULT_RADIUS".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        env,
        log_level,
        results_url,
        page_base_url,
        lookup_timeout_secs,
        user_agent,
        default_radius,
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
