use crate::app_config::{AppConfig, Environment};
use crate::display::{parse_utc_offset, TimestampFormat, DEFAULT_TIMESTAMP_PATTERN};
use crate::signoff::SignoffStrategy;
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
/// Unlike [`load_app_config`], this does NOT load `.env` files, which suits tests
/// and callers that manage env setup themselves.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup with no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("HANDOFF_ENV", "development"))?;

    let bind_addr = parse_addr("HANDOFF_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("HANDOFF_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("HANDOFF_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("HANDOFF_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("HANDOFF_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "HANDOFF_DB_MIN_CONNECTIONS",
            format!(
                "must not exceed HANDOFF_DB_MAX_CONNECTIONS ({db_min_connections} > {db_max_connections})"
            ),
        ));
    }

    let raw_mode = or_default("HANDOFF_SIGNOFF_MODE", "log");
    let signoff_strategy = SignoffStrategy::parse(&raw_mode).ok_or_else(|| {
        invalid(
            "HANDOFF_SIGNOFF_MODE",
            format!("expected 'log' or 'denormalized', got '{raw_mode}'"),
        )
    })?;

    let raw_offset = or_default("HANDOFF_DISPLAY_UTC_OFFSET", "+00:00");
    let offset = parse_utc_offset(&raw_offset).ok_or_else(|| {
        invalid(
            "HANDOFF_DISPLAY_UTC_OFFSET",
            format!("expected an offset like '+05:30' or 'Z', got '{raw_offset}'"),
        )
    })?;

    let pattern = or_default("HANDOFF_TIMESTAMP_FORMAT", DEFAULT_TIMESTAMP_PATTERN);
    let timestamp_format = TimestampFormat::new(offset, &pattern).map_err(|reason| {
        invalid("HANDOFF_TIMESTAMP_FORMAT", reason)
    })?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        signoff_strategy,
        timestamp_format,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HANDOFF_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
