use anyhow::{Context, Result};
use chrono_tz::Tz;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_ACQUIRE_TIMEOUT_SECONDS: u64 = 8;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub database_url: String,
    pub reporting_timezone: Tz,
    pub db_max_connections: u32,
    pub db_acquire_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl CoreConfig {
    pub fn from_env(cli_timezone: Option<String>) -> Result<Self> {
        let database_url = env_optional_string("OPS_DATABASE_URL")
            .context("OPS_DATABASE_URL must be set for the metrics server")?;
        let database_url = normalize_database_url(database_url);

        let requested_timezone = cli_timezone
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| env_optional_string("OPS_REPORTING_TIMEZONE"));
        let system_timezone = match iana_time_zone::get_timezone() {
            Ok(name) => Some(name),
            Err(err) => {
                tracing::warn!(error = %err, "failed to detect host timezone; using UTC");
                None
            }
        };
        let reporting_timezone =
            resolve_timezone(requested_timezone.as_deref(), system_timezone.as_deref())?;

        Ok(Self {
            database_url,
            reporting_timezone,
            db_max_connections: env_u32("OPS_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)
                .clamp(1, 64),
            db_acquire_timeout_seconds: env_u64(
                "OPS_DB_ACQUIRE_TIMEOUT_SECONDS",
                DEFAULT_DB_ACQUIRE_TIMEOUT_SECONDS,
            )
            .clamp(1, 60),
            request_timeout_seconds: env_u64(
                "OPS_REQUEST_TIMEOUT_SECONDS",
                DEFAULT_REQUEST_TIMEOUT_SECONDS,
            )
            .clamp(1, 300),
        })
    }
}

/// An explicitly requested zone must parse; a detected host zone that chrono-tz
/// does not know falls back to UTC.
pub(crate) fn resolve_timezone(requested: Option<&str>, system: Option<&str>) -> Result<Tz> {
    if let Some(name) = requested {
        return name
            .parse::<Tz>()
            .map_err(|err| anyhow::anyhow!("unknown reporting timezone {name:?}: {err}"));
    }
    let Some(name) = system else {
        return Ok(Tz::UTC);
    };
    match name.parse::<Tz>() {
        Ok(tz) => Ok(tz),
        Err(_) => {
            tracing::warn!(timezone = name, "host timezone not recognized; using UTC");
            Ok(Tz::UTC)
        }
    }
}

fn env_optional_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_database_url(url: String) -> String {
    if let Some(stripped) = url.strip_prefix("postgresql+psycopg://") {
        return format!("postgresql://{stripped}");
    }
    if let Some(stripped) = url.strip_prefix("postgresql+asyncpg://") {
        return format!("postgresql://{stripped}");
    }
    url
}
