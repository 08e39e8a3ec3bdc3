use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use axum_extra::extract::cookie::Key;
use secrecy::{ExposeSecret, SecretString};

use crate::class_year::Rollover;

const DEFAULT_TIME_ZONE: &str = "America/Chicago";
/// Signed cookies derive their key from the session secret and need at least
/// this much input.
const MIN_SESSION_SECRET_BYTES: usize = 32;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub session: SessionConfig,
    pub class_years: ClassYearConfig,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug)]
pub struct SessionConfig {
    pub secret: SecretString,
    pub ttl_days: i64,
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Key for signed cookies, derived from the session secret.
    pub fn cookie_key(&self) -> Result<Key> {
        let secret = self.secret.expose_secret().as_bytes();
        if secret.len() < MIN_SESSION_SECRET_BYTES {
            return Err(anyhow!(
                "SESSION_SECRET must be at least {MIN_SESSION_SECRET_BYTES} bytes"
            ));
        }
        Ok(Key::derive_from(secret))
    }
}

/// Inputs of the class-year window: where "today" is measured and when the
/// window rolls over.
#[derive(Debug, Clone, Copy)]
pub struct ClassYearConfig {
    pub time_zone: Tz,
    pub rollover: Rollover,
}

impl Default for ClassYearConfig {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::America::Chicago,
            rollover: Rollover::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            session: SessionConfig {
                secret: parse_session_secret(require_env("SESSION_SECRET")?)?,
                ttl_days: optional_env("SESSION_TTL_DAYS", 14)?,
                cookie_secure: optional_env("SESSION_COOKIE_SECURE", false)?,
            },
            class_years: ClassYearConfig {
                time_zone: parse_time_zone(
                    &std::env::var("TIME_ZONE").unwrap_or_else(|_| DEFAULT_TIME_ZONE.to_string()),
                )?,
                rollover: parse_rollover(
                    optional_env("CLASS_YEAR_ROLLOVER_MONTH", 7)?,
                    optional_env("CLASS_YEAR_ROLLOVER_DAY", 1)?,
                )?,
            },
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

fn parse_session_secret(raw: String) -> Result<SecretString> {
    if raw.len() < MIN_SESSION_SECRET_BYTES {
        return Err(anyhow!(
            "SESSION_SECRET must be at least {MIN_SESSION_SECRET_BYTES} bytes, got {}",
            raw.len()
        ));
    }
    Ok(SecretString::from(raw))
}

fn parse_time_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("TIME_ZONE '{name}' is not a known IANA zone: {e}"))
}

/// Rejects boundaries that never occur in a calendar year. 2024 is a leap
/// year so Feb 29 stays allowed.
fn parse_rollover(month: u32, day: u32) -> Result<Rollover> {
    NaiveDate::from_ymd_opt(2024, month, day)
        .with_context(|| format!("class-year rollover {month}/{day} is not a valid date"))?;
    Ok(Rollover { month, day })
}
