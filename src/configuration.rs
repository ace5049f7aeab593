use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub expiry: ExpirySettings,
    /// 이 프로젝트로 이슈를 생성하면 기존 이슈를 모두 지운다. 운영 환경에서는 비워 둔다.
    pub fixture_project: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct ExpirySettings {
    pub retention: Duration,
    pub sweep_interval: Duration,
}

impl DatabaseSettings {
    /// `DB_NAME` 이 있으면 URL 경로에 붙여 대상 데이터베이스를 고른다.
    pub fn connection_url(&self) -> String {
        match &self.name {
            Some(name) => format!("{}/{}", self.url.trim_end_matches('/'), name),
            None => self.url.clone(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            application: ApplicationSettings {
                host: get("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parse_or(get("APP_PORT"), "APP_PORT", 8080)?,
            },
            database: DatabaseSettings {
                url,
                name: get("DB_NAME"),
                max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_or(get("DB_MIN_CONNECTIONS"), "DB_MIN_CONNECTIONS", 5)?,
            },
            expiry: ExpirySettings {
                retention: Duration::from_secs(parse_or(
                    get("ISSUE_RETENTION_SECS"),
                    "ISSUE_RETENTION_SECS",
                    86_400,
                )?),
                sweep_interval: Duration::from_secs(parse_or(
                    get("EXPIRY_SWEEP_INTERVAL_SECS"),
                    "EXPIRY_SWEEP_INTERVAL_SECS",
                    60,
                )?),
            },
            fixture_project: get("FIXTURE_PROJECT"),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
