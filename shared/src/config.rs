//! Runtime configuration, read once from the environment at cold start.

use std::time::Duration;

use driverdesk_atoms::storage::UrlPolicy;
use thiserror::Error;

pub const DEFAULT_TABLE_NAME: &str = "driverdesk";
pub const DEFAULT_BUCKET_NAME: &str = "driverdesk-documents";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://app.driverdesk.io";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid number of seconds: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub bucket_name: String,
    pub cognito_user_pool_id: String,
    pub cognito_client_id: String,
    pub allowed_origins: Vec<String>,
    pub url_policy: UrlPolicy,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));
        let seconds = |name: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match var(name) {
                None => Ok(Duration::from_secs(default)),
                Some(value) => match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                    _ => Err(ConfigError::InvalidNumber { name, value }),
                },
            }
        };

        let defaults = UrlPolicy::default();
        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            table_name: var("TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            bucket_name: var("S3_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string()),
            cognito_user_pool_id: required("COGNITO_USER_POOL_ID")?,
            cognito_client_id: required("COGNITO_CLIENT_ID")?,
            allowed_origins: if allowed_origins.is_empty() {
                vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
            } else {
                allowed_origins
            },
            url_policy: UrlPolicy {
                upload_ttl: seconds("UPLOAD_URL_TTL_SECS", defaults.upload_ttl.as_secs())?,
                download_ttl: seconds("VIEW_URL_TTL_SECS", defaults.download_ttl.as_secs())?,
            },
            log_format: match var("LOG_FORMAT").as_deref() {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        })
    }

    /// Config for tests and local runs against in-memory adapters.
    pub fn local() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            cognito_user_pool_id: "local".to_string(),
            cognito_client_id: "local".to_string(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            url_policy: UrlPolicy::default(),
            log_format: LogFormat::Text,
        }
    }
}
