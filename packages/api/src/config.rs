use std::env;
use std::fmt;

use axum::http::HeaderValue;
use shared::repositories::document_repository::TableNames;

pub const DEFAULT_PORT: u16 = 5003;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub access_token_secret: String,
    pub tables: TableNames,
    pub cors_origins: Vec<HeaderValue>,
    pub secure_cookies: bool,
    pub dynamodb_endpoint: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} environment variable must be set", name),
            ConfigError::Invalid { name, value } => {
                write!(f, "{} has an invalid value: {:?}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token_secret = lookup("ACCESS_TOKEN_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let defaults = TableNames::default();
        let tables = TableNames {
            services: lookup("SERVICES_TABLE").unwrap_or(defaults.services),
            bookings: lookup("BOOKINGS_TABLE").unwrap_or(defaults.bookings),
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let secure_cookies = match lookup("COOKIE_SECURE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: "COOKIE_SECURE",
                value,
            })?,
            None => true,
        };

        Ok(AppConfig {
            port,
            access_token_secret,
            tables,
            cors_origins,
            secure_cookies,
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|url| !url.is_empty()),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
