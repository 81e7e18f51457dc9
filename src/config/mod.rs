use crate::util::env::{get_bool_from_env_or, get_env_or, get_size_from_env_or, get_vec_from_env_or, load_dotenv};
use anyhow::{Context, Result};
use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;

pub mod secret;

pub use secret::Secret;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub secret: Secret,
    pub http: HTTPConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct HTTPConfig {
    pub ip: String,
    pub port: u16,
    pub max_body_size: u64,
    pub cors: CORSConfig,
}

#[derive(Debug, Clone)]
pub struct CORSConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub log_requests: bool,
}

impl AppConfig {
    /// Builds the whole configuration from the process environment.
    /// Unset variables take their defaults; unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        let secret = get_env_or("SECRET_TOKEN", Secret::default())?;

        Ok(AppConfig {
            secret,
            http: HTTPConfig::from_env()?,
            log: LogConfig::from_env()?,
        })
    }

    pub fn validate_config(&self) {
        if self.secret.is_default() {
            warn!("SECRET_TOKEN is not set, falling back to the placeholder secret");
        }
        if self.http.cors.allow_credentials && self.http.cors.has_wildcard() {
            warn!("CORS_ALLOW_CREDENTIALS is ignored when a CORS setting is `*`");
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.http.ip, self.http.port)
    }
}

impl Default for HTTPConfig {
    fn default() -> Self {
        HTTPConfig {
            ip: "0.0.0.0".to_string(),
            port: 5000,
            max_body_size: 64 * 1024,
            cors: CORSConfig::default(),
        }
    }
}

impl HTTPConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = HTTPConfig::default();

        Ok(HTTPConfig {
            ip: get_env_or("HTTP_IP", defaults.ip)?,
            port: get_env_or("PORT", defaults.port)?,
            max_body_size: get_size_from_env_or("HTTP_MAX_BODY_SIZE", defaults.max_body_size)?,
            cors: CORSConfig::from_env()?,
        })
    }
}

impl Default for CORSConfig {
    fn default() -> Self {
        CORSConfig {
            allowed_origins: vec![],
            allowed_methods: strs_to_strings(&["POST", "OPTIONS"]),
            allowed_headers: strs_to_strings(&["Content-Type", "X-Secret"]),
            allow_credentials: false,
            max_age: 86400,
        }
    }
}

impl CORSConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = CORSConfig::default();

        Ok(CORSConfig {
            allowed_origins: get_vec_from_env_or("CORS_ALLOWED_ORIGINS", defaults.allowed_origins)?,
            allowed_methods: get_vec_from_env_or("CORS_ALLOWED_METHODS", defaults.allowed_methods)?,
            allowed_headers: get_vec_from_env_or("CORS_ALLOWED_HEADERS", defaults.allowed_headers)?,
            allow_credentials: get_bool_from_env_or("CORS_ALLOW_CREDENTIALS", defaults.allow_credentials)?,
            max_age: get_env_or("CORS_MAX_AGE", defaults.max_age)?,
        })
    }

    pub fn into_layer(self) -> Result<CorsLayer> {
        let mut cors = CorsLayer::new();

        cors = if is_wildcard(&self.allowed_origins) {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(AllowOrigin::list(convert_vec(&self.allowed_origins).context("CORS_ALLOWED_ORIGINS")?))
        };

        cors = if is_wildcard(&self.allowed_methods) {
            cors.allow_methods(Any)
        } else {
            cors.allow_methods(AllowMethods::list(convert_vec(&self.allowed_methods).context("CORS_ALLOWED_METHODS")?))
        };

        cors = if is_wildcard(&self.allowed_headers) {
            cors.allow_headers(Any)
        } else {
            cors.allow_headers(AllowHeaders::list(convert_vec(&self.allowed_headers).context("CORS_ALLOWED_HEADERS")?))
        };

        // tower-http refuses credentials together with any wildcard
        let allow_credentials = self.allow_credentials && !self.has_wildcard();

        Ok(cors
            .allow_credentials(allow_credentials)
            .max_age(Duration::from_secs(self.max_age)))
    }

    fn has_wildcard(&self) -> bool {
        is_wildcard(&self.allowed_origins)
            || is_wildcard(&self.allowed_methods)
            || is_wildcard(&self.allowed_headers)
    }
}

impl LogConfig {
    pub fn from_env() -> Result<Self> {
        Ok(LogConfig {
            log_requests: get_bool_from_env_or("LOG_REQUESTS", false)?,
        })
    }
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

fn strs_to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// Parses header values, methods or origins from their string form
fn convert_vec<T: FromStr>(strings: &[String]) -> Result<Vec<T>>
where
    <T as FromStr>::Err: Debug,
{
    strings
        .iter()
        .map(|s| s.parse::<T>().map_err(|e| anyhow::anyhow!("invalid value {:?}: {:?}", s, e)))
        .collect()
}
