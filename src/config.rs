use std::{env, net::IpAddr, str::FromStr};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::errors::ConfigError;

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    /// Diagnostic text from upstream failures is only exposed outside production
    pub fn exposes_diagnostics(&self) -> bool {
        *self != Environment::Production
    }
}

// Implement FromStr trait for Environment enum to enable parsing from string
impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

// Result type for configuration functions
type ConfigResult<T> = Result<T, ConfigError>;

/// Lead intake: where submissions are relayed and how hard they are throttled
#[derive(Debug, Clone)]
pub struct LeadsConfig {
    pub form_endpoint: Option<String>,
    pub rate_limit_window_ms: u64,
    pub rate_limit_max_requests: u32,
}

/// Google Places access used to build the testimonials summary
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    pub place_id: Option<String>,
    pub business_query: String,
    pub api_base_url: String,
    pub legacy_api_base_url: String,
    pub revalidate_secs: u64,
}

// Public site settings
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub url: Option<String>,
}

// Outbound HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout_secs: u64,
}

// Config struct that matches our environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub leads: LeadsConfig,
    pub places: PlacesConfig,
    pub site: SiteConfig,
    pub http: HttpClientConfig,
}

pub const DEFAULT_BUSINESS_QUERY: &str = "Blue Bunny Turnover Services Orlando";
pub const DEFAULT_PLACES_API_BASE_URL: &str = "https://places.googleapis.com/v1";
pub const DEFAULT_PLACES_LEGACY_API_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        // Load .env file if it exists
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => warn!("Could not load .env file: {}", e),
        }

        // Create the server config
        let server = ServerConfig {
            host: get_env_or_default("SERVER_HOST", "127.0.0.1")?,
            port: get_env_or_default("SERVER_PORT", "8000")?,
            workers: get_env_or_default("SERVER_WORKERS", "4")?,
        };

        // Get version from Cargo.toml or environment
        let version = option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string();

        // Create the app config
        let app = AppConfig {
            name: get_env_or_default("APP_NAME", "bluebunny-site")?,
            version: env::var("APP_VERSION").unwrap_or(version),
            environment: get_env_or_default("APP_ENVIRONMENT", "development")?,
            log_level: get_env_or_default("RUST_LOG", "info")?,
        };

        let form_endpoint = get_env_optional("FORMSPREE_ENDPOINT")?;
        if let Some(endpoint) = &form_endpoint {
            url::Url::parse(endpoint).map_err(|e| ConfigError::InvalidValue {
                key: "FORMSPREE_ENDPOINT".to_string(),
                reason: e.to_string(),
            })?;
        }

        let leads = LeadsConfig {
            form_endpoint,
            rate_limit_window_ms: get_env_or_default("LEADS_RATE_LIMIT_WINDOW_MS", "600000")?,
            rate_limit_max_requests: get_env_or_default("LEADS_RATE_LIMIT_MAX_REQUESTS", "2")?,
        };

        let places = PlacesConfig {
            api_key: get_env_optional("GOOGLE_PLACES_API_KEY")?,
            place_id: get_env_optional("GOOGLE_PLACE_ID")?,
            business_query: get_env_or_default("GOOGLE_BUSINESS_QUERY", DEFAULT_BUSINESS_QUERY)?,
            api_base_url: get_env_or_default("PLACES_API_BASE_URL", DEFAULT_PLACES_API_BASE_URL)?,
            legacy_api_base_url: get_env_or_default(
                "PLACES_LEGACY_API_BASE_URL",
                DEFAULT_PLACES_LEGACY_API_BASE_URL,
            )?,
            revalidate_secs: get_env_or_default("PLACES_REVALIDATE_SECS", "21600")?,
        };

        let site = SiteConfig {
            url: get_env_optional("SITE_URL")?,
        };

        let http = HttpClientConfig {
            timeout_secs: get_env_or_default("HTTP_TIMEOUT_SECS", "10")?,
        };

        let config = Config {
            server,
            app,
            leads,
            places,
            site,
            http,
        };
        info!("Configuration loaded successfully");

        Ok(config)
    }
}

/// Helper function to get an env variable with a default value
fn get_env_or_default<T: std::str::FromStr>(key: &str, default: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}

/// Optional variables; blank values count as unset
fn get_env_optional(key: &str) -> ConfigResult<Option<String>> {
    match env::var(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => Ok(Some(val.trim().to_string())),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set", key);
            Ok(None)
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}
