use std::env;
use std::time::Duration as StdDuration;

use auth::AuthConfig;
use auth::AuthConfigError;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for user-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// PostgreSQL database configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
}

/// IMDb chart scraper configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScraperConfig {
    pub url: String,
    /// Outbound proxies used round-robin; empty means direct connections.
    pub proxies: Vec<String>,
    pub timeout_secs: u64,
    /// Pause after each chart fetch.
    pub cooldown_ms: u64,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: "https://www.imdb.com/chart/top".to_string(),
            proxies: Vec::new(),
            timeout_secs: 10,
            cooldown_ms: 1000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.timeout_secs)
    }

    pub fn cooldown(&self) -> StdDuration {
        StdDuration::from_millis(self.cooldown_ms)
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_minutes() -> i64 {
    AuthConfig::DEFAULT_ACCESS_TOKEN_MINUTES
}

fn default_refresh_token_days() -> i64 {
    AuthConfig::DEFAULT_REFRESH_TOKEN_DAYS
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .finish()
    }
}

impl JwtConfig {
    /// Build the token settings shared by the authentication core.
    ///
    /// # Errors
    /// * `EmptySecret` - No signing secret configured
    /// * `NonPositiveLifetime` - A lifetime is zero, negative or out of range
    pub fn to_auth_config(&self) -> Result<AuthConfig, AuthConfigError> {
        let access = Duration::try_minutes(self.access_token_minutes)
            .ok_or(AuthConfigError::NonPositiveLifetime("access"))?;
        let refresh = Duration::try_days(self.refresh_token_days)
            .ok_or(AuthConfigError::NonPositiveLifetime("refresh"))?;

        AuthConfig::new(self.secret.as_bytes())?.with_lifetimes(access, refresh)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scraper.proxies")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
