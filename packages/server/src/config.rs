use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL; uploaded image references are built from it.
    pub public_url: String,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret. Has no default: startup fails when it is unset.
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// Largest accepted image, in bytes.
    pub max_image_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    /// Default page size of the upcoming-events listing.
    pub upcoming_limit: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub events: EventsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.public_url", "http://127.0.0.1:3000")?
            .set_default("database.url", "sqlite://petpal.db?mode=rwc")?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("storage.upload_dir", "./uploads")?
            .set_default("storage.max_image_size", 10_i64 * 1024 * 1024)?
            .set_default("events.upcoming_limit", 10)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PETPAL__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("PETPAL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set (PETPAL__AUTH__JWT_SECRET)".into(),
            ));
        }
        if !(1..=3650).contains(&self.auth.token_ttl_days) {
            return Err(ConfigError::Message(
                "auth.token_ttl_days must be between 1 and 3650".into(),
            ));
        }
        if self.events.upcoming_limit == 0 {
            return Err(ConfigError::Message(
                "events.upcoming_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Public URL of a stored image.
    pub fn image_url(&self, name: &str) -> String {
        format!(
            "{}/uploads/{}",
            self.server.public_url.trim_end_matches('/'),
            name
        )
    }
}
