use common::storage::s3::S3Config;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Which object store backs the blob listing endpoints.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Required when `backend = "s3"`.
    pub s3: Option<S3Config>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        layered()?.try_deserialize()
    }
}

/// Load a single top-level section (e.g. `"database"`) without requiring the
/// rest of the configuration to be present.
pub fn load_section<T: DeserializeOwned>(key: &str) -> Result<T, ConfigError> {
    layered()?.get(key)
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("server.cors.allow_origins", Vec::<String>::new())?
        .set_default("server.cors.max_age", 3600)?
        .set_default("storage.backend", "memory")
}

fn layered() -> Result<Config, ConfigError> {
    with_defaults()?
        // Load from config/config.toml
        .add_source(File::with_name("config/config").required(false))
        // Override from environment (e.g., CATALOG__AUTH__JWT_SECRET)
        .add_source(Environment::with_prefix("CATALOG").separator("__"))
        .build()
}
