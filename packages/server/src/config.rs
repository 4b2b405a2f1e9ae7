use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{
    FilesystemStorageConfig, S3StorageConfig, StorageBackend, StorageConfig,
};

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
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    20
}

/// Constraints applied to every upload.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted file in bytes. Default: 10 MiB.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Accepted MIME types. Default: PDF, JPEG, PNG, WEBP.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    /// Whether course and specialization must accompany every upload. Default: true.
    #[serde(default = "default_require_taxonomy")]
    pub require_taxonomy: bool,
}

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}
fn default_allowed_types() -> Vec<String> {
    ["application/pdf", "image/jpeg", "image/png", "image/webp"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_require_taxonomy() -> bool {
    true
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
            require_taxonomy: default_require_taxonomy(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Populate the built-in course taxonomy on startup. Default: true.
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

fn default_seed_enabled() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("LIBRARY_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("storage.backend", "filesystem")?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., LIBRARY__DATABASE__URL)
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .with_list_parse_key("upload.allowed_types")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
