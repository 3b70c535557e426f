use std::fmt;
use std::path::PathBuf;

use bindery_model::{LibraryId, UserId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 500;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub pagination: PaginationConfig,
    pub api_keys: Vec<ApiKeyConfig>,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn uses_postgres(&self) -> bool {
        self.database.url.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. `None` selects the in-memory catalog.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// JSON seed loaded into the in-memory catalog at startup.
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// A bearer key and the caller it authenticates.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiKeyConfig {
    pub key: String,
    pub user_id: UserId,
    #[serde(default)]
    pub admin: bool,
    /// Libraries the key may see; absent means every library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libraries: Option<Vec<LibraryId>>,
}

impl fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("key", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("admin", &self.admin)
            .field("libraries", &self.libraries)
            .finish()
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
