//! Layered configuration: environment, then `bindery.toml`, then defaults.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    ApiKeyConfig, CatalogConfig, Config, ConfigMetadata, DatabaseConfig, PaginationConfig,
    ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
