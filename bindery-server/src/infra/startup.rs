use std::sync::Arc;

use anyhow::Context;
use bindery_core::application::{LibraryService, ReadListService};
use bindery_core::database::{CatalogSeed, InMemoryCatalog, PostgresCatalog};
use tracing::{info, warn};

use super::app_state::{AppState, StorageKind};
use super::config::Config;

/// Opens the configured catalog and wires the services around it.
///
/// With a database URL the PostgreSQL catalog is connected and migrated;
/// otherwise an in-memory catalog is built, seeded from `catalog.seed_path`
/// when one is configured.
pub async fn build_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    match config.database.url.as_deref() {
        Some(url) => {
            let catalog = connect_postgres(url, config.database.max_connections).await?;
            catalog
                .migrate()
                .await
                .context("database migration failed")?;

            let read_lists = ReadListService::new(
                Arc::new(catalog.read_lists()),
                Arc::new(catalog.books()),
            );
            let libraries = LibraryService::new(Arc::new(catalog.libraries()));
            Ok(AppState::new(config, read_lists, libraries, StorageKind::Postgres))
        }
        None => {
            let catalog = Arc::new(open_memory_catalog(&config)?);
            let read_lists = ReadListService::new(catalog.clone(), catalog.clone());
            let libraries = LibraryService::new(catalog);
            Ok(AppState::new(config, read_lists, libraries, StorageKind::Memory))
        }
    }
}

pub async fn connect_postgres(url: &str, max_connections: u32) -> anyhow::Result<PostgresCatalog> {
    if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
        anyhow::bail!("Invalid database URL: must start with postgres:// or postgresql://");
    }

    let catalog = PostgresCatalog::connect(url, max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!(max_connections, "connected to PostgreSQL");
    Ok(catalog)
}

fn open_memory_catalog(config: &Config) -> anyhow::Result<InMemoryCatalog> {
    let Some(path) = config.catalog.seed_path.as_deref() else {
        warn!("no catalog seed configured; starting with an empty in-memory catalog");
        return Ok(InMemoryCatalog::new());
    };

    let seed = CatalogSeed::from_path(path)
        .with_context(|| format!("failed to read catalog seed {}", path.display()))?;
    let catalog = InMemoryCatalog::from_seed(seed)
        .with_context(|| format!("invalid catalog seed {}", path.display()))?;
    info!(path = %path.display(), "in-memory catalog seeded");
    Ok(catalog)
}
