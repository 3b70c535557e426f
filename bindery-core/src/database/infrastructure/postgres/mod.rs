//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::{CatalogError, Result};

pub use repositories::books::PostgresBookRepository;
pub use repositories::libraries::PostgresLibraryRepository;
pub use repositories::read_lists::PostgresReadListRepository;

/// Connection pool plus constructors for the per-port repositories.
#[derive(Clone, Debug)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| CatalogError::Internal(format!("Migration failed: {e}")))?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn read_lists(&self) -> PostgresReadListRepository {
        PostgresReadListRepository::new(self.pool.clone())
    }

    pub fn books(&self) -> PostgresBookRepository {
        PostgresBookRepository::new(self.pool.clone())
    }

    pub fn libraries(&self) -> PostgresLibraryRepository {
        PostgresLibraryRepository::new(self.pool.clone())
    }
}
