use std::collections::BTreeSet;

use async_trait::async_trait;
use bindery_model::{Library, LibraryId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::ports::LibraryRepository;
use crate::error::Result;

#[derive(Debug, FromRow)]
struct LibraryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<LibraryRow> for Library {
    fn from(row: LibraryRow) -> Self {
        Library {
            id: LibraryId(row.id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostgresLibraryRepository {
    pool: PgPool,
}

impl PostgresLibraryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LibraryRepository for PostgresLibraryRepository {
    async fn list_libraries(&self, permitted: Option<&BTreeSet<LibraryId>>) -> Result<Vec<Library>> {
        let permitted: Option<Vec<Uuid>> =
            permitted.map(|ids| ids.iter().map(LibraryId::to_uuid).collect());

        let rows: Vec<LibraryRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at
            FROM libraries
            WHERE $1::uuid[] IS NULL OR id = ANY($1)
            ORDER BY lower(name), id
            "#,
        )
        .bind(permitted.as_deref())
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Library::from).collect())
    }

    async fn get_library(&self, id: LibraryId) -> Result<Option<Library>> {
        let row: Option<LibraryRow> =
            sqlx::query_as("SELECT id, name, created_at FROM libraries WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(Library::from))
    }
}
