use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use bindery_model::{
    BookId, LibraryId, Page, PageRequest, ReadList, ReadListId, Sort, SortField, SortOrder,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{begin_snapshot, contains_pattern, limit_offset};
use crate::database::ports::ReadListRepository;
use crate::domain::read_list::visible_view;
use crate::error::{CatalogError, Result};

#[derive(Debug, FromRow)]
struct ReadListRow {
    id: Uuid,
    name: String,
    summary: String,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MembershipRow {
    read_list_id: Uuid,
    book_id: Uuid,
    library_id: Option<Uuid>,
}

/// Loaded membership for a set of read lists, in position order.
#[derive(Default)]
struct Membership {
    book_ids: HashMap<ReadListId, Vec<BookId>>,
    libraries: HashMap<BookId, LibraryId>,
}

#[derive(Clone, Debug)]
pub struct PostgresReadListRepository {
    pool: PgPool,
}

impl PostgresReadListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn order_clause(sort: Sort) -> &'static str {
        match (sort.field, sort.order) {
            (SortField::CreatedAt, SortOrder::Ascending) => "rl.created_at ASC, rl.id ASC",
            (SortField::CreatedAt, SortOrder::Descending) => "rl.created_at DESC, rl.id DESC",
            (SortField::LastModifiedAt, SortOrder::Ascending) => {
                "rl.last_modified_at ASC, rl.id ASC"
            }
            (SortField::LastModifiedAt, SortOrder::Descending) => {
                "rl.last_modified_at DESC, rl.id DESC"
            }
            (_, SortOrder::Ascending) => "lower(rl.name) ASC, rl.name ASC, rl.id ASC",
            (_, SortOrder::Descending) => "lower(rl.name) DESC, rl.name DESC, rl.id DESC",
        }
    }

    /// Shared listing query. `libraries = None` skips the membership filter.
    async fn list(
        &self,
        libraries: Option<Vec<Uuid>>,
        permitted: Option<&BTreeSet<LibraryId>>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<ReadList>> {
        let pattern = search.map(contains_pattern);
        let filter = r#"
            WHERE ($1::text IS NULL OR rl.name ILIKE $1)
              AND (
                $2::uuid[] IS NULL OR EXISTS (
                    SELECT 1
                    FROM read_list_books rlb
                    JOIN books b ON b.id = rlb.book_id
                    WHERE rlb.read_list_id = rl.id
                      AND b.library_id = ANY($2)
                )
              )
        "#;

        let mut tx = begin_snapshot(self.pool()).await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM read_lists rl {filter}"))
            .bind(pattern.as_deref())
            .bind(libraries.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let (limit, offset) = limit_offset(page);
        let sql = format!(
            r#"
            SELECT rl.id, rl.name, rl.summary, rl.created_at, rl.last_modified_at
            FROM read_lists rl
            {filter}
            ORDER BY {order}
            LIMIT $3 OFFSET $4
            "#,
            order = Self::order_clause(page.sort),
        );
        let rows: Vec<ReadListRow> = sqlx::query_as(&sql)
            .bind(pattern.as_deref())
            .bind(libraries.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut membership = Self::load_membership(&mut *tx, &ids).await?;
        tx.commit().await?;
        let content = rows
            .into_iter()
            .map(|row| assemble(row, &mut membership, permitted))
            .collect();

        Ok(Page::new(content, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn fetch_row(conn: &mut PgConnection, id: ReadListId) -> Result<Option<ReadListRow>> {
        let row: Option<ReadListRow> = sqlx::query_as(
            r#"
            SELECT rl.id, rl.name, rl.summary, rl.created_at, rl.last_modified_at
            FROM read_lists rl
            WHERE rl.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    async fn load_membership(
        conn: &mut PgConnection,
        read_list_ids: &[Uuid],
    ) -> Result<Membership> {
        if read_list_ids.is_empty() {
            return Ok(Membership::default());
        }

        let rows: Vec<MembershipRow> = sqlx::query_as(
            r#"
            SELECT rlb.read_list_id, rlb.book_id, b.library_id
            FROM read_list_books rlb
            LEFT JOIN books b ON b.id = rlb.book_id
            WHERE rlb.read_list_id = ANY($1)
            ORDER BY rlb.read_list_id, rlb.position
            "#,
        )
        .bind(read_list_ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut membership = Membership::default();
        for row in rows {
            let book_id = BookId(row.book_id);
            membership
                .book_ids
                .entry(ReadListId(row.read_list_id))
                .or_default()
                .push(book_id);
            if let Some(library_id) = row.library_id {
                membership.libraries.insert(book_id, LibraryId(library_id));
            }
        }
        Ok(membership)
    }

    async fn write_members(
        tx: &mut Transaction<'_, Postgres>,
        read_list: &ReadList,
    ) -> Result<()> {
        let (book_ids, positions): (Vec<Uuid>, Vec<i32>) = read_list
            .positions()
            .map(|(book_id, position)| (book_id.to_uuid(), position as i32))
            .unzip();

        sqlx::query(
            r#"
            INSERT INTO read_list_books (read_list_id, book_id, position)
            SELECT $1, book_id, position
            FROM UNNEST($2::uuid[], $3::int[]) AS m(book_id, position)
            "#,
        )
        .bind(read_list.id.as_uuid())
        .bind(&book_ids)
        .bind(&positions)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

fn assemble(
    row: ReadListRow,
    membership: &mut Membership,
    permitted: Option<&BTreeSet<LibraryId>>,
) -> ReadList {
    let id = ReadListId(row.id);
    let read_list = ReadList {
        id,
        name: row.name,
        summary: row.summary,
        book_ids: membership.book_ids.remove(&id).unwrap_or_default(),
        filtered: false,
        created_at: row.created_at,
        last_modified_at: row.last_modified_at,
    };

    match permitted {
        None => read_list,
        Some(permitted) => visible_view(read_list, |book_id| {
            membership
                .libraries
                .get(book_id)
                .is_some_and(|library_id| permitted.contains(library_id))
        }),
    }
}

/// Rewraps a name-constraint violation with the name that caused it.
fn name_conflict(err: sqlx::Error, name: &str) -> CatalogError {
    match CatalogError::from(err) {
        CatalogError::DuplicateName { .. } => CatalogError::duplicate_name(name),
        other => other,
    }
}

#[async_trait]
impl ReadListRepository for PostgresReadListRepository {
    async fn find_all(&self, search: Option<&str>, page: &PageRequest) -> Result<Page<ReadList>> {
        self.list(None, None, search, page).await
    }

    async fn find_all_by_libraries(
        &self,
        requested: &BTreeSet<LibraryId>,
        permitted: Option<&BTreeSet<LibraryId>>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<ReadList>> {
        let effective: Vec<Uuid> = requested
            .iter()
            .filter(|id| permitted.is_none_or(|ids| ids.contains(*id)))
            .map(LibraryId::to_uuid)
            .collect();
        self.list(Some(effective), permitted, search, page).await
    }

    async fn find_by_id_scoped(
        &self,
        id: ReadListId,
        permitted: Option<&BTreeSet<LibraryId>>,
    ) -> Result<Option<ReadList>> {
        let mut conn = self.pool().acquire().await?;
        let Some(row) = Self::fetch_row(&mut conn, id).await? else {
            return Ok(None);
        };
        let mut membership = Self::load_membership(&mut conn, &[row.id]).await?;

        if let Some(permitted) = permitted
            && !membership
                .libraries
                .values()
                .any(|library_id| permitted.contains(library_id))
        {
            return Ok(None);
        }

        Ok(Some(assemble(row, &mut membership, permitted)))
    }

    async fn find_by_id(&self, id: ReadListId) -> Result<Option<ReadList>> {
        let mut conn = self.pool().acquire().await?;
        let Some(row) = Self::fetch_row(&mut conn, id).await? else {
            return Ok(None);
        };

        let mut membership = Self::load_membership(&mut conn, &[row.id]).await?;
        Ok(Some(assemble(row, &mut membership, None)))
    }

    async fn create(&self, read_list: ReadList) -> Result<ReadList> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO read_lists (id, name, summary, created_at, last_modified_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(read_list.id.as_uuid())
        .bind(&read_list.name)
        .bind(&read_list.summary)
        .bind(read_list.created_at)
        .bind(read_list.last_modified_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| name_conflict(e, &read_list.name))?;

        Self::write_members(&mut tx, &read_list).await?;
        tx.commit().await?;

        Ok(read_list)
    }

    async fn update(&self, read_list: &ReadList) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE read_lists
            SET name = $2, summary = $3, last_modified_at = $4
            WHERE id = $1
            "#,
        )
        .bind(read_list.id.as_uuid())
        .bind(&read_list.name)
        .bind(&read_list.summary)
        .bind(read_list.last_modified_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| name_conflict(e, &read_list.name))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::read_list_not_found(read_list.id));
        }

        sqlx::query("DELETE FROM read_list_books WHERE read_list_id = $1")
            .bind(read_list.id.as_uuid())
            .execute(&mut *tx)
            .await?;
        Self::write_members(&mut tx, read_list).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: ReadListId) -> Result<()> {
        let result = sqlx::query("DELETE FROM read_lists WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::read_list_not_found(id));
        }
        Ok(())
    }
}
