use std::collections::BTreeSet;

use async_trait::async_trait;
use bindery_model::{
    Book, BookId, LibraryId, Page, PageRequest, ReadListId, ReadListMember, SortField, SortOrder,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{begin_snapshot, limit_offset};
use crate::database::ports::BookRepository;
use crate::error::Result;

#[derive(Debug, FromRow)]
struct BookRow {
    id: Uuid,
    library_id: Uuid,
    title: String,
    number: Option<i32>,
    file_url: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: BookId(row.id),
            library_id: LibraryId(row.library_id),
            title: row.title,
            number: row.number.and_then(|n| u32::try_from(n).ok()),
            file_url: row.file_url,
        }
    }
}

#[derive(Debug, FromRow)]
struct MemberRow {
    #[sqlx(flatten)]
    book: BookRow,
    position: i32,
}

#[derive(Clone, Debug)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn find_by_read_list_id(
        &self,
        read_list_id: ReadListId,
        permitted: Option<&BTreeSet<LibraryId>>,
        page: &PageRequest,
    ) -> Result<Page<ReadListMember>> {
        let permitted: Option<Vec<Uuid>> =
            permitted.map(|ids| ids.iter().map(LibraryId::to_uuid).collect());
        let filter = r#"
            FROM read_list_books rlb
            JOIN books b ON b.id = rlb.book_id
            WHERE rlb.read_list_id = $1
              AND ($2::uuid[] IS NULL OR b.library_id = ANY($2))
        "#;

        let mut tx = begin_snapshot(self.pool()).await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {filter}"))
            .bind(read_list_id.as_uuid())
            .bind(permitted.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let order = match (page.sort.field, page.sort.order) {
            (SortField::Name, SortOrder::Ascending) => "lower(b.title) ASC, rlb.position ASC",
            (SortField::Name, SortOrder::Descending) => "lower(b.title) DESC, rlb.position DESC",
            (_, SortOrder::Ascending) => "rlb.position ASC",
            (_, SortOrder::Descending) => "rlb.position DESC",
        };
        let (limit, offset) = limit_offset(page);
        let sql = format!(
            r#"
            SELECT b.id, b.library_id, b.title, b.number, b.file_url, rlb.position
            {filter}
            ORDER BY {order}
            LIMIT $3 OFFSET $4
            "#
        );

        let rows: Vec<MemberRow> = sqlx::query_as(&sql)
            .bind(read_list_id.as_uuid())
            .bind(permitted.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        let content = rows
            .into_iter()
            .map(|row| ReadListMember {
                position: u32::try_from(row.position).unwrap_or_default(),
                book: row.book.into(),
            })
            .collect();

        Ok(Page::new(content, page, u64::try_from(total).unwrap_or(0)))
    }
}
