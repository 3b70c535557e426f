pub mod books;
pub mod libraries;
pub mod read_lists;

use bindery_model::PageRequest;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;

/// Read-only transaction whose statements all see one snapshot, so a page's
/// totals agree with its content.
pub(crate) async fn begin_snapshot(pool: &PgPool) -> Result<Transaction<'static, Postgres>> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// `LIMIT`/`OFFSET` binds for a page request. A `NULL` limit returns all rows.
pub(crate) fn limit_offset(page: &PageRequest) -> (Option<i64>, i64) {
    let (offset, limit) = page.offset_limit();
    (
        limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX)),
        i64::try_from(offset).unwrap_or(i64::MAX),
    )
}

/// Escapes `LIKE` metacharacters and wraps the term for substring matching.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
