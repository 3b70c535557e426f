use std::collections::BTreeSet;

use async_trait::async_trait;
use bindery_model::{LibraryId, Page, PageRequest, ReadListId, ReadListMember};

use crate::error::Result;

/// Storage for books as read-list members.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Members of a read list ordered by position.
    ///
    /// Books that no longer exist, or whose library is outside `permitted`,
    /// are skipped; the remaining members keep their original position.
    async fn find_by_read_list_id(
        &self,
        read_list_id: ReadListId,
        permitted: Option<&BTreeSet<LibraryId>>,
        page: &PageRequest,
    ) -> Result<Page<ReadListMember>>;
}
