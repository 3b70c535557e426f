use std::collections::BTreeSet;

use async_trait::async_trait;
use bindery_model::{LibraryId, Page, PageRequest, ReadList, ReadListId};

use crate::error::Result;

/// Storage for read lists.
///
/// Listing methods honor `page.sort`; searches match a case-insensitive
/// substring of the name. Scoped lookups return the visible view of a read
/// list: only members whose book lives in a permitted library, with
/// `filtered` set when any were hidden.
#[async_trait]
pub trait ReadListRepository: Send + Sync {
    /// Every read list, optionally narrowed by a name search.
    async fn find_all(&self, search: Option<&str>, page: &PageRequest) -> Result<Page<ReadList>>;

    /// Read lists with at least one member in `requested ∩ permitted`.
    /// `permitted = None` means no ceiling.
    async fn find_all_by_libraries(
        &self,
        requested: &BTreeSet<LibraryId>,
        permitted: Option<&BTreeSet<LibraryId>>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<ReadList>>;

    /// Scoped lookup. A read list none of whose members fall in `permitted`
    /// is reported as absent.
    async fn find_by_id_scoped(
        &self,
        id: ReadListId,
        permitted: Option<&BTreeSet<LibraryId>>,
    ) -> Result<Option<ReadList>>;

    /// Unscoped lookup for mutation paths.
    async fn find_by_id(&self, id: ReadListId) -> Result<Option<ReadList>>;

    /// Inserts a read list. Fails with `DuplicateName` when the name is taken;
    /// the check and the write are atomic.
    async fn create(&self, read_list: ReadList) -> Result<ReadList>;

    /// Replaces the stored read list wholesale. Fails with `DuplicateName`
    /// when the new name belongs to another read list and `NotFound` when the
    /// id is gone.
    async fn update(&self, read_list: &ReadList) -> Result<()>;

    /// Removes a read list and its membership. `NotFound` when absent.
    async fn delete(&self, id: ReadListId) -> Result<()>;
}
