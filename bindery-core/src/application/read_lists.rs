use std::collections::BTreeSet;
use std::sync::Arc;

use bindery_model::{
    BookId, LibraryId, Page, PageRequest, ReadList, ReadListId, ReadListMember, Sort,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::ports::{BookRepository, ReadListRepository};
use crate::domain::projection::{MemberProjection, project_member};
use crate::domain::read_list::{ReadListDraft, validate_book_ids, validate_name};
use crate::domain::scope::{Principal, ResolvedLibraryFilter, resolve_library_filter};
use crate::error::{CatalogError, Result};

pub const DEFAULT_MAX_PAGE_SIZE: u32 = 500;

/// Scoped read-list queries and administrative mutations.
///
/// Listings always come back in a fixed order (name for read lists, position
/// for members) whatever sort the caller asked for. Mutations require an
/// administrator and are checked before anything else runs.
#[derive(Clone)]
pub struct ReadListService {
    read_lists: Arc<dyn ReadListRepository>,
    books: Arc<dyn BookRepository>,
    max_page_size: u32,
}

impl std::fmt::Debug for ReadListService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadListService")
            .field("read_lists_repo", &Arc::strong_count(&self.read_lists))
            .field("books_repo", &Arc::strong_count(&self.books))
            .field("max_page_size", &self.max_page_size)
            .finish()
    }
}

impl ReadListService {
    pub fn new(read_lists: Arc<dyn ReadListRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self {
            read_lists,
            books,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    pub async fn list_read_lists(
        &self,
        principal: &Principal,
        options: ListReadListsOptions,
    ) -> Result<Page<ReadList>> {
        options.page.validate(self.max_page_size)?;
        let page = options.page.with_sort(Sort::by_name());

        let search = options
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());
        let requested = options.library_ids.filter(|ids| !ids.is_empty());

        let resolved = resolve_library_filter(requested.as_ref(), principal.scope.permitted());
        debug!(
            user_id = %principal.user_id,
            ?resolved,
            search = search.unwrap_or_default(),
            "listing read lists"
        );

        match resolved {
            ResolvedLibraryFilter::Everything => self.read_lists.find_all(search, &page).await,
            filter if filter.is_empty() => Ok(Page::new(Vec::new(), &page, 0)),
            ResolvedLibraryFilter::Libraries {
                requested,
                permitted,
            } => {
                self.read_lists
                    .find_all_by_libraries(&requested, permitted.as_ref(), search, &page)
                    .await
            }
        }
    }

    pub async fn get_read_list(&self, principal: &Principal, id: ReadListId) -> Result<ReadList> {
        self.read_lists
            .find_by_id_scoped(id, principal.scope.permitted())
            .await?
            .ok_or_else(|| CatalogError::read_list_not_found(id))
    }

    /// Members of a read list in position order, with admin-only fields
    /// stripped for everyone else.
    pub async fn list_members(
        &self,
        principal: &Principal,
        id: ReadListId,
        page: PageRequest,
    ) -> Result<Page<ReadListMember>> {
        page.validate(self.max_page_size)?;
        let page = page.with_sort(Sort::by_position());

        let read_list = self.get_read_list(principal, id).await?;
        let members = self
            .books
            .find_by_read_list_id(read_list.id, principal.scope.permitted(), &page)
            .await?;

        let projection = MemberProjection::for_principal(principal);
        Ok(members.map(|member| project_member(member, projection)))
    }

    pub async fn create_read_list(
        &self,
        principal: &Principal,
        command: CreateReadListCommand,
    ) -> Result<ReadList> {
        Self::require_admin(principal, "create read lists")?;

        let draft = ReadListDraft::new(&command.name, command.summary, command.book_ids)?;
        let read_list = self
            .read_lists
            .create(draft.into_read_list())
            .await
            .inspect_err(|err| {
                if let CatalogError::DuplicateName { name } = err {
                    warn!(name = %name, "rejected read list with duplicate name");
                }
            })?;

        info!(
            read_list_id = %read_list.id,
            name = %read_list.name,
            books = read_list.len(),
            created_by = %principal.user_id,
            "read list created"
        );
        Ok(read_list)
    }

    /// Applies the supplied fields; absent fields keep their stored value and
    /// a supplied book list replaces the old one entirely. An update that
    /// supplies nothing writes nothing.
    pub async fn update_read_list(
        &self,
        principal: &Principal,
        id: ReadListId,
        command: UpdateReadListCommand,
    ) -> Result<()> {
        Self::require_admin(principal, "update read lists")?;

        let name = command.name.as_deref().map(validate_name).transpose()?;
        if let Some(book_ids) = &command.book_ids {
            validate_book_ids(book_ids)?;
        }

        let mut read_list = self
            .read_lists
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::read_list_not_found(id))?;

        if name.is_none() && command.summary.is_none() && command.book_ids.is_none() {
            debug!(read_list_id = %id, "empty read list update; nothing to write");
            return Ok(());
        }

        if let Some(name) = name {
            read_list.name = name;
        }
        if let Some(summary) = command.summary {
            read_list.summary = summary;
        }
        if let Some(book_ids) = command.book_ids {
            read_list.book_ids = book_ids;
        }
        read_list.last_modified_at = Utc::now();

        self.read_lists.update(&read_list).await?;

        info!(
            read_list_id = %id,
            name = %read_list.name,
            books = read_list.len(),
            updated_by = %principal.user_id,
            "read list updated"
        );
        Ok(())
    }

    pub async fn delete_read_list(&self, principal: &Principal, id: ReadListId) -> Result<()> {
        Self::require_admin(principal, "delete read lists")?;

        self.read_lists.delete(id).await?;

        info!(read_list_id = %id, deleted_by = %principal.user_id, "read list deleted");
        Ok(())
    }

    fn require_admin(principal: &Principal, action: &str) -> Result<()> {
        if principal.is_admin {
            Ok(())
        } else {
            warn!(user_id = %principal.user_id, action, "non-admin attempted mutation");
            Err(CatalogError::Forbidden(format!(
                "administrator role required to {action}"
            )))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListReadListsOptions {
    pub search: Option<String>,
    pub library_ids: Option<BTreeSet<LibraryId>>,
    pub page: PageRequest,
}

#[derive(Debug, Clone, Default)]
pub struct CreateReadListCommand {
    pub name: String,
    pub summary: Option<String>,
    pub book_ids: Vec<BookId>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReadListCommand {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub book_ids: Option<Vec<BookId>>,
}
