use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use bindery_model::{
    Book, BookId, Library, LibraryId, Page, PageRequest, ReadList, ReadListId, ReadListMember,
    Sort, SortField, SortOrder,
};
use tokio::sync::RwLock;
use tracing::debug;

use super::seed::CatalogSeed;
use crate::database::ports::{BookRepository, LibraryRepository, ReadListRepository};
use crate::domain::read_list::{validate_book_ids, visible_view};
use crate::error::{CatalogError, Result};

#[derive(Debug, Default)]
struct CatalogState {
    libraries: HashMap<LibraryId, Library>,
    books: HashMap<BookId, Book>,
    read_lists: HashMap<ReadListId, ReadList>,
}

impl CatalogState {
    fn library_of(&self, book_id: &BookId) -> Option<LibraryId> {
        self.books.get(book_id).map(|book| book.library_id)
    }

    fn has_member_in(&self, read_list: &ReadList, libraries: &BTreeSet<LibraryId>) -> bool {
        read_list
            .book_ids
            .iter()
            .filter_map(|id| self.library_of(id))
            .any(|library_id| libraries.contains(&library_id))
    }

    fn scoped_view(&self, read_list: &ReadList, permitted: Option<&BTreeSet<LibraryId>>) -> ReadList {
        match permitted {
            None => read_list.clone(),
            Some(permitted) => visible_view(read_list.clone(), |id| {
                self.library_of(id)
                    .is_some_and(|library_id| permitted.contains(&library_id))
            }),
        }
    }

    fn name_taken(&self, name: &str, except: Option<ReadListId>) -> bool {
        self.read_lists
            .values()
            .any(|existing| existing.name == name && Some(existing.id) != except)
    }
}

/// Thread-safe in-memory implementation of every catalog port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: CatalogSeed) -> Result<Self> {
        let mut state = CatalogState::default();
        for library in seed.libraries {
            state.libraries.insert(library.id, library);
        }
        for book in seed.books {
            state.books.insert(book.id, book);
        }
        for read_list in seed.read_lists {
            validate_book_ids(&read_list.book_ids)?;
            if state.name_taken(&read_list.name, None) {
                return Err(CatalogError::duplicate_name(read_list.name));
            }
            state.read_lists.insert(read_list.id, read_list);
        }

        debug!(
            libraries = state.libraries.len(),
            books = state.books.len(),
            read_lists = state.read_lists.len(),
            "seeded in-memory catalog"
        );

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    pub async fn insert_library(&self, library: Library) {
        self.state.write().await.libraries.insert(library.id, library);
    }

    pub async fn insert_book(&self, book: Book) {
        self.state.write().await.books.insert(book.id, book);
    }

    /// Drops a book without touching read lists that reference it.
    pub async fn remove_book(&self, id: BookId) -> Option<Book> {
        self.state.write().await.books.remove(&id)
    }

    pub async fn read_list_count(&self) -> usize {
        self.state.read().await.read_lists.len()
    }
}

fn matches_search(read_list: &ReadList, search: Option<&str>) -> bool {
    match search {
        None => true,
        Some(term) => read_list
            .name
            .to_lowercase()
            .contains(&term.to_lowercase()),
    }
}

fn compare_read_lists(a: &ReadList, b: &ReadList, sort: Sort) -> Ordering {
    let ordering = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::LastModifiedAt => a.last_modified_at.cmp(&b.last_modified_at),
        SortField::Name | SortField::Position => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
    .then_with(|| a.id.cmp(&b.id));

    match sort.order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

fn compare_members(a: &ReadListMember, b: &ReadListMember, sort: Sort) -> Ordering {
    let ordering = match sort.field {
        SortField::Name => a
            .book
            .title
            .to_lowercase()
            .cmp(&b.book.title.to_lowercase())
            .then_with(|| a.position.cmp(&b.position)),
        _ => a.position.cmp(&b.position),
    };

    match sort.order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

fn page_of(mut read_lists: Vec<ReadList>, page: &PageRequest) -> Page<ReadList> {
    read_lists.sort_by(|a, b| compare_read_lists(a, b, page.sort));
    Page::from_sorted(read_lists, page)
}

#[async_trait]
impl ReadListRepository for InMemoryCatalog {
    async fn find_all(&self, search: Option<&str>, page: &PageRequest) -> Result<Page<ReadList>> {
        let state = self.state.read().await;
        let read_lists = state
            .read_lists
            .values()
            .filter(|read_list| matches_search(read_list, search))
            .cloned()
            .collect();
        Ok(page_of(read_lists, page))
    }

    async fn find_all_by_libraries(
        &self,
        requested: &BTreeSet<LibraryId>,
        permitted: Option<&BTreeSet<LibraryId>>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<ReadList>> {
        let effective: BTreeSet<LibraryId> = match permitted {
            Some(permitted) => requested.intersection(permitted).copied().collect(),
            None => requested.clone(),
        };

        let state = self.state.read().await;
        let read_lists = state
            .read_lists
            .values()
            .filter(|read_list| matches_search(read_list, search))
            .filter(|read_list| state.has_member_in(read_list, &effective))
            .map(|read_list| state.scoped_view(read_list, permitted))
            .collect();
        Ok(page_of(read_lists, page))
    }

    async fn find_by_id_scoped(
        &self,
        id: ReadListId,
        permitted: Option<&BTreeSet<LibraryId>>,
    ) -> Result<Option<ReadList>> {
        let state = self.state.read().await;
        let Some(read_list) = state.read_lists.get(&id) else {
            return Ok(None);
        };

        if let Some(permitted) = permitted
            && !state.has_member_in(read_list, permitted)
        {
            return Ok(None);
        }

        Ok(Some(state.scoped_view(read_list, permitted)))
    }

    async fn find_by_id(&self, id: ReadListId) -> Result<Option<ReadList>> {
        Ok(self.state.read().await.read_lists.get(&id).cloned())
    }

    async fn create(&self, read_list: ReadList) -> Result<ReadList> {
        let mut state = self.state.write().await;
        if state.name_taken(&read_list.name, None) {
            return Err(CatalogError::duplicate_name(read_list.name));
        }
        if state.read_lists.contains_key(&read_list.id) {
            return Err(CatalogError::Internal(format!(
                "read list id {} already in use",
                read_list.id
            )));
        }

        state.read_lists.insert(read_list.id, read_list.clone());
        Ok(read_list)
    }

    async fn update(&self, read_list: &ReadList) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.read_lists.contains_key(&read_list.id) {
            return Err(CatalogError::read_list_not_found(read_list.id));
        }
        if state.name_taken(&read_list.name, Some(read_list.id)) {
            return Err(CatalogError::duplicate_name(read_list.name.clone()));
        }

        state.read_lists.insert(read_list.id, read_list.clone());
        Ok(())
    }

    async fn delete(&self, id: ReadListId) -> Result<()> {
        self.state
            .write()
            .await
            .read_lists
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::read_list_not_found(id))
    }
}

#[async_trait]
impl BookRepository for InMemoryCatalog {
    async fn find_by_read_list_id(
        &self,
        read_list_id: ReadListId,
        permitted: Option<&BTreeSet<LibraryId>>,
        page: &PageRequest,
    ) -> Result<Page<ReadListMember>> {
        let state = self.state.read().await;
        let Some(read_list) = state.read_lists.get(&read_list_id) else {
            return Ok(Page::from_sorted(Vec::new(), page));
        };

        let mut members: Vec<ReadListMember> = read_list
            .positions()
            .filter_map(|(book_id, position)| {
                let book = state.books.get(&book_id)?;
                if permitted.is_some_and(|ids| !ids.contains(&book.library_id)) {
                    return None;
                }
                Some(ReadListMember {
                    book: book.clone(),
                    position,
                })
            })
            .collect();

        members.sort_by(|a, b| compare_members(a, b, page.sort));
        Ok(Page::from_sorted(members, page))
    }
}

#[async_trait]
impl LibraryRepository for InMemoryCatalog {
    async fn list_libraries(&self, permitted: Option<&BTreeSet<LibraryId>>) -> Result<Vec<Library>> {
        let state = self.state.read().await;
        let mut libraries: Vec<Library> = state
            .libraries
            .values()
            .filter(|library| permitted.is_none_or(|ids| ids.contains(&library.id)))
            .cloned()
            .collect();
        libraries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(libraries)
    }

    async fn get_library(&self, id: LibraryId) -> Result<Option<Library>> {
        Ok(self.state.read().await.libraries.get(&id).cloned())
    }
}
