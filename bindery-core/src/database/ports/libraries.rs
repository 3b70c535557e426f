use std::collections::BTreeSet;

use async_trait::async_trait;
use bindery_model::{Library, LibraryId};

use crate::error::Result;

/// Read access to libraries.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Libraries within `permitted` (all when `None`), ordered by name.
    async fn list_libraries(&self, permitted: Option<&BTreeSet<LibraryId>>) -> Result<Vec<Library>>;

    async fn get_library(&self, id: LibraryId) -> Result<Option<Library>>;
}
