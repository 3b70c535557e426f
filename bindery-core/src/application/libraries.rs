use std::sync::Arc;

use bindery_model::{Library, LibraryId};

use crate::database::ports::LibraryRepository;
use crate::domain::Principal;
use crate::error::{CatalogError, Result};

#[derive(Clone)]
pub struct LibraryService {
    libraries: Arc<dyn LibraryRepository>,
}

impl std::fmt::Debug for LibraryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryService")
            .field("libraries_repo", &Arc::strong_count(&self.libraries))
            .finish()
    }
}

impl LibraryService {
    pub fn new(libraries: Arc<dyn LibraryRepository>) -> Self {
        Self { libraries }
    }

    /// Libraries the caller may see, ordered by name.
    pub async fn list_libraries(&self, principal: &Principal) -> Result<Vec<Library>> {
        self.libraries
            .list_libraries(principal.scope.permitted())
            .await
    }

    pub async fn get_library(&self, principal: &Principal, id: LibraryId) -> Result<Library> {
        if !principal.scope.allows(&id) {
            return Err(CatalogError::NotFound(format!("library {id}")));
        }

        self.libraries
            .get_library(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("library {id}")))
    }
}
