use std::{fmt, sync::Arc};

use bindery_core::application::{LibraryService, ReadListService};

use super::auth::ApiKeyTable;
use super::config::Config;

/// Storage behind the services, reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Postgres => "postgres",
            StorageKind::Memory => "memory",
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub read_lists: Arc<ReadListService>,
    pub libraries: Arc<LibraryService>,
    pub api_keys: Arc<ApiKeyTable>,
    pub storage: StorageKind,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        read_lists: ReadListService,
        libraries: LibraryService,
        storage: StorageKind,
    ) -> Self {
        let api_keys = ApiKeyTable::from_config(&config.api_keys);
        let read_lists = read_lists.with_max_page_size(config.pagination.max_page_size);

        Self {
            config,
            read_lists: Arc::new(read_lists),
            libraries: Arc::new(libraries),
            api_keys: Arc::new(api_keys),
            storage,
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.config.pagination.default_page_size
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("storage", &self.storage)
            .field("api_keys", &self.api_keys)
            .finish_non_exhaustive()
    }
}
