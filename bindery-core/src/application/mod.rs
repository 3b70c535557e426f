//! Application services composing the domain rules with the repository ports.

pub mod libraries;
pub mod read_lists;

pub use libraries::LibraryService;
pub use read_lists::{
    CreateReadListCommand, DEFAULT_MAX_PAGE_SIZE, ListReadListsOptions, ReadListService,
    UpdateReadListCommand,
};
