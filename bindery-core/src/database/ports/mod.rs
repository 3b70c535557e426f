//! Repository ports (interfaces) for the read-list catalog.
//!
//! Implementations live under `database::infrastructure` and must not leak
//! adapter types into the application layer.

pub mod books;
pub mod libraries;
pub mod read_lists;

pub use books::BookRepository;
pub use libraries::LibraryRepository;
pub use read_lists::ReadListRepository;
