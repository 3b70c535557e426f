//! Core data model definitions shared across Bindery crates.
#![allow(missing_docs)]

pub mod book;
pub mod error;
pub mod ids;
pub mod library;
pub mod page;
pub mod read_list;

pub use book::Book;
pub use error::ModelError;
pub use ids::{BookId, LibraryId, ReadListId, UserId};
pub use library::Library;
pub use page::{Page, PageRequest, PageWindow, Sort, SortField, SortOrder};
pub use read_list::{ReadList, ReadListMember};
