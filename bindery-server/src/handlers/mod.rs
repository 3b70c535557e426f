pub mod health;
pub mod libraries;
pub mod pagination;
pub mod read_lists;

pub use health::health_handler;
pub use libraries::{get_library_handler, list_libraries_handler};
pub use read_lists::{
    create_read_list_handler, delete_read_list_handler, get_read_list_handler,
    list_read_list_books_handler, list_read_lists_handler, update_read_list_handler,
};
