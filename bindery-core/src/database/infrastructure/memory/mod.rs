//! In-process catalog used for development servers and tests.

mod catalog;
mod seed;

pub use catalog::InMemoryCatalog;
pub use seed::CatalogSeed;
