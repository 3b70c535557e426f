//! Persistence boundary: repository ports and the adapters that implement them.

pub mod infrastructure;
pub mod ports;

pub use infrastructure::memory::{CatalogSeed, InMemoryCatalog};
#[cfg(feature = "database")]
pub use infrastructure::postgres::PostgresCatalog;
