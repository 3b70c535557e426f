use std::path::Path;

use bindery_model::{Book, Library, ReadList};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Initial contents for an [`InMemoryCatalog`](super::InMemoryCatalog),
/// usually read from a JSON file named by `catalog.seed_path`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub libraries: Vec<Library>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub read_lists: Vec<ReadList>,
}

impl CatalogSeed {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
