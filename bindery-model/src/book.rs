use crate::ids::{BookId, LibraryId};

/// A single book (comic issue, volume, ebook) owned by exactly one library.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    pub id: BookId,
    pub library_id: LibraryId,
    pub title: String,
    pub number: Option<u32>,
    /// Location of the backing file. Only administrators may see it.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub file_url: Option<String>,
}

impl Book {
    pub fn new(library_id: LibraryId, title: impl Into<String>) -> Self {
        Self {
            id: BookId::new(),
            library_id,
            title: title.into(),
            number: None,
            file_url: None,
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }
}
