use std::collections::HashSet;

use bindery_model::{BookId, ReadList};

use crate::error::{CatalogError, Result};

pub const MAX_NAME_LENGTH: usize = 255;

/// Trims and checks a read-list name. Uniqueness is the store's job.
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(CatalogError::InvalidRequest(
            "read list name cannot be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CatalogError::InvalidRequest(format!(
            "read list name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(name.to_string())
}

/// A book may appear in a read list at most once.
pub fn validate_book_ids(book_ids: &[BookId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(book_ids.len());
    for id in book_ids {
        if !seen.insert(id) {
            return Err(CatalogError::InvalidRequest(format!(
                "book {id} appears more than once in the read list"
            )));
        }
    }
    Ok(())
}

/// Validated input for a new read list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadListDraft {
    pub name: String,
    pub summary: String,
    pub book_ids: Vec<BookId>,
}

impl ReadListDraft {
    pub fn new(name: &str, summary: Option<String>, book_ids: Vec<BookId>) -> Result<Self> {
        let name = validate_name(name)?;
        validate_book_ids(&book_ids)?;
        Ok(Self {
            name,
            summary: summary.unwrap_or_default(),
            book_ids,
        })
    }

    pub fn into_read_list(self) -> ReadList {
        ReadList::new(self.name, self.book_ids).with_summary(self.summary)
    }
}

/// Narrows a read list to the members the caller may see, flagging the view
/// as filtered when anything was dropped.
pub fn visible_view(mut read_list: ReadList, is_visible: impl Fn(&BookId) -> bool) -> ReadList {
    let before = read_list.book_ids.len();
    read_list.book_ids.retain(|id| is_visible(id));
    read_list.filtered = read_list.book_ids.len() != before;
    read_list
}
