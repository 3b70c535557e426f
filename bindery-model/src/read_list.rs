use chrono::{DateTime, Utc};

use crate::book::Book;
use crate::ids::{BookId, ReadListId};

/// A named, ordered list of books.
///
/// Member order is the order of `book_ids`; a book's position is its index in
/// that vector, so positions are always dense and zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadList {
    pub id: ReadListId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summary: String,
    pub book_ids: Vec<BookId>,
    /// Set on scoped views when some members were hidden from the caller.
    #[cfg_attr(feature = "serde", serde(default))]
    pub filtered: bool,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl ReadList {
    pub fn new(name: impl Into<String>, book_ids: Vec<BookId>) -> Self {
        let now = Utc::now();
        Self {
            id: ReadListId::new(),
            name: name.into(),
            summary: String::new(),
            book_ids,
            filtered: false,
            created_at: now,
            last_modified_at: now,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// `(book, position)` pairs in list order.
    pub fn positions(&self) -> impl Iterator<Item = (BookId, u32)> + '_ {
        self.book_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index as u32))
    }

    pub fn len(&self) -> usize {
        self.book_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.book_ids.is_empty()
    }
}

/// A book as seen through a read list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadListMember {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub book: Book,
    pub position: u32,
}
