//! Pagination request and response shapes shared by every list endpoint.

use crate::error::{ModelError, Result};

/// Field a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortField {
    Name,
    Position,
    CreatedAt,
    LastModifiedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
        }
    }

    pub const fn by_name() -> Self {
        Self::ascending(SortField::Name)
    }

    pub const fn by_position() -> Self {
        Self::ascending(SortField::Position)
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::by_name()
    }
}

/// Which slice of the sorted result set is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PageWindow {
    Paged { page: u32, size: u32 },
    Unpaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    pub window: PageWindow,
    pub sort: Sort,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            window: PageWindow::Paged { page, size },
            sort: Sort::default(),
        }
    }

    pub fn unpaged() -> Self {
        Self {
            window: PageWindow::Unpaged,
            sort: Sort::default(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Rejects zero-sized pages and pages larger than `max_size`.
    pub fn validate(&self, max_size: u32) -> Result<()> {
        match self.window {
            PageWindow::Unpaged => Ok(()),
            PageWindow::Paged { size: 0, .. } => Err(ModelError::InvalidPage(
                "page size must be greater than zero".to_string(),
            )),
            PageWindow::Paged { size, .. } if size > max_size => {
                Err(ModelError::InvalidPage(format!(
                    "page size {size} exceeds the maximum of {max_size}"
                )))
            }
            PageWindow::Paged { .. } => Ok(()),
        }
    }

    /// Offset and limit into the full result set; `None` limit means "everything".
    pub fn offset_limit(&self) -> (u64, Option<u64>) {
        match self.window {
            PageWindow::Paged { page, size } => {
                (u64::from(page) * u64::from(size), Some(u64::from(size)))
            }
            PageWindow::Unpaged => (0, None),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::of(0, 20)
    }
}

/// One page of an ordered result set plus the totals needed to page through it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Wraps an already-sliced page of content.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let (number, size, total_pages) = match request.window {
            PageWindow::Paged { page, size } => {
                let pages = if size == 0 {
                    0
                } else {
                    total_elements.div_ceil(u64::from(size))
                };
                (page, size, u32::try_from(pages).unwrap_or(u32::MAX))
            }
            PageWindow::Unpaged => {
                let size = u32::try_from(content.len()).unwrap_or(u32::MAX);
                (0, size, u32::from(total_elements > 0))
            }
        };

        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number,
            size,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
        }
    }

    /// Slices a fully sorted result set according to `request`.
    pub fn from_sorted(items: Vec<T>, request: &PageRequest) -> Self {
        let total = items.len() as u64;
        let (offset, limit) = request.offset_limit();
        let content: Vec<T> = match limit {
            Some(limit) => items
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => items,
        };
        Self::new(content, request, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
