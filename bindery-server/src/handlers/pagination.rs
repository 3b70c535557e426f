//! Query-string parsing for paged endpoints.
//!
//! `page` is zero-based. `unpaged=true` returns everything in one page and
//! ignores `page`/`size`. `sort` takes `field` or `field,asc|desc`.

use bindery_model::{PageRequest, Sort, SortField, SortOrder};
use serde::Deserialize;

use crate::infra::errors::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub unpaged: Option<bool>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn into_page_request(self, default_size: u32) -> Result<PageRequest, AppError> {
        let request = if self.unpaged.unwrap_or(false) {
            PageRequest::unpaged()
        } else {
            PageRequest::of(self.page.unwrap_or(0), self.size.unwrap_or(default_size))
        };

        match self.sort.as_deref() {
            Some(raw) => Ok(request.with_sort(parse_sort(raw)?)),
            None => Ok(request),
        }
    }
}

pub fn parse_sort(raw: &str) -> Result<Sort, AppError> {
    let mut parts = raw.split(',').map(str::trim);
    let field = match parts.next().unwrap_or_default() {
        "name" => SortField::Name,
        "position" | "number" => SortField::Position,
        "created_at" | "createdDate" => SortField::CreatedAt,
        "last_modified_at" | "lastModifiedDate" => SortField::LastModifiedAt,
        other => return Err(AppError::bad_request(format!("unknown sort field '{other}'"))),
    };
    let order = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") => SortOrder::Ascending,
        Some("desc") => SortOrder::Descending,
        Some(other) => {
            return Err(AppError::bad_request(format!(
                "unknown sort direction '{other}'"
            )));
        }
    };

    Ok(Sort { field, order })
}

pub fn parse_u32(name: &str, raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("{name} must be a non-negative integer")))
}

pub fn parse_bool(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(AppError::bad_request(format!("{name} must be true or false"))),
    }
}
