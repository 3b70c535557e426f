use bindery_model::ModelError;
use thiserror::Error;

/// Name of the unique constraint guarding read-list names.
pub const READ_LIST_NAME_CONSTRAINT: &str = "read_lists_name_key";

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Missing, or present but outside the caller's libraries. Callers cannot
    /// tell the two apart.
    #[error("{0} not found")]
    NotFound(String),

    #[error("a read list named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("permission denied: {0}")]
    Forbidden(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn read_list_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("read list {id}"))
    }

    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }
}

impl From<ModelError> for CatalogError {
    fn from(err: ModelError) -> Self {
        CatalogError::InvalidRequest(err.to_string())
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
            && db_err.constraint() == Some(READ_LIST_NAME_CONSTRAINT)
        {
            // The offending name is not in the error; callers that know it
            // rewrap with `duplicate_name`.
            return CatalogError::DuplicateName {
                name: String::new(),
            };
        }
        CatalogError::Internal(format!("Database query failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
