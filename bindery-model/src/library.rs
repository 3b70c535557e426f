use chrono::{DateTime, Utc};

use crate::ids::LibraryId;

/// A library groups books on disk and is the unit of access control.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Library {
    pub id: LibraryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LibraryId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
