//! Authorization scopes and library-filter resolution.
//!
//! A caller is either unrestricted or limited to a set of libraries. Every
//! listing combines that ceiling with the libraries the caller explicitly asked
//! for; [`resolve_library_filter`] is the single place that decision is made.

use std::collections::BTreeSet;

use bindery_model::{LibraryId, UserId};

/// The set of libraries a caller is permitted to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationScope {
    Unrestricted,
    Libraries(BTreeSet<LibraryId>),
}

impl AuthorizationScope {
    pub fn libraries(ids: impl IntoIterator<Item = LibraryId>) -> Self {
        Self::Libraries(ids.into_iter().collect())
    }

    /// The permission ceiling, or `None` when nothing is restricted.
    pub fn permitted(&self) -> Option<&BTreeSet<LibraryId>> {
        match self {
            AuthorizationScope::Unrestricted => None,
            AuthorizationScope::Libraries(ids) => Some(ids),
        }
    }

    pub fn allows(&self, library_id: &LibraryId) -> bool {
        self.permitted().is_none_or(|ids| ids.contains(library_id))
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AuthorizationScope::Unrestricted)
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub is_admin: bool,
    pub scope: AuthorizationScope,
}

impl Principal {
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
            scope: AuthorizationScope::Unrestricted,
        }
    }

    pub fn reader(user_id: UserId, scope: AuthorizationScope) -> Self {
        Self {
            user_id,
            is_admin: false,
            scope,
        }
    }
}

/// Library restriction to apply to a read-list listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLibraryFilter {
    /// Search the whole catalog.
    Everything,
    /// A read list qualifies when it has a member in `requested` whose library
    /// is also within `permitted` (when present).
    Libraries {
        requested: BTreeSet<LibraryId>,
        permitted: Option<BTreeSet<LibraryId>>,
    },
}

impl ResolvedLibraryFilter {
    /// The libraries that actually qualify: `requested ∩ permitted`.
    pub fn effective(&self) -> Option<BTreeSet<LibraryId>> {
        match self {
            ResolvedLibraryFilter::Everything => None,
            ResolvedLibraryFilter::Libraries {
                requested,
                permitted: None,
            } => Some(requested.clone()),
            ResolvedLibraryFilter::Libraries {
                requested,
                permitted: Some(permitted),
            } => Some(requested.intersection(permitted).copied().collect()),
        }
    }

    /// True when no library can qualify, so the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.effective().is_some_and(|ids| ids.is_empty())
    }
}

/// Combines the caller's ceiling with an optional explicit library filter.
///
/// | scope        | filter  | result                                   |
/// |--------------|---------|------------------------------------------|
/// | unrestricted | none    | everything                               |
/// | unrestricted | `F`     | requested `F`, no ceiling                |
/// | limited `S`  | `F`     | requested `F`, ceiling `S`               |
/// | limited `S`  | none    | requested `S`, ceiling `S`               |
pub fn resolve_library_filter(
    requested: Option<&BTreeSet<LibraryId>>,
    permitted: Option<&BTreeSet<LibraryId>>,
) -> ResolvedLibraryFilter {
    match (permitted, requested) {
        (None, None) => ResolvedLibraryFilter::Everything,
        (None, Some(requested)) => ResolvedLibraryFilter::Libraries {
            requested: requested.clone(),
            permitted: None,
        },
        (Some(permitted), Some(requested)) => ResolvedLibraryFilter::Libraries {
            requested: requested.clone(),
            permitted: Some(permitted.clone()),
        },
        (Some(permitted), None) => ResolvedLibraryFilter::Libraries {
            requested: permitted.clone(),
            permitted: Some(permitted.clone()),
        },
    }
}
