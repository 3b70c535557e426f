//! Pure domain rules: who may see what, and what a valid read list looks like.

pub mod projection;
pub mod read_list;
pub mod scope;

pub use projection::{MemberProjection, project_member};
pub use read_list::{ReadListDraft, validate_book_ids, validate_name, visible_view};
pub use scope::{AuthorizationScope, Principal, ResolvedLibraryFilter, resolve_library_filter};
