//! Capability-gated projection of query results.
//!
//! Queries never branch on the caller's role; admin-only fields are stripped
//! from the results afterwards.

use bindery_model::ReadListMember;

use super::scope::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberProjection {
    Full,
    Redacted,
}

impl MemberProjection {
    pub fn for_principal(principal: &Principal) -> Self {
        if principal.is_admin {
            MemberProjection::Full
        } else {
            MemberProjection::Redacted
        }
    }
}

pub fn project_member(mut member: ReadListMember, projection: MemberProjection) -> ReadListMember {
    if projection == MemberProjection::Redacted {
        member.book.file_url = None;
    }
    member
}
