use crate::{
    error::SourceError,
    model::{GroupId, GroupSnapshot},
};
use sharefare_domain::MemberId;
use std::collections::HashMap;

/// Read side of group storage.
pub trait GroupLedgerSource: Send + Sync {
    /// Returns the group's members, expenses and payments as one consistent
    /// snapshot; concurrent writes are either fully visible or not at all.
    fn snapshot(&self, group_id: GroupId) -> Result<GroupSnapshot, SourceError>;
}

pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, member_id: &MemberId) -> Option<&str>;
}

impl MemberDirectory for HashMap<MemberId, String> {
    fn display_name(&self, member_id: &MemberId) -> Option<&str> {
        self.get(member_id).map(String::as_str)
    }
}
