use crate::ledger_file::{LedgerFile, LedgerFileError};
use dashmap::{DashMap, mapref::one::RefMut};
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use sharefare_application::{
    ExpenseCategory, ExpenseId, ExpenseRecord, GroupId, GroupLedgerSource, GroupSnapshot,
    SourceError,
};
use sharefare_domain::{CurrencyScale, Expense, MemberId, RecordedPayment};
use std::{
    fmt,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("group name must not be empty")]
    EmptyGroupName,
    #[error("group {0} not found")]
    GroupNotFound(GroupId),
    #[error("expense {expense_id} not found in group {group_id}")]
    ExpenseNotFound {
        group_id: GroupId,
        expense_id: ExpenseId,
    },
    #[error("`{member}` is not a member of group {group_id}")]
    MemberNotFound { group_id: GroupId, member: MemberId },
    #[error("`{member}` still appears in expenses or payments of group {group_id}")]
    MemberReferenced { group_id: GroupId, member: MemberId },
    #[error("invalid or expired invite token `{0}`")]
    InvalidInviteToken(String),
    #[error("`{member}` is already a member of group {group_id}")]
    AlreadyMember { group_id: GroupId, member: MemberId },
}

impl StoreError {
    /// HTTP status a surrounding request layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::GroupNotFound(_)
            | StoreError::ExpenseNotFound { .. }
            | StoreError::MemberNotFound { .. }
            | StoreError::InvalidInviteToken(_) => 404,
            StoreError::EmptyGroupName | StoreError::AlreadyMember { .. } => 400,
            StoreError::MemberReferenced { .. } => 409,
        }
    }
}

/// Opaque token that lets its holder join a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InviteToken(Uuid);

impl InviteToken {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InviteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for InviteToken {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| StoreError::InvalidInviteToken(s.to_string()))
    }
}

/// Metadata for an expense about to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub description: String,
    pub category: ExpenseCategory,
    pub expense: Expense,
}

/// A group as listed on a member's dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupListing {
    pub group_id: GroupId,
    pub name: String,
    pub member_count: usize,
}

#[derive(Clone, Debug)]
struct GroupState {
    name: String,
    invite_token: InviteToken,
    members: IndexSet<MemberId>,
    expenses: IndexMap<ExpenseId, ExpenseRecord>,
    payments: Vec<RecordedPayment>,
}

impl GroupState {
    fn references(&self, member: &MemberId) -> bool {
        self.expenses
            .values()
            .any(|record| record.expense.involves(member))
            || self
                .payments
                .iter()
                .any(|payment| payment.from == *member || payment.to == *member)
    }

    fn snapshot(&self, group_id: GroupId) -> GroupSnapshot {
        GroupSnapshot {
            group_id,
            name: self.name.clone(),
            members: self.members.iter().cloned().collect(),
            expenses: self.expenses.values().cloned().collect(),
            payments: self.payments.clone(),
        }
    }
}

/// Process-local group storage.
///
/// Each group lives behind one map shard guard, so a snapshot never observes
/// a half-applied mutation. Expenses are not validated here; the ledger
/// aggregator rejects bad entries when balances are computed.
#[derive(Clone)]
pub struct InMemoryGroupStore {
    groups: Arc<DashMap<GroupId, GroupState>>,
    invites: Arc<DashMap<InviteToken, GroupId>>,
    next_group_id: Arc<AtomicU64>,
    next_expense_id: Arc<AtomicU64>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(DashMap::new()),
            invites: Arc::new(DashMap::new()),
            next_group_id: Arc::new(AtomicU64::new(1)),
            next_expense_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Creates a group with `creator` as its first member.
    pub fn create_group(&self, name: &str, creator: MemberId) -> Result<GroupId, StoreError> {
        let members = IndexSet::from([creator]);
        let group_id = self.insert_group(name, members, Vec::new(), Vec::new())?;
        tracing::debug!(%group_id, "Created group");
        Ok(group_id)
    }

    /// Returns `false` when the member already belonged to the group.
    pub fn add_member(&self, group_id: GroupId, member: MemberId) -> Result<bool, StoreError> {
        let mut group = self.group_mut(group_id)?;
        let added = group.members.insert(member);
        tracing::debug!(%group_id, added, "Added member");
        Ok(added)
    }

    /// The token other people use to join the group.
    pub fn invite_token(&self, group_id: GroupId) -> Result<InviteToken, StoreError> {
        self.groups
            .get(&group_id)
            .map(|group| group.invite_token)
            .ok_or(StoreError::GroupNotFound(group_id))
    }

    /// Adds `member` to the group the token was issued for.
    pub fn join_by_token(&self, token: &str, member: MemberId) -> Result<GroupId, StoreError> {
        let parsed: InviteToken = token.parse()?;
        let group_id = self
            .invites
            .get(&parsed)
            .map(|entry| *entry.value())
            .ok_or_else(|| StoreError::InvalidInviteToken(token.to_string()))?;

        let mut group = self.group_mut(group_id)?;
        if group.members.contains(&member) {
            return Err(StoreError::AlreadyMember { group_id, member });
        }
        tracing::debug!(%group_id, %member, "Member joined by invite");
        group.members.insert(member);
        Ok(group_id)
    }

    /// Removes a member that no expense or payment mentions.
    pub fn remove_member(&self, group_id: GroupId, member: &MemberId) -> Result<(), StoreError> {
        let mut group = self.group_mut(group_id)?;
        if !group.members.contains(member) {
            return Err(StoreError::MemberNotFound {
                group_id,
                member: member.clone(),
            });
        }
        if group.references(member) {
            return Err(StoreError::MemberReferenced {
                group_id,
                member: member.clone(),
            });
        }
        group.members.shift_remove(member);
        tracing::debug!(%group_id, %member, "Removed member");
        Ok(())
    }

    pub fn add_expense(
        &self,
        group_id: GroupId,
        new_expense: NewExpense,
    ) -> Result<ExpenseId, StoreError> {
        let mut group = self.group_mut(group_id)?;
        let record = self.allocate(new_expense);
        let expense_id = record.id;
        group.expenses.insert(expense_id, record);
        tracing::debug!(%group_id, %expense_id, "Recorded expense");
        Ok(expense_id)
    }

    pub fn remove_expense(
        &self,
        group_id: GroupId,
        expense_id: ExpenseId,
    ) -> Result<ExpenseRecord, StoreError> {
        let mut group = self.group_mut(group_id)?;
        let record = group
            .expenses
            .shift_remove(&expense_id)
            .ok_or(StoreError::ExpenseNotFound {
                group_id,
                expense_id,
            })?;
        tracing::debug!(%group_id, %expense_id, "Removed expense");
        Ok(record)
    }

    /// Records a settle-up payment that already happened.
    pub fn record_payment(
        &self,
        group_id: GroupId,
        payment: RecordedPayment,
    ) -> Result<(), StoreError> {
        let mut group = self.group_mut(group_id)?;
        tracing::debug!(
            %group_id,
            from = %payment.from,
            to = %payment.to,
            amount = %payment.amount,
            "Recorded payment"
        );
        group.payments.push(payment);
        Ok(())
    }

    /// Groups the member belongs to, ordered by id.
    pub fn groups_for_member(&self, member: &MemberId) -> Vec<GroupListing> {
        let mut listings: Vec<GroupListing> = self
            .groups
            .iter()
            .filter(|entry| entry.members.contains(member))
            .map(|entry| GroupListing {
                group_id: *entry.key(),
                name: entry.name.clone(),
                member_count: entry.members.len(),
            })
            .collect();
        listings.sort_unstable_by_key(|listing| listing.group_id);
        listings
    }

    /// Imports a whole ledger file as a new group.
    ///
    /// Every amount and category is converted before anything is stored, so a
    /// malformed file leaves the store untouched.
    pub fn import_ledger_file(
        &self,
        file: &LedgerFile,
        scale: CurrencyScale,
    ) -> Result<GroupId, LedgerFileError> {
        let entries = file.to_entries(scale)?;
        if file.members.is_empty() {
            return Err(LedgerFileError::NoMembers);
        }
        let total: Decimal = entries
            .expenses
            .iter()
            .map(|new_expense| scale.to_decimal(new_expense.expense.amount))
            .sum();
        let expense_count = entries.expenses.len();
        let payment_count = entries.payments.len();

        let members = file
            .members
            .iter()
            .map(|member| MemberId::from(member.as_str()))
            .collect();
        let expenses = entries
            .expenses
            .into_iter()
            .map(|new_expense| self.allocate(new_expense))
            .collect();
        let group_id = self.insert_group(&file.name, members, expenses, entries.payments)?;

        tracing::debug!(
            %group_id,
            member_count = file.members.len(),
            expense_count,
            payment_count,
            %total,
            "Imported ledger file"
        );
        Ok(group_id)
    }

    fn insert_group(
        &self,
        name: &str,
        members: IndexSet<MemberId>,
        expenses: Vec<ExpenseRecord>,
        payments: Vec<RecordedPayment>,
    ) -> Result<GroupId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyGroupName);
        }
        let group_id = GroupId(self.next_group_id.fetch_add(1, Ordering::Relaxed));
        let invite_token = InviteToken::generate();
        self.groups.insert(
            group_id,
            GroupState {
                name: name.to_string(),
                invite_token,
                members,
                expenses: expenses
                    .into_iter()
                    .map(|record| (record.id, record))
                    .collect(),
                payments,
            },
        );
        self.invites.insert(invite_token, group_id);
        Ok(group_id)
    }

    fn allocate(&self, new_expense: NewExpense) -> ExpenseRecord {
        ExpenseRecord {
            id: ExpenseId(self.next_expense_id.fetch_add(1, Ordering::Relaxed)),
            description: new_expense.description,
            category: new_expense.category,
            expense: new_expense.expense,
        }
    }

    fn group_mut(
        &self,
        group_id: GroupId,
    ) -> Result<RefMut<'_, GroupId, GroupState>, StoreError> {
        self.groups
            .get_mut(&group_id)
            .ok_or(StoreError::GroupNotFound(group_id))
    }
}

impl Default for InMemoryGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupLedgerSource for InMemoryGroupStore {
    fn snapshot(&self, group_id: GroupId) -> Result<GroupSnapshot, SourceError> {
        self.groups
            .get(&group_id)
            .map(|group| group.snapshot(group_id))
            .ok_or(SourceError::GroupNotFound(group_id))
    }
}
