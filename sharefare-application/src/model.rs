use crate::error::UnknownCategory;
use sharefare_domain::{Expense, MemberId, MemberSet, Money, RecordedPayment, Transfer};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Food,
    Travel,
    Utilities,
    Entertainment,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Food,
        ExpenseCategory::Travel,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Travel => "travel",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A stored expense together with the metadata the ledger core ignores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub description: String,
    pub category: ExpenseCategory,
    pub expense: Expense,
}

/// A consistent view of one group's ledger inputs at a single point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub group_id: GroupId,
    pub name: String,
    pub members: Vec<MemberId>,
    pub expenses: Vec<ExpenseRecord>,
    pub payments: Vec<RecordedPayment>,
}

impl GroupSnapshot {
    pub fn member_set(&self) -> MemberSet {
        self.members.iter().cloned().collect()
    }

    pub fn expenses(&self) -> Vec<Expense> {
        self.expenses
            .iter()
            .map(|record| record.expense.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonBalance {
    pub id: MemberId,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementResult {
    pub balances: Vec<PersonBalance>,
    pub transfers: Vec<Transfer>,
}

/// Which of a group's expenses to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseFilter {
    All,
    /// Expenses the member paid for.
    PaidBy(MemberId),
    /// Expenses the member shares but did not pay for.
    SharedBy(MemberId),
}

impl ExpenseFilter {
    /// The member whose point of view the filter takes, if any.
    pub fn member(&self) -> Option<&MemberId> {
        match self {
            ExpenseFilter::All => None,
            ExpenseFilter::PaidBy(member) | ExpenseFilter::SharedBy(member) => Some(member),
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            ExpenseFilter::All => true,
            ExpenseFilter::PaidBy(member) => expense.payer == *member,
            ExpenseFilter::SharedBy(member) => {
                expense.payer != *member && expense.participants.contains(member)
            }
        }
    }
}

/// An expense as seen by a particular member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLine {
    pub record: ExpenseRecord,
    /// The filtering member's share of the expense; `None` for unfiltered
    /// listings.
    pub member_share: Option<Money>,
}
