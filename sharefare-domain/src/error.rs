use crate::model::{MemberId, Money};
use std::fmt;
use thiserror::Error;

/// Position of a ledger input that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryRef {
    Expense(usize),
    Payment(usize),
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryRef::Expense(index) => write!(f, "expense #{index}"),
            EntryRef::Payment(index) => write!(f, "payment #{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{entry} has a non-positive amount ({amount})")]
    InvalidAmount { entry: EntryRef, amount: Money },
    #[error("{entry} references unknown member `{member}`")]
    UnknownMember { entry: EntryRef, member: MemberId },
    #[error("{entry} has no participants")]
    NoParticipants { entry: EntryRef },
    #[error("{entry} has `{member}` paying themselves")]
    SelfPayment { entry: EntryRef, member: MemberId },
    #[error("{entry} pushes a member total past the supported amount range")]
    AmountOverflow { entry: EntryRef },
    #[error("balances do not sum to zero (found {total})")]
    UnbalancedLedger { total: Money },
}

impl LedgerError {
    /// Whether the error stems from bad input data rather than an internal
    /// consistency fault.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, LedgerError::UnbalancedLedger { .. })
    }
}
