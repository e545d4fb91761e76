use crate::model::GroupId;
use sharefare_domain::{LedgerError, MemberId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown expense category `{0}`")]
pub struct UnknownCategory(pub String);

/// Failures reported by a [`GroupLedgerSource`](crate::ports::GroupLedgerSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),
    #[error("ledger source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("`{member}` is not a member of group {group_id}")]
    NotAMember { group_id: GroupId, member: MemberId },
}

/// Coarse classification used by request-handling layers to pick a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Bad input data; the caller can fix the request or the stored ledger.
    BadInput,
    NotFound,
    /// Internal consistency fault or unavailable backend.
    Internal,
}

impl LedgerServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LedgerServiceError::Source(SourceError::GroupNotFound(_)) => FailureKind::NotFound,
            LedgerServiceError::Source(SourceError::Unavailable(_)) => FailureKind::Internal,
            LedgerServiceError::Ledger(err) if err.is_input_error() => FailureKind::BadInput,
            LedgerServiceError::Ledger(_) => FailureKind::Internal,
            LedgerServiceError::NotAMember { .. } => FailureKind::BadInput,
        }
    }

    /// HTTP status a surrounding request layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            LedgerServiceError::Source(SourceError::GroupNotFound(_)) => 404,
            LedgerServiceError::Source(SourceError::Unavailable(_)) => 503,
            LedgerServiceError::Ledger(LedgerError::UnbalancedLedger { .. }) => 500,
            LedgerServiceError::Ledger(_) => 422,
            LedgerServiceError::NotAMember { .. } => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sharefare_domain::{EntryRef, Money};

    #[rstest]
    #[case::group_not_found(
        LedgerServiceError::Source(SourceError::GroupNotFound(GroupId(7))),
        FailureKind::NotFound,
        404
    )]
    #[case::source_unavailable(
        LedgerServiceError::Source(SourceError::Unavailable("db down".to_string())),
        FailureKind::Internal,
        503
    )]
    #[case::invalid_amount(
        LedgerServiceError::Ledger(LedgerError::InvalidAmount {
            entry: EntryRef::Expense(0),
            amount: Money::ZERO,
        }),
        FailureKind::BadInput,
        422
    )]
    #[case::unknown_member(
        LedgerServiceError::Ledger(LedgerError::UnknownMember {
            entry: EntryRef::Expense(3),
            member: MemberId::from("x@example.com"),
        }),
        FailureKind::BadInput,
        422
    )]
    #[case::amount_overflow(
        LedgerServiceError::Ledger(LedgerError::AmountOverflow { entry: EntryRef::Payment(2) }),
        FailureKind::BadInput,
        422
    )]
    #[case::unbalanced(
        LedgerServiceError::Ledger(LedgerError::UnbalancedLedger { total: Money::from_i64(1) }),
        FailureKind::Internal,
        500
    )]
    #[case::not_a_member(
        LedgerServiceError::NotAMember {
            group_id: GroupId(1),
            member: MemberId::from("x@example.com"),
        },
        FailureKind::BadInput,
        400
    )]
    fn classifies_failures(
        #[case] err: LedgerServiceError,
        #[case] kind: FailureKind,
        #[case] status: u16,
    ) {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status_code(), status);
    }
}
