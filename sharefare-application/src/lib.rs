#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use error::{FailureKind, LedgerServiceError, SourceError, UnknownCategory};
pub use ledger_service::LedgerService;
pub use model::{
    ExpenseCategory, ExpenseFilter, ExpenseId, ExpenseLine, ExpenseRecord, GroupId, GroupSnapshot,
    PersonBalance, SettlementResult,
};
pub use ports::{GroupLedgerSource, MemberDirectory};
