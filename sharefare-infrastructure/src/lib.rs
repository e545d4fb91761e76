#![warn(clippy::uninlined_format_args)]

pub mod ledger_file;
pub mod memory_store;

pub use ledger_file::{AmountLiteral, LedgerEntries, LedgerFile, LedgerFileError};
pub use memory_store::{GroupListing, InMemoryGroupStore, InviteToken, NewExpense, StoreError};
