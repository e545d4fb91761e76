#![warn(clippy::uninlined_format_args)]

pub mod currency;
pub mod error;
pub mod model;
pub mod services;

pub use currency::{AtomicUnitConversionError, CurrencyScale, MAX_CURRENCY_SCALE};
pub use error::{EntryRef, LedgerError};
pub use model::{
    Expense, MemberBalances, MemberId, MemberSet, MemberSummary, Money, RecordedPayment, Share,
    SplitEven, Transfer,
};
pub use services::{
    BalanceAccumulator, Direction, EqualSplit, LedgerAggregator, MemberObligations, Obligation,
    SettlementPlanner,
};
