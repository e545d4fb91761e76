#![warn(clippy::uninlined_format_args)]

pub mod error_presenter;
pub mod labels;
pub mod settlement_presenter;
pub mod summary_presenter;
pub mod text_table;

pub use error_presenter::{ErrorView, error_view, format_service_error};
pub use settlement_presenter::{
    BalanceView, SettlementJson, SettlementPresenter, SettlementView, TransferView, format_amount,
    format_signed,
};
pub use summary_presenter::{
    DirectionView, ExpenseLineView, MemberSummaryView, ObligationView, SummaryPresenter,
};
