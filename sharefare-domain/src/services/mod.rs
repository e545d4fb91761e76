pub mod ledger_aggregator;
pub mod member_obligations;
pub mod settlement_planner;
pub mod split_policy;

pub use ledger_aggregator::{BalanceAccumulator, LedgerAggregator};
pub use member_obligations::{Direction, MemberObligations, Obligation};
pub use settlement_planner::SettlementPlanner;
pub use split_policy::EqualSplit;
