pub const MEMBER: &str = "Member";
pub const BALANCE: &str = "Balance";
pub const FROM: &str = "From";
pub const TO: &str = "To";
pub const AMOUNT: &str = "Amount";
pub const PAID: &str = "Paid";
pub const SHARE: &str = "Share";
pub const SETTLED_OUT: &str = "Settled out";
pub const SETTLED_IN: &str = "Settled in";
pub const NET: &str = "Net";
pub const ACTION: &str = "Action";
pub const PAY: &str = "Pay";
pub const RECEIVE_FROM: &str = "Receive from";
pub const DESCRIPTION: &str = "Description";
pub const CATEGORY: &str = "Category";
pub const PAYER: &str = "Paid by";
pub const YOUR_SHARE: &str = "Their share";
pub const ALL_SETTLED: &str = "All settled up.";
pub const NO_EXPENSES: &str = "No expenses.";
