//! JSON ledger files: a group's members, expenses and recorded payments with
//! amounts written in major units.
//!
//! ```json
//! {
//!   "name": "Goa trip",
//!   "members": ["asha@example.com", "ravi@example.com"],
//!   "names": { "asha@example.com": "Asha" },
//!   "expenses": [
//!     { "payer": "asha@example.com", "amount": "1200.50",
//!       "participants": ["ravi@example.com"], "category": "travel" }
//!   ],
//!   "payments": [{ "from": "ravi@example.com", "to": "asha@example.com", "amount": 100 }]
//! }
//! ```

use crate::memory_store::{NewExpense, StoreError};
use rust_decimal::Decimal;
use serde::Deserialize;
use sharefare_application::{ExpenseCategory, UnknownCategory};
use sharefare_domain::{
    AtomicUnitConversionError, CurrencyScale, EntryRef, Expense, MemberId, Money, RecordedPayment,
};
use std::{collections::BTreeMap, fs, path::Path, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerFileError {
    #[error("failed to read ledger file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ledger file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{entry}: `{literal}` is not a decimal amount")]
    InvalidDecimal { entry: EntryRef, literal: String },
    #[error("{entry}: amount cannot be expressed in minor units: {source}")]
    Amount {
        entry: EntryRef,
        source: AtomicUnitConversionError,
    },
    #[error("{entry}: {source}")]
    Category {
        entry: EntryRef,
        source: UnknownCategory,
    },
    #[error("ledger file lists no members")]
    NoMembers,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Amount as written in the file: a decimal string or a whole number.
///
/// Floating-point JSON numbers are not accepted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AmountLiteral {
    Integer(i64),
    Text(String),
}

impl AmountLiteral {
    fn to_money(&self, entry: EntryRef, scale: CurrencyScale) -> Result<Money, LedgerFileError> {
        let decimal = match self {
            AmountLiteral::Integer(value) => Decimal::from(*value),
            AmountLiteral::Text(text) => {
                Decimal::from_str(text.trim()).map_err(|_| LedgerFileError::InvalidDecimal {
                    entry,
                    literal: text.clone(),
                })?
            }
        };
        scale
            .to_minor_units(decimal)
            .map_err(|source| LedgerFileError::Amount { entry, source })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExpenseEntry {
    pub payer: String,
    pub amount: AmountLiteral,
    pub participants: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PaymentEntry {
    pub from: String,
    pub to: String,
    pub amount: AmountLiteral,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LedgerFile {
    pub name: String,
    pub members: Vec<String>,
    /// Optional display names keyed by member identifier.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
    #[serde(default)]
    pub payments: Vec<PaymentEntry>,
}

/// File entries converted to minor units, ready to store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntries {
    pub expenses: Vec<NewExpense>,
    pub payments: Vec<RecordedPayment>,
}

impl LedgerFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LedgerFileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Read ledger file");
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, LedgerFileError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Converts every entry, stopping at the first malformed one.
    pub fn to_entries(&self, scale: CurrencyScale) -> Result<LedgerEntries, LedgerFileError> {
        let expenses = self
            .expenses
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<NewExpense, LedgerFileError> {
                let entry_ref = EntryRef::Expense(index);
                let category = match entry.category.as_deref() {
                    Some(category) => category.parse::<ExpenseCategory>().map_err(|source| {
                        LedgerFileError::Category {
                            entry: entry_ref,
                            source,
                        }
                    })?,
                    None => ExpenseCategory::default(),
                };
                Ok(NewExpense {
                    description: entry.description.clone().unwrap_or_default(),
                    category,
                    expense: Expense::new(
                        entry.payer.as_str(),
                        entry.amount.to_money(entry_ref, scale)?,
                        entry.participants.iter().map(|p| MemberId::from(p.as_str())),
                    ),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let payments = self
            .payments
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<RecordedPayment, LedgerFileError> {
                Ok(RecordedPayment {
                    from: MemberId::from(entry.from.as_str()),
                    to: MemberId::from(entry.to.as_str()),
                    amount: entry.amount.to_money(EntryRef::Payment(index), scale)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LedgerEntries { expenses, payments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scale() -> CurrencyScale {
        CurrencyScale::CENTS
    }

    #[rstest]
    #[case::decimal_text(AmountLiteral::Text("12.34".to_string()), 1234)]
    #[case::padded_text(AmountLiteral::Text(" 7.5 ".to_string()), 750)]
    #[case::whole_number(AmountLiteral::Integer(300), 30000)]
    fn converts_amount_literals(#[case] literal: AmountLiteral, #[case] expected: i64) {
        let money = literal
            .to_money(EntryRef::Expense(0), scale())
            .expect("convertible amount");
        assert_eq!(money, Money::from_i64(expected));
    }

    #[test]
    fn rejects_sub_cent_amounts() {
        let literal = AmountLiteral::Text("0.001".to_string());
        let err = literal
            .to_money(EntryRef::Expense(2), scale())
            .expect_err("too precise");
        assert!(matches!(
            err,
            LedgerFileError::Amount {
                entry: EntryRef::Expense(2),
                source: AtomicUnitConversionError::NonIntegral,
            }
        ));
    }

    #[test]
    fn rejects_non_numeric_text() {
        let literal = AmountLiteral::Text("ten".to_string());
        let err = literal
            .to_money(EntryRef::Payment(0), scale())
            .expect_err("not a number");
        assert_eq!(err.to_string(), "payment #0: `ten` is not a decimal amount");
    }

    #[test]
    fn parses_full_file() {
        let file = LedgerFile::from_json(
            r#"{
                "name": "Flat",
                "members": ["a", "b"],
                "expenses": [
                    {"payer": "a", "amount": "10.01", "participants": ["b"],
                     "description": "Milk", "category": "Food"},
                    {"payer": "b", "amount": 4, "participants": ["a", "b"]}
                ],
                "payments": [{"from": "b", "to": "a", "amount": "1.00"}]
            }"#,
        )
        .expect("valid json");

        let entries = file.to_entries(scale()).expect("valid entries");
        assert_eq!(entries.expenses.len(), 2);
        assert_eq!(entries.expenses[0].category, ExpenseCategory::Food);
        assert_eq!(entries.expenses[0].description, "Milk");
        assert_eq!(entries.expenses[0].expense.amount, Money::from_i64(1001));
        assert_eq!(entries.expenses[1].category, ExpenseCategory::Other);
        assert_eq!(entries.expenses[1].expense.amount, Money::from_i64(400));
        assert_eq!(entries.payments[0].amount, Money::from_i64(100));
    }

    #[test]
    fn unknown_category_names_the_entry() {
        let file = LedgerFile::from_json(
            r#"{"name": "Flat", "members": ["a"],
                "expenses": [{"payer": "a", "amount": 1, "participants": ["a"],
                              "category": "rent"}]}"#,
        )
        .expect("valid json");

        let err = file.to_entries(scale()).expect_err("unknown category");
        assert_eq!(
            err.to_string(),
            "expense #0: unknown expense category `rent`"
        );
    }

    #[test]
    fn float_amounts_are_rejected() {
        let result = LedgerFile::from_json(
            r#"{"name": "Flat", "members": ["a"],
                "expenses": [{"payer": "a", "amount": 1.5, "participants": ["a"]}]}"#,
        );
        assert!(matches!(result, Err(LedgerFileError::Json(_))));
    }
}
