use crate::{
    labels,
    text_table::{Alignment, TextTableBuilder},
};
use serde::Serialize;
use sharefare_application::{MemberDirectory, PersonBalance, SettlementResult};
use sharefare_domain::{CurrencyScale, MemberId, Money, Transfer};
use std::borrow::Cow;

/// `{ "member", "balance" }` with the balance in minor units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub member: String,
    pub balance: i64,
}

/// `{ "from", "to", "amount" }` with the amount in minor units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferView {
    pub from: String,
    pub to: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettlementJson {
    pub balances: Vec<BalanceView>,
    pub transfers: Vec<TransferView>,
}

pub struct SettlementView {
    pub balance_table: String,
    pub transfer_table: Option<String>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementPresenter {
    scale: CurrencyScale,
}

impl SettlementPresenter {
    pub fn new(scale: CurrencyScale) -> Self {
        Self { scale }
    }

    pub fn render_with_members(
        &self,
        result: &SettlementResult,
        member_directory: &dyn MemberDirectory,
    ) -> SettlementView {
        let balance_table = self.build_balance_table(&result.balances, member_directory);
        let transfer_table = (!result.transfers.is_empty())
            .then(|| self.build_transfer_table(&result.transfers, member_directory));
        SettlementView {
            balance_table,
            transfer_table,
        }
    }

    pub fn build_balance_table(
        &self,
        person_balances: &[PersonBalance],
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(labels::MEMBER), Cow::Borrowed(labels::BALANCE)]);

        for person in person_balances {
            builder = builder.row([
                format_member_label(&person.id, member_directory),
                Cow::Owned(format_signed(person.balance, self.scale)),
            ]);
        }

        builder.build()
    }

    pub fn build_transfer_table(
        &self,
        transfers: &[Transfer],
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(labels::FROM),
                Cow::Borrowed(labels::TO),
                Cow::Borrowed(labels::AMOUNT),
            ]);

        for transfer in transfers {
            builder = builder.row([
                format_member_label(&transfer.from, member_directory),
                format_member_label(&transfer.to, member_directory),
                Cow::Owned(format_amount(transfer.amount, self.scale)),
            ]);
        }

        builder.build()
    }

    pub fn balances_json(balances: &[PersonBalance]) -> Vec<BalanceView> {
        balances
            .iter()
            .map(|person| BalanceView {
                member: person.id.to_string(),
                balance: person.balance.amount(),
            })
            .collect()
    }

    pub fn transfers_json(transfers: &[Transfer]) -> Vec<TransferView> {
        transfers
            .iter()
            .map(|transfer| TransferView {
                from: transfer.from.to_string(),
                to: transfer.to.to_string(),
                amount: transfer.amount.amount(),
            })
            .collect()
    }

    pub fn settlement_json(result: &SettlementResult) -> SettlementJson {
        SettlementJson {
            balances: Self::balances_json(&result.balances),
            transfers: Self::transfers_json(&result.transfers),
        }
    }
}

pub(crate) fn format_member_label<'a>(
    member_id: &MemberId,
    member_directory: &'a dyn MemberDirectory,
) -> Cow<'a, str> {
    match member_directory.display_name(member_id) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(member_id.to_string()),
    }
}

/// Major-unit rendering of a minor-unit amount (`1234` at scale 2 is `12.34`).
pub fn format_amount(amount: Money, scale: CurrencyScale) -> String {
    scale.to_decimal(amount).to_string()
}

/// Like [`format_amount`], with an explicit `+` on non-negative amounts.
pub fn format_signed(amount: Money, scale: CurrencyScale) -> String {
    let sign = if amount.is_negative() { "" } else { "+" };
    format!("{sign}{}", format_amount(amount, scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn sample_result() -> SettlementResult {
        SettlementResult {
            balances: vec![
                PersonBalance {
                    id: MemberId::from("a@example.com"),
                    balance: Money::from_i64(12050),
                },
                PersonBalance {
                    id: MemberId::from("b@example.com"),
                    balance: Money::from_i64(-12050),
                },
            ],
            transfers: vec![Transfer {
                from: MemberId::from("b@example.com"),
                to: MemberId::from("a@example.com"),
                amount: Money::from_i64(12050),
            }],
        }
    }

    #[rstest]
    #[case::cents(1234, 2, "12.34")]
    #[case::small_negative(-5, 2, "-0.05")]
    #[case::zero(0, 2, "0.00")]
    #[case::whole_units(1500, 0, "1500")]
    fn formats_amounts(#[case] minor: i64, #[case] scale: u32, #[case] expected: &str) {
        let scale = CurrencyScale::new(scale).expect("supported scale");
        assert_eq!(format_amount(Money::from_i64(minor), scale), expected);
    }

    #[test]
    fn signs_non_negative_balances() {
        assert_eq!(format_signed(Money::ZERO, CurrencyScale::CENTS), "+0.00");
        assert_eq!(format_signed(Money::from_i64(-1), CurrencyScale::CENTS), "-0.01");
    }

    #[test]
    fn render_uses_display_name_when_available() {
        let mut directory = HashMap::new();
        directory.insert(MemberId::from("a@example.com"), "Asha".to_string());

        let view = SettlementPresenter::default().render_with_members(&sample_result(), &directory);

        assert!(view.balance_table.contains("Asha"));
        assert!(view.balance_table.contains("+120.50"));
        assert!(!view.balance_table.contains("a@example.com"));
        let transfers = view.transfer_table.expect("transfer table");
        assert!(transfers.contains("Asha"));
        assert!(transfers.contains("b@example.com"));
    }

    #[test]
    fn settled_group_has_no_transfer_table() {
        let result = SettlementResult {
            balances: vec![PersonBalance {
                id: MemberId::from("a@example.com"),
                balance: Money::ZERO,
            }],
            transfers: vec![],
        };
        let no_names: HashMap<MemberId, String> = HashMap::new();
        let view = SettlementPresenter::default().render_with_members(&result, &no_names);
        assert!(view.transfer_table.is_none());
    }

    #[test]
    fn json_uses_minor_units() {
        let json = serde_json::to_value(SettlementPresenter::settlement_json(&sample_result()))
            .expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "balances": [
                    {"member": "a@example.com", "balance": 12050},
                    {"member": "b@example.com", "balance": -12050}
                ],
                "transfers": [
                    {"from": "b@example.com", "to": "a@example.com", "amount": 12050}
                ]
            })
        );
    }
}
