use crate::{
    error::LedgerError,
    model::{MemberBalances, MemberId, Money, Transfer},
};
use std::{cmp::Ordering, collections::BinaryHeap};

/// Settlement planning service.
///
/// Greedy largest-creditor / largest-debtor matching. Each step settles at
/// least one party in full, so a ledger with `n` non-zero balances needs at
/// most `n - 1` transfers. The result is not guaranteed to be the global
/// minimum (that problem is NP-hard); it is fast and deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementPlanner;

/// A creditor or debtor with the magnitude still to settle.
#[derive(Debug, PartialEq, Eq)]
struct Party {
    /// Magnitude of the balance; `i64::MIN` debtors fit.
    remaining: u64,
    member: MemberId,
}

impl Ord for Party {
    // Max-heap order: larger remaining first, then the smaller member id.
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.member.cmp(&self.member))
    }
}

impl PartialOrd for Party {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl SettlementPlanner {
    /// Plans transfers that drive every balance to zero.
    ///
    /// # Errors
    /// `UnbalancedLedger` when the balances do not sum to zero. Only a faulty
    /// aggregation can produce such input, so it is reported, never repaired.
    pub fn plan(&self, balances: &MemberBalances) -> Result<Vec<Transfer>, LedgerError> {
        // Summed wide so large balanced ledgers cannot overflow on the way.
        let wide_total: i128 = balances
            .values()
            .map(|balance| i128::from(balance.amount()))
            .sum();
        if wide_total != 0 {
            let total = Money::from_i64(
                wide_total.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
            );
            tracing::error!(
                reject_reason = "input_imbalance",
                member_count = balances.len(),
                total = %total,
                "Settlement planning rejected due to input imbalance"
            );
            return Err(LedgerError::UnbalancedLedger { total });
        }

        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();
        for (member, balance) in balances {
            let party = Party {
                remaining: balance.unsigned_abs(),
                member: member.clone(),
            };
            if balance.is_positive() {
                creditors.push(party);
            } else if balance.is_negative() {
                debtors.push(party);
            }
        }
        let nonzero_count = creditors.len() + debtors.len();

        let mut transfers = Vec::with_capacity(nonzero_count.saturating_sub(1));
        while let (Some(mut creditor), Some(mut debtor)) = (creditors.pop(), debtors.pop()) {
            let amount = creditor.remaining.min(debtor.remaining);
            creditor.remaining -= amount;
            debtor.remaining -= amount;
            transfers.push(Transfer {
                from: debtor.member.clone(),
                to: creditor.member.clone(),
                // Bounded by a creditor's positive balance.
                amount: Money::from_i64(amount as i64),
            });

            if creditor.remaining != 0 {
                creditors.push(creditor);
            }
            if debtor.remaining != 0 {
                debtors.push(debtor);
            }
        }

        debug_assert!(creditors.is_empty() && debtors.is_empty());
        debug_assert!(transfers.len() <= nonzero_count.saturating_sub(1));
        tracing::debug!(
            nonzero_count,
            transfer_count = transfers.len(),
            "Planned settlement transfers"
        );
        Ok(transfers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn planner() -> SettlementPlanner {
        SettlementPlanner
    }

    fn balances(entries: &[(&str, i64)]) -> MemberBalances {
        entries
            .iter()
            .map(|(member, amount)| (MemberId::from(*member), Money::from_i64(*amount)))
            .collect()
    }

    fn as_triples(transfers: &[Transfer]) -> Vec<(&str, &str, i64)> {
        transfers
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str(), t.amount.amount()))
            .collect()
    }

    #[rstest]
    #[case::one_creditor_two_debtors(
        &[("A", 200), ("B", -100), ("C", -100)],
        vec![("B", "A", 100), ("C", "A", 100)]
    )]
    #[case::two_people(
        &[("A", 100), ("B", -100)],
        vec![("B", "A", 100)]
    )]
    #[case::largest_pair_first(
        &[("A", 50), ("B", 150), ("C", -120), ("D", -80)],
        vec![("C", "B", 120), ("D", "A", 50), ("D", "B", 30)]
    )]
    #[case::zero_members_ignored(
        &[("A", 0), ("B", 30), ("C", -30), ("D", 0)],
        vec![("C", "B", 30)]
    )]
    #[case::creditor_ties_break_by_id(
        &[("B", 10), ("A", 10), ("C", -20)],
        vec![("C", "A", 10), ("C", "B", 10)]
    )]
    #[case::all_zero(&[("A", 0), ("B", 0)], vec![])]
    #[case::empty(&[], vec![])]
    fn plan_cases(
        planner: SettlementPlanner,
        #[case] input: &[(&str, i64)],
        #[case] expected: Vec<(&str, &str, i64)>,
    ) {
        let transfers = planner.plan(&balances(input)).expect("balanced input");
        assert_eq!(as_triples(&transfers), expected);
    }

    #[rstest]
    fn rejects_unbalanced_ledger(planner: SettlementPlanner) {
        let result = planner.plan(&balances(&[("A", 50), ("B", -40)]));
        assert_eq!(
            result,
            Err(LedgerError::UnbalancedLedger {
                total: Money::from_i64(10)
            })
        );
    }

    #[rstest]
    fn applying_transfers_zeroes_balances(planner: SettlementPlanner) {
        let input = balances(&[("A", 70), ("B", -25), ("C", 5), ("D", -40), ("E", -10)]);
        let transfers = planner.plan(&input).expect("balanced input");

        let mut settled = input.clone();
        for transfer in &transfers {
            *settled.get_mut(&transfer.from).expect("debtor") += transfer.amount;
            *settled.get_mut(&transfer.to).expect("creditor") -= transfer.amount;
        }

        assert!(settled.values().all(|balance| balance.is_zero()));
        assert!(transfers.len() <= 4);
    }

    #[rstest]
    fn settles_balances_at_the_i64_bounds(planner: SettlementPlanner) {
        let input = balances(&[
            ("A", i64::MAX),
            ("B", 1),
            ("C", i64::MIN),
            ("D", i64::MAX),
            ("E", -i64::MAX),
        ]);

        let transfers = planner.plan(&input).expect("balanced input");

        assert_eq!(
            as_triples(&transfers),
            vec![
                ("C", "A", i64::MAX),
                ("E", "D", i64::MAX),
                ("C", "B", 1)
            ]
        );
    }

    #[rstest]
    fn reports_unbalanced_total_beyond_i64(planner: SettlementPlanner) {
        let result = planner.plan(&balances(&[("A", i64::MAX), ("B", i64::MAX)]));
        assert_eq!(
            result,
            Err(LedgerError::UnbalancedLedger {
                total: Money::from_i64(i64::MAX)
            })
        );
    }
}
