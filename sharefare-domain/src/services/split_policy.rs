use crate::model::{Expense, MemberId, Money, Share};
use smallvec::SmallVec;

/// Inline capacity for per-expense sharer lists; typical groups are small.
pub type Sharers<'e> = SmallVec<[&'e MemberId; 8]>;
pub type Shares = SmallVec<[Share; 8]>;

/// Equal-split policy: the amount is divided across the payer and every
/// participant.
///
/// Sharer order is the payer first, then the other participants sorted by id.
/// The division remainder goes one minor unit at a time to the sharers at the
/// front of that order.
pub struct EqualSplit;

impl EqualSplit {
    pub fn sharers(expense: &Expense) -> Sharers<'_> {
        let mut others: Sharers<'_> = expense
            .participants
            .iter()
            .filter(|participant| **participant != expense.payer)
            .collect();
        others.sort_unstable();
        others.dedup();

        let mut sharers = Sharers::with_capacity(others.len() + 1);
        sharers.push(&expense.payer);
        sharers.extend(others);
        sharers
    }

    pub fn shares(expense: &Expense) -> Shares {
        let sharers = Self::sharers(expense);
        let parts = expense.amount.split_even(sharers.len());
        sharers
            .into_iter()
            .zip(parts)
            .map(|(member, amount)| Share {
                member: member.clone(),
                amount,
            })
            .collect()
    }

    /// What `member` owes towards `expense`; zero when they are not a sharer.
    pub fn share_of(expense: &Expense, member: &MemberId) -> Money {
        let sharers = Self::sharers(expense);
        let Some(position) = sharers.iter().position(|sharer| *sharer == member) else {
            return Money::ZERO;
        };
        expense
            .amount
            .split_even(sharers.len())
            .nth(position)
            .unwrap_or(Money::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(names: &[&str]) -> Vec<MemberId> {
        names.iter().copied().map(MemberId::from).collect()
    }

    #[rstest]
    #[case::payer_not_listed("a", &["c", "b"], &["a", "b", "c"])]
    #[case::payer_listed("b", &["c", "b", "a"], &["b", "a", "c"])]
    #[case::duplicates("a", &["b", "b", "a"], &["a", "b"])]
    #[case::only_payer("a", &["a"], &["a"])]
    fn sharers_put_payer_first_then_sorted(
        #[case] payer: &str,
        #[case] participants: &[&str],
        #[case] expected: &[&str],
    ) {
        let expense = Expense::new(payer, Money::from_i64(100), ids(participants));
        let sharers: Vec<&str> = EqualSplit::sharers(&expense)
            .into_iter()
            .map(MemberId::as_str)
            .collect();
        assert_eq!(sharers, expected);
    }

    #[test]
    fn remainder_goes_to_payer_first() {
        let expense = Expense::new("c", Money::from_i64(100), ids(&["b", "a"]));
        let shares = EqualSplit::shares(&expense);
        let shares: Vec<(&str, i64)> = shares
            .iter()
            .map(|share| (share.member.as_str(), share.amount.amount()))
            .collect();
        assert_eq!(shares, vec![("c", 34), ("a", 33), ("b", 33)]);
    }

    #[rstest]
    #[case::payer("a", 34)]
    #[case::participant("c", 33)]
    #[case::outsider("z", 0)]
    fn share_of_matches_shares(#[case] member: &str, #[case] expected: i64) {
        let expense = Expense::new("a", Money::from_i64(100), ids(&["b", "c"]));
        assert_eq!(
            EqualSplit::share_of(&expense, &MemberId::from(member)),
            Money::from_i64(expected)
        );
    }
}
