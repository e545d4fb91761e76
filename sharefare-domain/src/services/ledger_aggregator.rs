use crate::{
    error::{EntryRef, LedgerError},
    model::{Expense, MemberBalances, MemberId, MemberSet, MemberSummary, Money, RecordedPayment},
    services::EqualSplit,
};
use std::collections::BTreeMap;

/// Running per-member totals over a validated sequence of ledger entries.
///
/// Every entry is validated in full before any total is touched, so a
/// rejected entry leaves the accumulator exactly as it was.
pub struct BalanceAccumulator<'m> {
    members: &'m MemberSet,
    positions: BTreeMap<MemberId, MemberSummary>,
}

impl<'m> BalanceAccumulator<'m> {
    pub fn new(members: &'m MemberSet) -> Self {
        let positions = members
            .iter()
            .map(|member| (member.clone(), MemberSummary::new(member.clone())))
            .collect();
        Self { members, positions }
    }

    pub fn apply_expense(&mut self, index: usize, expense: &Expense) -> Result<(), LedgerError> {
        let entry = EntryRef::Expense(index);
        if !expense.amount.is_positive() {
            return Err(LedgerError::InvalidAmount {
                entry,
                amount: expense.amount,
            });
        }
        if expense.participants.is_empty() {
            return Err(LedgerError::NoParticipants { entry });
        }
        self.ensure_member(entry, &expense.payer)?;
        for participant in &expense.participants {
            self.ensure_member(entry, participant)?;
        }

        let overflow = || LedgerError::AmountOverflow { entry };
        let mut staged = BTreeMap::new();
        let payer = self.staged(&mut staged, &expense.payer);
        payer.paid = payer.paid.checked_add(expense.amount).ok_or_else(overflow)?;
        for share in EqualSplit::shares(expense) {
            let position = self.staged(&mut staged, &share.member);
            position.share = position.share.checked_add(share.amount).ok_or_else(overflow)?;
        }
        self.commit(entry, staged)
    }

    pub fn apply_payment(
        &mut self,
        index: usize,
        payment: &RecordedPayment,
    ) -> Result<(), LedgerError> {
        let entry = EntryRef::Payment(index);
        if !payment.amount.is_positive() {
            return Err(LedgerError::InvalidAmount {
                entry,
                amount: payment.amount,
            });
        }
        self.ensure_member(entry, &payment.from)?;
        self.ensure_member(entry, &payment.to)?;
        if payment.from == payment.to {
            return Err(LedgerError::SelfPayment {
                entry,
                member: payment.from.clone(),
            });
        }

        let overflow = || LedgerError::AmountOverflow { entry };
        let mut staged = BTreeMap::new();
        let from = self.staged(&mut staged, &payment.from);
        from.settled_out = from
            .settled_out
            .checked_add(payment.amount)
            .ok_or_else(overflow)?;
        let to = self.staged(&mut staged, &payment.to);
        to.settled_in = to
            .settled_in
            .checked_add(payment.amount)
            .ok_or_else(overflow)?;
        self.commit(entry, staged)
    }

    pub fn balances(&self) -> MemberBalances {
        self.positions
            .iter()
            .map(|(member, position)| (member.clone(), position.net()))
            .collect()
    }

    pub fn into_summaries(self) -> Vec<MemberSummary> {
        self.positions.into_values().collect()
    }

    fn ensure_member(&self, entry: EntryRef, member: &MemberId) -> Result<(), LedgerError> {
        if self.members.contains(member) {
            Ok(())
        } else {
            Err(LedgerError::UnknownMember {
                entry,
                member: member.clone(),
            })
        }
    }

    /// Working copy of a member's totals for the entry being applied.
    fn staged<'s>(
        &self,
        staged: &'s mut BTreeMap<MemberId, MemberSummary>,
        member: &MemberId,
    ) -> &'s mut MemberSummary {
        staged.entry(member.clone()).or_insert_with(|| {
            self.positions
                .get(member)
                .cloned()
                .unwrap_or_else(|| MemberSummary::new(member.clone()))
        })
    }

    /// Publishes the staged totals once every touched member still has a net
    /// balance whose magnitude fits in `i64`.
    fn commit(
        &mut self,
        entry: EntryRef,
        staged: BTreeMap<MemberId, MemberSummary>,
    ) -> Result<(), LedgerError> {
        let representable = staged
            .values()
            .all(|position| position.checked_net().and_then(Money::checked_abs).is_some());
        if !representable {
            return Err(LedgerError::AmountOverflow { entry });
        }
        self.positions.extend(staged);
        Ok(())
    }
}

/// Ledger aggregation service: nets a group's expenses into per-member
/// balances under the equal-split policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Computes every member's net balance from the group's expenses.
    ///
    /// Expenses are processed in input order; the first invalid one aborts the
    /// computation. The result covers every member (zero when untouched) and
    /// sums to exactly zero.
    pub fn compute_balances(
        &self,
        members: &MemberSet,
        expenses: &[Expense],
    ) -> Result<MemberBalances, LedgerError> {
        self.compute_balances_with_payments(members, expenses, &[])
    }

    /// Like [`compute_balances`](Self::compute_balances), then applies
    /// settle-up payments that were already made.
    pub fn compute_balances_with_payments(
        &self,
        members: &MemberSet,
        expenses: &[Expense],
        payments: &[RecordedPayment],
    ) -> Result<MemberBalances, LedgerError> {
        let accumulator = Self::accumulate(members, expenses, payments)?;
        let balances = accumulator.balances();

        debug_assert_eq!(
            balances
                .values()
                .map(|balance| i128::from(balance.amount()))
                .sum::<i128>(),
            0
        );
        tracing::debug!(
            member_count = members.len(),
            expense_count = expenses.len(),
            payment_count = payments.len(),
            "Computed group balances"
        );
        Ok(balances)
    }

    /// Per-member paid/share/settled totals, in member order.
    pub fn summarize(
        &self,
        members: &MemberSet,
        expenses: &[Expense],
        payments: &[RecordedPayment],
    ) -> Result<Vec<MemberSummary>, LedgerError> {
        Ok(Self::accumulate(members, expenses, payments)?.into_summaries())
    }

    fn accumulate<'m>(
        members: &'m MemberSet,
        expenses: &[Expense],
        payments: &[RecordedPayment],
    ) -> Result<BalanceAccumulator<'m>, LedgerError> {
        let mut accumulator = BalanceAccumulator::new(members);
        for (index, expense) in expenses.iter().enumerate() {
            accumulator.apply_expense(index, expense)?;
        }
        for (index, payment) in payments.iter().enumerate() {
            accumulator.apply_payment(index, payment)?;
        }
        Ok(accumulator)
    }
}
