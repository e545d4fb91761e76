use crate::{
    error::LedgerServiceError,
    model::{ExpenseFilter, ExpenseLine, GroupId, GroupSnapshot, PersonBalance, SettlementResult},
    ports::GroupLedgerSource,
};
use sharefare_domain::{
    EqualSplit, LedgerAggregator, LedgerError, MemberBalances, MemberId, MemberObligations,
    MemberSummary, Obligation, SettlementPlanner, Transfer,
};

/// Group-level use cases: every call works from a single snapshot of the
/// group, so members, expenses and payments always agree with each other.
#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    source: &'a dyn GroupLedgerSource,
    aggregator: LedgerAggregator,
    planner: SettlementPlanner,
}

impl<'a> LedgerService<'a> {
    pub fn new(source: &'a dyn GroupLedgerSource) -> Self {
        Self {
            source,
            aggregator: LedgerAggregator,
            planner: SettlementPlanner,
        }
    }

    pub fn balances(&self, group_id: GroupId) -> Result<Vec<PersonBalance>, LedgerServiceError> {
        tracing::debug!(%group_id, "Computing balances");
        let snapshot = self.snapshot(group_id)?;
        let balances = self.compute(&snapshot)?;
        Ok(Self::to_person_balances(balances))
    }

    pub fn settlement(&self, group_id: GroupId) -> Result<SettlementResult, LedgerServiceError> {
        tracing::debug!(%group_id, "Planning settlement");
        let snapshot = self.snapshot(group_id)?;
        let balances = self.compute(&snapshot)?;
        let transfers = self.plan(group_id, &balances)?;
        Ok(SettlementResult {
            balances: Self::to_person_balances(balances),
            transfers,
        })
    }

    pub fn member_summaries(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<MemberSummary>, LedgerServiceError> {
        tracing::debug!(%group_id, "Summarizing members");
        let snapshot = self.snapshot(group_id)?;
        self.aggregator
            .summarize(
                &snapshot.member_set(),
                &snapshot.expenses(),
                &snapshot.payments,
            )
            .map_err(|err| Self::ledger_failure(group_id, err))
    }

    /// The planned transfers `member` takes part in, from their side.
    pub fn obligations_for(
        &self,
        group_id: GroupId,
        member: &MemberId,
    ) -> Result<Vec<Obligation>, LedgerServiceError> {
        tracing::debug!(%group_id, %member, "Projecting obligations");
        let snapshot = self.snapshot(group_id)?;
        Self::ensure_member(&snapshot, member)?;
        let balances = self.compute(&snapshot)?;
        let transfers = self.plan(group_id, &balances)?;
        Ok(MemberObligations::for_member(member, &transfers))
    }

    /// Lists the group's expenses in recording order.
    pub fn expenses_for(
        &self,
        group_id: GroupId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<ExpenseLine>, LedgerServiceError> {
        tracing::debug!(%group_id, ?filter, "Listing expenses");
        let snapshot = self.snapshot(group_id)?;
        if let Some(member) = filter.member() {
            Self::ensure_member(&snapshot, member)?;
        }

        let lines = snapshot
            .expenses
            .into_iter()
            .filter(|record| filter.matches(&record.expense))
            .map(|record| {
                let member_share = filter
                    .member()
                    .map(|member| EqualSplit::share_of(&record.expense, member));
                ExpenseLine {
                    record,
                    member_share,
                }
            })
            .collect();
        Ok(lines)
    }

    fn snapshot(&self, group_id: GroupId) -> Result<GroupSnapshot, LedgerServiceError> {
        self.source.snapshot(group_id).map_err(|err| {
            tracing::warn!(%group_id, error = %err, "Failed to load group snapshot");
            LedgerServiceError::from(err)
        })
    }

    fn compute(&self, snapshot: &GroupSnapshot) -> Result<MemberBalances, LedgerServiceError> {
        self.aggregator
            .compute_balances_with_payments(
                &snapshot.member_set(),
                &snapshot.expenses(),
                &snapshot.payments,
            )
            .map_err(|err| Self::ledger_failure(snapshot.group_id, err))
    }

    fn plan(
        &self,
        group_id: GroupId,
        balances: &MemberBalances,
    ) -> Result<Vec<Transfer>, LedgerServiceError> {
        let transfers = self.planner.plan(balances).inspect_err(|err| {
            tracing::warn!(%group_id, error = %err, "Settlement planning failed");
        })?;
        Ok(transfers)
    }

    fn ensure_member(
        snapshot: &GroupSnapshot,
        member: &MemberId,
    ) -> Result<(), LedgerServiceError> {
        if snapshot.members.contains(member) {
            Ok(())
        } else {
            tracing::warn!(group_id = %snapshot.group_id, %member, "Member not in group");
            Err(LedgerServiceError::NotAMember {
                group_id: snapshot.group_id,
                member: member.clone(),
            })
        }
    }

    fn ledger_failure(group_id: GroupId, err: LedgerError) -> LedgerServiceError {
        tracing::warn!(%group_id, error = %err, "Ledger computation rejected");
        LedgerServiceError::Ledger(err)
    }

    fn to_person_balances(balances: MemberBalances) -> Vec<PersonBalance> {
        balances
            .into_iter()
            .map(|(id, balance)| PersonBalance { id, balance })
            .collect()
    }
}
