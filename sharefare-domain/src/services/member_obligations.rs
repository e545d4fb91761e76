use crate::model::{MemberId, Money, Transfer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The member pays the counterparty.
    Pay,
    /// The counterparty pays the member.
    Receive,
}

/// One line of a member's personal settle-up view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obligation {
    pub counterparty: MemberId,
    pub direction: Direction,
    pub amount: Money,
}

/// Projects a settlement plan onto a single member.
pub struct MemberObligations;

impl MemberObligations {
    /// Transfers involving `member`, from their point of view, in plan order.
    pub fn for_member(member: &MemberId, transfers: &[Transfer]) -> Vec<Obligation> {
        transfers
            .iter()
            .filter_map(|transfer| {
                if transfer.from == *member {
                    Some(Obligation {
                        counterparty: transfer.to.clone(),
                        direction: Direction::Pay,
                        amount: transfer.amount,
                    })
                } else if transfer.to == *member {
                    Some(Obligation {
                        counterparty: transfer.from.clone(),
                        direction: Direction::Receive,
                        amount: transfer.amount,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Net amount across obligations: positive when the member is owed money.
    pub fn net(obligations: &[Obligation]) -> Money {
        obligations
            .iter()
            .map(|obligation| match obligation.direction {
                Direction::Pay => -obligation.amount,
                Direction::Receive => obligation.amount,
            })
            .sum()
    }
}
