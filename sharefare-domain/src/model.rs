use arcstr::ArcStr;
use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// Stable identifier of a group member (an e-mail address or user id).
///
/// Ordering is byte-wise on the identifier and is the tie-break order used by
/// the split policy and the settlement planner.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(ArcStr);

impl MemberId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(ArcStr::from(value))
    }
}

/// Signed amount in integer minor units (cents, paise, yen).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// `None` for `i64::MIN`, whose magnitude has no positive counterpart.
    pub fn checked_abs(self) -> Option<Self> {
        self.0.checked_abs().map(Self)
    }

    pub fn unsigned_abs(self) -> u64 {
        self.0.unsigned_abs()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Splits the amount into `parts` shares that differ by at most one minor
    /// unit. The first `amount mod parts` shares carry the extra unit, so the
    /// shares always add back up to the original amount.
    pub fn split_even(self, parts: usize) -> SplitEven {
        let divisor = parts.max(1) as i64;
        SplitEven {
            base: self.0.div_euclid(divisor),
            remainder: self.0.rem_euclid(divisor) as usize,
            index: 0,
            parts,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Iterator returned by [`Money::split_even`].
#[derive(Clone, Debug)]
pub struct SplitEven {
    base: i64,
    remainder: usize,
    index: usize,
    parts: usize,
}

impl Iterator for SplitEven {
    type Item = Money;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.parts {
            return None;
        }
        let extra = i64::from(self.index < self.remainder);
        self.index += 1;
        Some(Money(self.base + extra))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.parts - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for SplitEven {}

/// Authoritative membership of a group, kept sorted and deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberSet {
    members: Vec<MemberId>,
}

impl MemberSet {
    pub fn new(members: impl IntoIterator<Item = MemberId>) -> Self {
        let mut members: Vec<MemberId> = members.into_iter().collect();
        members.sort_unstable();
        members.dedup();
        Self { members }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberId> + '_ {
        self.members.iter()
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.binary_search(member).is_ok()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<MemberId> for MemberSet {
    fn from_iter<T: IntoIterator<Item = MemberId>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// One shared expense: `payer` paid `amount` on behalf of `participants`.
///
/// The payer always counts as a sharer, whether or not they are listed among
/// the participants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub payer: MemberId,
    pub amount: Money,
    pub participants: Vec<MemberId>,
}

impl Expense {
    pub fn new(
        payer: impl Into<MemberId>,
        amount: Money,
        participants: impl IntoIterator<Item = MemberId>,
    ) -> Self {
        Self {
            payer: payer.into(),
            amount,
            participants: participants.into_iter().collect(),
        }
    }

    pub fn involves(&self, member: &MemberId) -> bool {
        self.payer == *member || self.participants.contains(member)
    }
}

/// A settle-up payment that has already changed hands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedPayment {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

/// A member's portion of a single expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub member: MemberId,
    pub amount: Money,
}

/// Net balance per member: positive is owed money, negative owes money.
pub type MemberBalances = BTreeMap<MemberId, Money>;

/// A recommended payment from a debtor to a creditor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

/// Per-member totals behind a net balance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberSummary {
    pub member: MemberId,
    /// Sum of expense amounts the member paid.
    pub paid: Money,
    /// Sum of the member's split shares.
    pub share: Money,
    /// Recorded settle-up payments the member sent.
    pub settled_out: Money,
    /// Recorded settle-up payments the member received.
    pub settled_in: Money,
}

impl MemberSummary {
    pub fn new(member: MemberId) -> Self {
        Self {
            member,
            ..Self::default()
        }
    }

    /// Net position, or `None` when it does not fit in `i64`.
    pub fn checked_net(&self) -> Option<Money> {
        i64::try_from(self.wide_net()).ok().map(Money)
    }

    /// Net position clamped to the `i64` range. Totals built by
    /// `BalanceAccumulator` always have an exact net.
    pub fn net(&self) -> Money {
        let clamped = self
            .wide_net()
            .clamp(i128::from(i64::MIN), i128::from(i64::MAX));
        Money(clamped as i64)
    }

    fn wide_net(&self) -> i128 {
        i128::from(self.paid.0) - i128::from(self.share.0) + i128::from(self.settled_out.0)
            - i128::from(self.settled_in.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact(300, 3, vec![100, 100, 100])]
    #[case::one_left_over(100, 3, vec![34, 33, 33])]
    #[case::two_left_over(101, 3, vec![34, 34, 33])]
    #[case::single_part(7, 1, vec![7])]
    #[case::more_parts_than_units(2, 5, vec![1, 1, 0, 0, 0])]
    #[case::zero_parts(10, 0, vec![])]
    fn split_even_front_loads_remainder(
        #[case] amount: i64,
        #[case] parts: usize,
        #[case] expected: Vec<i64>,
    ) {
        let shares: Vec<i64> = Money::from_i64(amount)
            .split_even(parts)
            .map(Money::amount)
            .collect();
        assert_eq!(shares, expected);
    }

    #[test]
    fn split_even_reports_exact_size() {
        let split = Money::from_i64(10).split_even(4);
        assert_eq!(split.len(), 4);
    }

    #[test]
    fn member_set_sorts_and_dedups() {
        let set = MemberSet::new(["c", "a", "b", "a"].map(MemberId::from));
        let ids: Vec<&str> = set.iter().map(MemberId::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(set.contains(&MemberId::from("b")));
        assert!(!set.contains(&MemberId::from("d")));
    }

    #[test]
    fn summary_net_combines_all_totals() {
        let summary = MemberSummary {
            member: MemberId::from("a"),
            paid: Money::from_i64(300),
            share: Money::from_i64(100),
            settled_out: Money::from_i64(10),
            settled_in: Money::from_i64(50),
        };
        assert_eq!(summary.net(), Money::from_i64(160));
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let max = Money::from_i64(i64::MAX);
        assert_eq!(max.checked_add(Money::from_i64(1)), None);
        assert_eq!(Money::from_i64(i64::MIN).checked_sub(Money::from_i64(1)), None);
        assert_eq!(Money::from_i64(i64::MIN).checked_abs(), None);
        assert_eq!(Money::from_i64(-5).checked_abs(), Some(Money::from_i64(5)));
        assert_eq!(Money::from_i64(i64::MIN).unsigned_abs(), 1 << 63);
    }

    #[test]
    fn summary_net_is_exact_near_the_bounds() {
        let summary = MemberSummary {
            member: MemberId::from("a"),
            paid: Money::from_i64(i64::MAX),
            share: Money::from_i64(1),
            settled_out: Money::from_i64(i64::MAX),
            settled_in: Money::from_i64(i64::MAX),
        };
        assert_eq!(summary.checked_net(), Some(Money::from_i64(i64::MAX - 1)));

        let overflowing = MemberSummary {
            settled_in: Money::ZERO,
            ..summary
        };
        assert_eq!(overflowing.checked_net(), None);
        assert_eq!(overflowing.net(), Money::from_i64(i64::MAX));
    }
}
