use crate::{
    labels,
    settlement_presenter::{format_amount, format_member_label, format_signed},
    text_table::{Alignment, TextTableBuilder},
};
use serde::Serialize;
use sharefare_application::{ExpenseLine, MemberDirectory};
use sharefare_domain::{CurrencyScale, Direction, MemberObligations, MemberSummary, Obligation};
use std::{borrow::Cow, fmt::Write};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberSummaryView {
    pub member: String,
    pub paid: i64,
    pub share: i64,
    pub settled_out: i64,
    pub settled_in: i64,
    pub net: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionView {
    Pay,
    Receive,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObligationView {
    pub counterparty: String,
    pub direction: DirectionView,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpenseLineView {
    pub id: u64,
    pub description: String,
    pub category: &'static str,
    pub payer: String,
    pub amount: i64,
    pub participants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_share: Option<i64>,
}

/// Renders the per-member views: dashboard totals, settle-up obligations and
/// expense listings.
#[derive(Clone, Copy, Debug, Default)]
pub struct SummaryPresenter {
    scale: CurrencyScale,
}

impl SummaryPresenter {
    pub fn new(scale: CurrencyScale) -> Self {
        Self { scale }
    }

    pub fn summary_table(
        &self,
        summaries: &[MemberSummary],
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(labels::MEMBER),
                Cow::Borrowed(labels::PAID),
                Cow::Borrowed(labels::SHARE),
                Cow::Borrowed(labels::SETTLED_OUT),
                Cow::Borrowed(labels::SETTLED_IN),
                Cow::Borrowed(labels::NET),
            ]);

        for summary in summaries {
            builder = builder.row([
                format_member_label(&summary.member, member_directory),
                Cow::Owned(format_amount(summary.paid, self.scale)),
                Cow::Owned(format_amount(summary.share, self.scale)),
                Cow::Owned(format_amount(summary.settled_out, self.scale)),
                Cow::Owned(format_amount(summary.settled_in, self.scale)),
                Cow::Owned(format_signed(summary.net(), self.scale)),
            ]);
        }

        builder.build()
    }

    /// Settle-up lines for one member, followed by their net position.
    pub fn obligation_table(
        &self,
        obligations: &[Obligation],
        member_directory: &dyn MemberDirectory,
    ) -> String {
        if obligations.is_empty() {
            return format!("{}\n", labels::ALL_SETTLED);
        }

        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(labels::ACTION),
                Cow::Borrowed(labels::MEMBER),
                Cow::Borrowed(labels::AMOUNT),
            ]);

        for obligation in obligations {
            let action = match obligation.direction {
                Direction::Pay => labels::PAY,
                Direction::Receive => labels::RECEIVE_FROM,
            };
            builder = builder.row([
                Cow::Borrowed(action),
                format_member_label(&obligation.counterparty, member_directory),
                Cow::Owned(format_amount(obligation.amount, self.scale)),
            ]);
        }

        let mut table = builder.build();
        let net = MemberObligations::net(obligations);
        let _ = writeln!(table, "{}: {}", labels::NET, format_signed(net, self.scale));
        table
    }

    pub fn expense_table(
        &self,
        lines: &[ExpenseLine],
        member_directory: &dyn MemberDirectory,
    ) -> String {
        if lines.is_empty() {
            return format!("{}\n", labels::NO_EXPENSES);
        }
        let with_share = lines.iter().any(|line| line.member_share.is_some());

        let mut headers = vec![
            Cow::Borrowed(labels::DESCRIPTION),
            Cow::Borrowed(labels::CATEGORY),
            Cow::Borrowed(labels::PAYER),
            Cow::Borrowed(labels::AMOUNT),
        ];
        let mut alignments = vec![
            Alignment::Left,
            Alignment::Left,
            Alignment::Left,
            Alignment::Right,
        ];
        if with_share {
            headers.push(Cow::Borrowed(labels::YOUR_SHARE));
            alignments.push(Alignment::Right);
        }

        let rows = lines.iter().map(|line| {
            let mut row = vec![
                Cow::Owned(line.record.description.clone()),
                Cow::Borrowed(line.record.category.as_str()),
                format_member_label(&line.record.expense.payer, member_directory),
                Cow::Owned(format_amount(line.record.expense.amount, self.scale)),
            ];
            if let Some(share) = line.member_share {
                row.push(Cow::Owned(format_amount(share, self.scale)));
            }
            row
        });

        TextTableBuilder::new()
            .alignments(&alignments)
            .headers(&headers)
            .rows(rows)
            .build()
    }

    pub fn summaries_json(summaries: &[MemberSummary]) -> Vec<MemberSummaryView> {
        summaries
            .iter()
            .map(|summary| MemberSummaryView {
                member: summary.member.to_string(),
                paid: summary.paid.amount(),
                share: summary.share.amount(),
                settled_out: summary.settled_out.amount(),
                settled_in: summary.settled_in.amount(),
                net: summary.net().amount(),
            })
            .collect()
    }

    pub fn obligations_json(obligations: &[Obligation]) -> Vec<ObligationView> {
        obligations
            .iter()
            .map(|obligation| ObligationView {
                counterparty: obligation.counterparty.to_string(),
                direction: match obligation.direction {
                    Direction::Pay => DirectionView::Pay,
                    Direction::Receive => DirectionView::Receive,
                },
                amount: obligation.amount.amount(),
            })
            .collect()
    }

    pub fn expenses_json(lines: &[ExpenseLine]) -> Vec<ExpenseLineView> {
        lines
            .iter()
            .map(|line| ExpenseLineView {
                id: line.record.id.0,
                description: line.record.description.clone(),
                category: line.record.category.as_str(),
                payer: line.record.expense.payer.to_string(),
                amount: line.record.expense.amount.amount(),
                participants: line
                    .record
                    .expense
                    .participants
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                member_share: line.member_share.map(|share| share.amount()),
            })
            .collect()
    }
}
