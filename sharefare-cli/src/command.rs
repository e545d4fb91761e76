use sharefare_application::ExpenseFilter;
use sharefare_domain::MemberId;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: sharefare <ledger.json> \
[balances | settlement | summary | obligations <member> | expenses [paid-by <member> | shared-by <member>]]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Balances,
    Settlement,
    Summary,
    Obligations(MemberId),
    Expenses(ExpenseFilter),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub ledger_path: PathBuf,
    pub command: Command,
}

/// Parses the arguments after the program name. Without a command the
/// settlement is shown.
pub fn parse_args<I>(args: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(ledger_path) = args.next() else {
        return Err(USAGE.to_string());
    };
    let rest: Vec<String> = args.collect();
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let command = match rest.as_slice() {
        [] | ["settlement"] => Command::Settlement,
        ["balances"] => Command::Balances,
        ["summary"] => Command::Summary,
        ["obligations", member] => Command::Obligations(MemberId::from(*member)),
        ["expenses"] => Command::Expenses(ExpenseFilter::All),
        ["expenses", "paid-by", member] => {
            Command::Expenses(ExpenseFilter::PaidBy(MemberId::from(*member)))
        }
        ["expenses", "shared-by", member] => {
            Command::Expenses(ExpenseFilter::SharedBy(MemberId::from(*member)))
        }
        _ => return Err(format!("Unrecognized command `{}`\n{USAGE}", rest.join(" "))),
    };

    Ok(Invocation {
        ledger_path: PathBuf::from(ledger_path),
        command,
    })
}
