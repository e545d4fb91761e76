#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod command;

use bootstrap::{AppConfig, ConfigError, OutputFormat};
use command::{Command, Invocation};
use serde::Serialize;
use sharefare_application::{GroupId, LedgerService, LedgerServiceError};
use sharefare_domain::MemberId;
use sharefare_infrastructure::{InMemoryGroupStore, LedgerFile, LedgerFileError};
use sharefare_presentation::{
    ErrorView, SettlementPresenter, SummaryPresenter, error_view, format_service_error,
};
use std::{collections::HashMap, env, process};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    LedgerFile(#[from] LedgerFileError),
    #[error("{}", format_service_error(.0))]
    Service(#[from] LedgerServiceError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() {
    bootstrap::init_logging();
    if let Err(err) = run() {
        tracing::debug!(error = ?err, "Command failed");
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let config = AppConfig::from_env()?;
    let invocation = command::parse_args(env::args().skip(1)).map_err(CliError::Usage)?;

    let file = LedgerFile::load(&invocation.ledger_path)?;
    let store = InMemoryGroupStore::new();
    let group_id = store.import_ledger_file(&file, config.scale)?;
    let directory: HashMap<MemberId, String> = file
        .names
        .iter()
        .map(|(member, name)| (MemberId::from(member.as_str()), name.clone()))
        .collect();

    let output = match render(&store, group_id, &invocation, config, &directory) {
        Ok(output) => output,
        Err(err) => {
            if let Some(view) = failure_body(&err, config.output) {
                print!("{}", to_json(&view)?);
            }
            return Err(err);
        }
    };
    print!("{output}");
    Ok(())
}

/// JSON mode also reports ledger failures on stdout, as a status-carrying body.
fn failure_body(err: &CliError, output: OutputFormat) -> Option<ErrorView> {
    match (err, output) {
        (CliError::Service(err), OutputFormat::Json) => Some(error_view(err)),
        _ => None,
    }
}

fn render(
    store: &InMemoryGroupStore,
    group_id: GroupId,
    invocation: &Invocation,
    config: AppConfig,
    directory: &HashMap<MemberId, String>,
) -> CliResult<String> {
    let service = LedgerService::new(store);
    let settlement_presenter = SettlementPresenter::new(config.scale);
    let summary_presenter = SummaryPresenter::new(config.scale);

    let output = match (&invocation.command, config.output) {
        (Command::Balances, OutputFormat::Table) => {
            let balances = service.balances(group_id)?;
            settlement_presenter.build_balance_table(&balances, directory)
        }
        (Command::Balances, OutputFormat::Json) => {
            let balances = service.balances(group_id)?;
            to_json(&SettlementPresenter::balances_json(&balances))?
        }
        (Command::Settlement, OutputFormat::Table) => {
            let result = service.settlement(group_id)?;
            let view = settlement_presenter.render_with_members(&result, directory);
            match view.transfer_table {
                Some(transfers) => format!("{}\n{transfers}", view.balance_table),
                None => view.balance_table,
            }
        }
        (Command::Settlement, OutputFormat::Json) => {
            let result = service.settlement(group_id)?;
            to_json(&SettlementPresenter::settlement_json(&result))?
        }
        (Command::Summary, OutputFormat::Table) => {
            let summaries = service.member_summaries(group_id)?;
            summary_presenter.summary_table(&summaries, directory)
        }
        (Command::Summary, OutputFormat::Json) => {
            let summaries = service.member_summaries(group_id)?;
            to_json(&SummaryPresenter::summaries_json(&summaries))?
        }
        (Command::Obligations(member), OutputFormat::Table) => {
            let obligations = service.obligations_for(group_id, member)?;
            summary_presenter.obligation_table(&obligations, directory)
        }
        (Command::Obligations(member), OutputFormat::Json) => {
            let obligations = service.obligations_for(group_id, member)?;
            to_json(&SummaryPresenter::obligations_json(&obligations))?
        }
        (Command::Expenses(filter), OutputFormat::Table) => {
            let lines = service.expenses_for(group_id, filter)?;
            summary_presenter.expense_table(&lines, directory)
        }
        (Command::Expenses(filter), OutputFormat::Json) => {
            let lines = service.expenses_for(group_id, filter)?;
            to_json(&SummaryPresenter::expenses_json(&lines))?
        }
    };
    Ok(output)
}

fn to_json<T: Serialize>(view: &T) -> CliResult<String> {
    let mut json = serde_json::to_string_pretty(view)?;
    json.push('\n');
    Ok(json)
}
