use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::tree::{CommandNode, ContractError, FlagSpec};
use crate::validate::Invocation;

use super::{Operation, Outcome};

pub(super) fn command() -> Result<CommandNode, ContractError> {
    let show = CommandNode::builder("show")
        .about("Retrieve account information")
        .operation(Operation::AccountShow)
        .build()?;

    let usage = CommandNode::builder("usage")
        .about("Retrieve account usage information")
        .flag(
            FlagSpec::string("period")
                .short('p')
                .default_str("latest")
                .help("filter for period, format: YYYY-MM or latest"),
        )
        .operation(Operation::AccountUsage)
        .build()?;

    let history = CommandNode::builder("history")
        .about("Retrieve account history information")
        .flag(
            FlagSpec::integer("page")
                .short('p')
                .default_int(1)
                .help("page number of history results to show"),
        )
        .flag(
            FlagSpec::integer("items")
                .short('i')
                .default_int(25)
                .help("how many history results to show"),
        )
        .operation(Operation::AccountHistory)
        .build()?;

    CommandNode::builder("account")
        .about("Retrieve account information")
        .long_about("Use the subcommands to display information about your account.")
        .child(show)
        .child(usage)
        .child(history)
        .default_child("show")
        .build()
}

pub(super) async fn handle_show(ctx: &AppContext) -> CliResult<Outcome> {
    let account = ctx
        .service
        .show_account()
        .await
        .map_err(CliError::remote("getting account information"))?;
    Outcome::structured(&account)
}

pub(super) async fn handle_usage(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let usage = ctx
        .service
        .account_usage(invocation.string("period"))
        .await
        .map_err(CliError::remote("getting account usage information"))?;
    Outcome::structured(&usage)
}

pub(super) async fn handle_history(
    ctx: &AppContext,
    invocation: &Invocation,
) -> CliResult<Outcome> {
    let history = ctx
        .service
        .account_history(invocation.integer("page"), invocation.integer("items"))
        .await
        .map_err(CliError::remote("getting account history information"))?;
    Outcome::structured(&history)
}
