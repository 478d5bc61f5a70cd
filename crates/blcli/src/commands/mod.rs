//! Command declarations and their handlers.

mod account;
mod options;
mod server;
mod sshkey;
mod transaction;
mod version;

use serde::Serialize;
use serde_json::Value;

use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::payment::PaymentUri;
use crate::tree::{CommandNode, CommandTree, ContractError};
use crate::validate::Invocation;

/// Handler bound to a leaf command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    AccountShow,
    AccountUsage,
    AccountHistory,
    ServerGet,
    ServerList,
    ServerDestroy,
    ServerCreate,
    ServerRebuild,
    ServerResize,
    ServerRestart,
    ServerProtection,
    ServerSetPorts,
    SshKeyList,
    SshKeyDelete,
    SshKeyCreate,
    TransactionCreate,
    TransactionGet,
    TransactionList,
    TransactionQr,
    CreateOptions,
    Version,
}

/// Result of a successful command, before it is turned into text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Structured(Value),
    Confirmation(&'static str),
    PaymentQr(PaymentUri),
}

impl Outcome {
    pub(crate) fn structured<T: Serialize>(value: &T) -> CliResult<Self> {
        serde_json::to_value(value)
            .map(Self::Structured)
            .map_err(|err| CliError::render(format!("failed to encode result: {err}")))
    }

    /// Produce the full stdout text. Nothing is printed here.
    pub(crate) fn present(&self, ctx: &AppContext) -> CliResult<String> {
        match self {
            Self::Structured(value) => ctx.output.render(value),
            Self::Confirmation(line) => Ok((*line).to_string()),
            Self::PaymentQr(uri) => ctx.qr.render(uri.as_str()),
        }
    }
}

/// The complete command hierarchy.
pub(crate) fn build_tree() -> Result<CommandTree, ContractError> {
    let root = CommandNode::builder("blcli")
        .about("blcli is a command-line interface for BitLaunch.io")
        .child(account::command()?)
        .child(server::command()?)
        .child(sshkey::command()?)
        .child(transaction::command()?)
        .child(options::command()?)
        .child(version::command()?)
        .build()?;
    Ok(CommandTree::new(root))
}

/// Text for operations answered without settings or a remote call.
pub(crate) const fn local_answer(operation: Operation) -> Option<&'static str> {
    match operation {
        Operation::Version => Some(version::VERSION_LINE),
        _ => None,
    }
}

/// Run the handler for `operation`. Remote operations make exactly one call.
pub(crate) async fn execute(
    ctx: &AppContext,
    operation: Operation,
    invocation: &Invocation,
) -> CliResult<Outcome> {
    let supplied: Vec<&str> = invocation.supplied().collect();
    tracing::debug!(command = invocation.command(), ?operation, ?supplied, "executing");
    match operation {
        Operation::AccountShow => account::handle_show(ctx).await,
        Operation::AccountUsage => account::handle_usage(ctx, invocation).await,
        Operation::AccountHistory => account::handle_history(ctx, invocation).await,
        Operation::ServerGet => server::handle_get(ctx, invocation).await,
        Operation::ServerList => server::handle_list(ctx).await,
        Operation::ServerDestroy => server::handle_destroy(ctx, invocation).await,
        Operation::ServerCreate => server::handle_create(ctx, invocation).await,
        Operation::ServerRebuild => server::handle_rebuild(ctx, invocation).await,
        Operation::ServerResize => server::handle_resize(ctx, invocation).await,
        Operation::ServerRestart => server::handle_restart(ctx, invocation).await,
        Operation::ServerProtection => server::handle_protection(ctx, invocation).await,
        Operation::ServerSetPorts => server::handle_set_ports(ctx, invocation).await,
        Operation::SshKeyList => sshkey::handle_list(ctx).await,
        Operation::SshKeyDelete => sshkey::handle_delete(ctx, invocation).await,
        Operation::SshKeyCreate => sshkey::handle_create(ctx, invocation).await,
        Operation::TransactionCreate => transaction::handle_create(ctx, invocation).await,
        Operation::TransactionGet => transaction::handle_get(ctx, invocation).await,
        Operation::TransactionList => transaction::handle_list(ctx, invocation).await,
        Operation::TransactionQr => transaction::handle_qr(ctx, invocation).await,
        Operation::CreateOptions => options::handle_show(ctx, invocation).await,
        Operation::Version => Ok(Outcome::Confirmation(version::VERSION_LINE)),
    }
}
