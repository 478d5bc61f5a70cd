use blcli_api::models::NewSshKey;

use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::tree::{CommandNode, ContractError, FlagSpec, PositionalContract};
use crate::validate::Invocation;

use super::{Operation, Outcome};

pub(super) fn command() -> Result<CommandNode, ContractError> {
    let list = CommandNode::builder("list")
        .about("List ssh keys on your account")
        .aliases(&["l"])
        .operation(Operation::SshKeyList)
        .build()?;

    let delete = CommandNode::builder("delete")
        .about("Permanently delete an ssh key")
        .aliases(&["d", "del", "rm"])
        .positionals(PositionalContract::exactly(1, "<key-id>"))
        .operation(Operation::SshKeyDelete)
        .build()?;

    let create = CommandNode::builder("create")
        .about("Create a new ssh key")
        .aliases(&["c"])
        .flag(
            FlagSpec::string("name")
                .short('n')
                .required()
                .help("name for the new key"),
        )
        .flag(
            FlagSpec::string("content")
                .short('c')
                .required()
                .help("ssh key content"),
        )
        .operation(Operation::SshKeyCreate)
        .build()?;

    CommandNode::builder("sshkey")
        .about("Manage SSH Keys")
        .long_about("Use the subcommands to list, create, or delete ssh keys.")
        .aliases(&["k"])
        .child(list)
        .child(delete)
        .child(create)
        .build()
}

pub(super) async fn handle_list(ctx: &AppContext) -> CliResult<Outcome> {
    let keys = ctx
        .service
        .list_ssh_keys()
        .await
        .map_err(CliError::remote("listing ssh keys"))?;
    Outcome::structured(&keys)
}

pub(super) async fn handle_delete(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    ctx.service
        .delete_ssh_key(invocation.positional(0))
        .await
        .map_err(CliError::remote("deleting ssh key"))?;
    Ok(Outcome::Confirmation("Deleted ssh key"))
}

pub(super) async fn handle_create(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let key = NewSshKey {
        name: invocation.string("name").to_string(),
        content: invocation.string("content").to_string(),
    };
    let created = ctx
        .service
        .create_ssh_key(&key)
        .await
        .map_err(CliError::remote("creating ssh key"))?;
    Outcome::structured(&created)
}
