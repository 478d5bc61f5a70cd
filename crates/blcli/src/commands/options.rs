use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::tree::{CommandNode, ContractError, PositionalContract};
use crate::validate::{DomainRule, HostProvider, Invocation};

use super::{Operation, Outcome};

pub(super) fn command() -> Result<CommandNode, ContractError> {
    CommandNode::builder("createoptions")
        .about("List the images, regions and sizes available on a host")
        .long_about(
            "List the images, regions and sizes available when creating a server: \
             createoptions <bitlaunch|digitalocean|vultr|linode>",
        )
        .aliases(&["options"])
        .positionals(PositionalContract::exactly(1, "<host>"))
        .rule(DomainRule::HostArgument)
        .operation(Operation::CreateOptions)
        .build()
}

pub(super) async fn handle_show(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let host = HostProvider::parse(invocation.positional(0))?;
    let options = ctx
        .service
        .create_options(host.id())
        .await
        .map_err(CliError::remote("getting create options"))?;
    Outcome::structured(&options)
}
