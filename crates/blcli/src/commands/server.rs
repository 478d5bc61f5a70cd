use blcli_api::models::{CreateServerOptions, RebuildOptions};

use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::tree::{CommandNode, ContractError, FlagSpec, PositionalContract};
use crate::validate::{DomainRule, HostProvider, Invocation, parse_ports, parse_protection_state};

use super::{Operation, Outcome};

const SERVER_ID: PositionalContract = PositionalContract::exactly(1, "<server-id>");

pub(super) fn command() -> Result<CommandNode, ContractError> {
    let get = CommandNode::builder("get")
        .about("Get information for a single server")
        .aliases(&["g", "show"])
        .positionals(SERVER_ID)
        .operation(Operation::ServerGet)
        .build()?;

    let list = CommandNode::builder("list")
        .about("List servers on your account")
        .aliases(&["l"])
        .operation(Operation::ServerList)
        .build()?;

    let destroy = CommandNode::builder("destroy")
        .about("Permanently delete a server")
        .aliases(&["delete", "d", "del", "rm"])
        .positionals(SERVER_ID)
        .operation(Operation::ServerDestroy)
        .build()?;

    let create = CommandNode::builder("create")
        .about("Create a new server")
        .aliases(&["c"])
        .flag(
            FlagSpec::string("name")
                .short('n')
                .required()
                .help("name for the new server"),
        )
        .flag(
            FlagSpec::string("host")
                .short('t')
                .required()
                .help("target provider/host name: bitlaunch, digitalocean, vultr or linode"),
        )
        .flag(
            FlagSpec::string("image")
                .short('i')
                .required()
                .help("image/app id"),
        )
        .flag(FlagSpec::string("size").short('s').required().help("plan/size id"))
        .flag(FlagSpec::string("region").short('r').required().help("region id"))
        .flag(
            FlagSpec::string_list("sshkey")
                .short('k')
                .help("ssh key ids, comma separated for more than one"),
        )
        .flag(FlagSpec::string("password").short('p').help("password"))
        .flag(FlagSpec::string("initscript").help("cloud-init script to run on first boot"))
        .rule(DomainRule::PasswordOrSshKey)
        .rule(DomainRule::HostFlag)
        .operation(Operation::ServerCreate)
        .build()?;

    let rebuild = CommandNode::builder("rebuild")
        .about("Rebuild a server")
        .positionals(SERVER_ID)
        .flag(
            FlagSpec::string("image")
                .short('i')
                .required()
                .help("image/app id"),
        )
        .flag(
            FlagSpec::string("description")
                .short('d')
                .required()
                .help("image/app description"),
        )
        .operation(Operation::ServerRebuild)
        .build()?;

    let resize = CommandNode::builder("resize")
        .about("Resize a server")
        .positionals(SERVER_ID)
        .flag(FlagSpec::string("size").short('s').required().help("plan/size id"))
        .operation(Operation::ServerResize)
        .build()?;

    let restart = CommandNode::builder("restart")
        .about("Restart a server")
        .aliases(&["reboot"])
        .positionals(SERVER_ID)
        .operation(Operation::ServerRestart)
        .build()?;

    let protection = CommandNode::builder("protection")
        .about("Protect a server")
        .long_about("Enable or disable DDoS protection: protection <server-id> [enable true e] or [disable false d]")
        .aliases(&["protect"])
        .positionals(PositionalContract::exactly(2, "<server-id> <enable|disable>"))
        .rule(DomainRule::ProtectionState)
        .operation(Operation::ServerProtection)
        .build()?;

    let set_ports = CommandNode::builder("setports")
        .about("Set ports for a protected server")
        .aliases(&["ports"])
        .positionals(SERVER_ID)
        .flag(
            FlagSpec::string("ports")
                .short('p')
                .required()
                .help("port:protocol, comma separated for more than one"),
        )
        .rule(DomainRule::PortList)
        .operation(Operation::ServerSetPorts)
        .build()?;

    CommandNode::builder("server")
        .about("Manage your virtual machines")
        .long_about("Use the subcommands to get, list, create, or destroy servers.")
        .aliases(&["s"])
        .child(get)
        .child(list)
        .child(destroy)
        .child(create)
        .child(rebuild)
        .child(resize)
        .child(restart)
        .child(protection)
        .child(set_ports)
        .build()
}

pub(super) async fn handle_get(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let server = ctx
        .service
        .show_server(invocation.positional(0))
        .await
        .map_err(CliError::remote("getting server"))?;
    Outcome::structured(&server)
}

pub(super) async fn handle_list(ctx: &AppContext) -> CliResult<Outcome> {
    let servers = ctx
        .service
        .list_servers()
        .await
        .map_err(CliError::remote("listing servers"))?;
    Outcome::structured(&servers)
}

pub(super) async fn handle_destroy(
    ctx: &AppContext,
    invocation: &Invocation,
) -> CliResult<Outcome> {
    ctx.service
        .destroy_server(invocation.positional(0))
        .await
        .map_err(CliError::remote("destroying server"))?;
    Ok(Outcome::Confirmation("Deleted server"))
}

pub(super) async fn handle_create(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let options = CreateServerOptions {
        name: invocation.string("name").to_string(),
        host_id: HostProvider::parse(invocation.string("host"))?.id(),
        host_image_id: invocation.string("image").to_string(),
        size_id: invocation.string("size").to_string(),
        region_id: invocation.string("region").to_string(),
        ssh_keys: invocation.list("sshkey").to_vec(),
        password: invocation.string("password").to_string(),
        init_script: invocation.string("initscript").to_string(),
    };
    tracing::info!(name = %options.name, host_id = options.host_id, "creating server");
    let server = ctx
        .service
        .create_server(&options)
        .await
        .map_err(CliError::remote("creating server"))?;
    Outcome::structured(&server)
}

pub(super) async fn handle_rebuild(
    ctx: &AppContext,
    invocation: &Invocation,
) -> CliResult<Outcome> {
    let options = RebuildOptions {
        image_id: invocation.string("image").to_string(),
        description: invocation.string("description").to_string(),
    };
    ctx.service
        .rebuild_server(invocation.positional(0), &options)
        .await
        .map_err(CliError::remote("rebuilding server"))?;
    Ok(Outcome::Confirmation("Rebuilding server"))
}

pub(super) async fn handle_resize(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    ctx.service
        .resize_server(invocation.positional(0), invocation.string("size"))
        .await
        .map_err(CliError::remote("resizing server"))?;
    Ok(Outcome::Confirmation("Resizing server"))
}

pub(super) async fn handle_restart(
    ctx: &AppContext,
    invocation: &Invocation,
) -> CliResult<Outcome> {
    ctx.service
        .restart_server(invocation.positional(0))
        .await
        .map_err(CliError::remote("restarting server"))?;
    Ok(Outcome::Confirmation("Restarted server"))
}

pub(super) async fn handle_protection(
    ctx: &AppContext,
    invocation: &Invocation,
) -> CliResult<Outcome> {
    let enabled = parse_protection_state(invocation.positional(1))?;
    let server = ctx
        .service
        .set_protection(invocation.positional(0), enabled)
        .await
        .map_err(CliError::remote("setting server protection"))?;
    Outcome::structured(&server)
}

pub(super) async fn handle_set_ports(
    ctx: &AppContext,
    invocation: &Invocation,
) -> CliResult<Outcome> {
    let ports = parse_ports(invocation.string("ports"))?;
    let server = ctx
        .service
        .set_ports(invocation.positional(0), &ports)
        .await
        .map_err(CliError::remote("setting server ports"))?;
    Outcome::structured(&server)
}
