//! Global option parsing, startup, and command dispatch.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use blcli_telemetry::init_logging;
use clap::Parser;
use clap::error::ErrorKind;

use crate::commands::{build_tree, execute, local_answer};
use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::settings::{Settings, load_file_config, logging_config};
use crate::tree::CommandTree;
use crate::validate::{requests_help, validate};

/// Global options. Everything after the first command segment is handed to
/// the command tree untouched.
#[derive(Debug, Parser)]
#[command(
    name = "blcli",
    version,
    about = "blcli is a command-line interface for BitLaunch.io",
    override_usage = "blcli [OPTIONS] <COMMAND>... [ARGS]",
    after_help = "Commands: account, server, sshkey, transaction, createoptions.\n\
                  Run `blcli <command> --help` for details."
)]
pub(crate) struct Cli {
    /// Config file (default is $HOME/.blcli.yaml)
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// API authentication token
    #[arg(long, env = "BL_API_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,
    /// API base URL
    #[arg(long, env = "BL_API_URL", value_name = "URL")]
    pub(crate) api_url: Option<String>,
    /// HTTP request timeout in seconds
    #[arg(long, env = "BL_HTTP_TIMEOUT_SECS", value_name = "SECS")]
    pub(crate) timeout: Option<u64>,
    /// Output format (json)
    #[arg(long, value_name = "FORMAT")]
    pub(crate) output: Option<String>,
    /// Log level or filter directive, written to stderr
    #[arg(long, value_name = "LEVEL")]
    pub(crate) log_level: Option<String>,
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) command: Vec<String>,
}

/// Parses the process arguments, runs the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    run_from(std::env::args_os()).await
}

pub(crate) async fn run_from<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(&err),
    };

    let tree = match build_tree() {
        Ok(tree) => tree,
        Err(err) => return CliError::startup(err.to_string()).report(),
    };

    if let Some(usage) = help_request(&tree, &cli.command) {
        return emit(&mut io::stdout().lock(), &usage);
    }

    let result = match local_request(&tree, &cli.command) {
        Some(result) => result,
        None => run_command(&tree, &cli).await,
    };
    match result {
        Ok(text) => emit(&mut io::stdout().lock(), &text),
        Err(err) => err.report(),
    }
}

/// Write `text` and a newline. A closed pipe on the reader's side is not an
/// error.
fn emit(out: &mut impl Write, text: &str) -> i32 {
    match writeln!(out, "{text}").and_then(|()| out.flush()) {
        Ok(()) => 0,
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => 0,
        Err(err) => CliError::render(format!("failed to write output: {err}")).report(),
    }
}

/// Commands answered before settings are resolved, such as `version`.
fn local_request(tree: &CommandTree, command: &[String]) -> Option<CliResult<String>> {
    let resolved = tree.resolve(command).ok()?;
    let answer = local_answer(resolved.operation)?;
    Some(
        validate(resolved.node, &resolved.command_path(), &resolved.args)
            .map(|_| answer.to_string()),
    )
}

async fn run_command(tree: &CommandTree, cli: &Cli) -> CliResult<String> {
    let file = load_file_config(cli.config.as_deref())?;
    init_logging(&logging_config(cli, &file))
        .map_err(|err| CliError::startup(format!("{err:#}")))?;
    tracing::debug!(explicit_config = cli.config.is_some(), "configuration loaded");

    let settings = Settings::resolve(cli, &file)?;
    let ctx = AppContext::connect(&settings)?;
    dispatch(tree, &ctx, &cli.command).await
}

/// Resolve, validate, execute, and render one command.
///
/// The returned text is complete; nothing is written on failure.
pub(crate) async fn dispatch(
    tree: &CommandTree,
    ctx: &AppContext,
    segments: &[String],
) -> CliResult<String> {
    let resolved = tree
        .resolve(segments)
        .map_err(|err| CliError::validation(err.to_string()))?;
    let command = resolved.command_path();
    tracing::debug!(%command, "resolved command");

    let invocation = validate(resolved.node, &command, &resolved.args)?;
    let outcome = execute(ctx, resolved.operation, &invocation).await?;
    outcome.present(ctx)
}

/// Usage text when the user asked for help or gave no command at all.
fn help_request(tree: &CommandTree, command: &[String]) -> Option<String> {
    if command.is_empty() {
        return Some(tree.root().usage(&tree.display_path(&[])));
    }
    let (path, target) = tree.help_target(command);
    let flags_of = tree
        .resolve(command)
        .map_or(target, |resolved| resolved.node);
    requests_help(flags_of, command).then(|| target.usage(&path))
}

fn report_parse_error(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            0
        }
        _ => {
            let rendered = err.to_string();
            let line = rendered.lines().next().unwrap_or_default();
            let line = line.strip_prefix("error: ").unwrap_or(line);
            CliError::validation(line).report()
        }
    }
}
