//! Argument validation: flag parsing, defaults, arity, and domain rules.
//!
//! Validation is fail-fast and never touches the network. The domain rules are
//! plain functions so command handlers reuse them to obtain typed values.

use std::collections::{BTreeMap, BTreeSet};

use blcli_api::models::Port;

use crate::error::{CliError, CliResult};
use crate::tree::{CommandNode, FlagKind, FlagSpec, FlagValue};

/// A validated, ready-to-execute request.
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    command: String,
    flags: BTreeMap<&'static str, FlagValue>,
    supplied: BTreeSet<&'static str>,
    positionals: Vec<String>,
}

impl Invocation {
    pub(crate) fn command(&self) -> &str {
        &self.command
    }

    pub(crate) fn string(&self, name: &str) -> &str {
        match self.flags.get(name) {
            Some(FlagValue::String(value)) => value,
            _ => "",
        }
    }

    pub(crate) fn integer(&self, name: &str) -> i64 {
        match self.flags.get(name) {
            Some(FlagValue::Integer(value)) => *value,
            _ => 0,
        }
    }

    pub(crate) fn boolean(&self, name: &str) -> bool {
        matches!(self.flags.get(name), Some(FlagValue::Boolean(true)))
    }

    pub(crate) fn list(&self, name: &str) -> &[String] {
        match self.flags.get(name) {
            Some(FlagValue::StringList(values)) => values,
            _ => &[],
        }
    }

    /// Flags given on the command line rather than defaulted.
    pub(crate) fn supplied(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.supplied.iter().copied()
    }

    pub(crate) fn positional(&self, index: usize) -> &str {
        self.positionals.get(index).map_or("", String::as_str)
    }
}

/// Cross-field rules a command declares on top of its contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DomainRule {
    /// `--password` or `--sshkey` must be non-empty.
    PasswordOrSshKey,
    /// `--host` must name a known provider.
    HostFlag,
    /// The first positional must name a known provider.
    HostArgument,
    /// The second positional must be a protection state.
    ProtectionState,
    /// `--ports` must be a list of `port:protocol` pairs.
    PortList,
    /// The first positional must be an integer USD amount.
    UsdAmount,
    /// `--lightning` requires BTC or LTC as the second positional.
    LightningSymbol,
}

impl DomainRule {
    fn check(self, invocation: &Invocation) -> CliResult<()> {
        match self {
            Self::PasswordOrSshKey => {
                check_credentials(invocation.string("password"), invocation.list("sshkey"))
            }
            Self::HostFlag => HostProvider::parse(invocation.string("host")).map(drop),
            Self::HostArgument => HostProvider::parse(invocation.positional(0)).map(drop),
            Self::ProtectionState => parse_protection_state(invocation.positional(1)).map(drop),
            Self::PortList => parse_ports(invocation.string("ports")).map(drop),
            Self::UsdAmount => parse_usd_amount(invocation.positional(0)).map(drop),
            Self::LightningSymbol => {
                check_lightning(invocation.boolean("lightning"), invocation.positional(1))
            }
        }
    }
}

/// Check raw arguments against `node`'s contracts and rules.
///
/// `command` is the canonical path used in messages (e.g. `server create`).
pub(crate) fn validate(node: &CommandNode, command: &str, raw: &[String]) -> CliResult<Invocation> {
    let contract = node.flags();
    let mut supplied: BTreeMap<&'static str, FlagValue> = BTreeMap::new();
    let mut positionals = Vec::new();
    let mut tokens = raw.iter();
    let mut flags_done = false;

    while let Some(token) = tokens.next() {
        if flags_done || !is_flag_token(token) {
            positionals.push(token.clone());
            continue;
        }
        if token == "--" {
            flags_done = true;
            continue;
        }

        let (spec, inline) = lookup_flag(node, token)?;
        let value = match (spec.kind(), inline) {
            (FlagKind::Boolean, None) => FlagValue::Boolean(true),
            (_, Some(text)) => parse_value(spec, text)?,
            (_, None) => {
                let text = tokens.next().ok_or_else(|| {
                    CliError::validation(format!("flag needs an argument: --{}", spec.name()))
                })?;
                parse_value(spec, text)?
            }
        };

        match value {
            FlagValue::StringList(more) => {
                if let Some(FlagValue::StringList(existing)) = supplied.get_mut(spec.name()) {
                    existing.extend(more);
                } else {
                    supplied.insert(spec.name(), FlagValue::StringList(more));
                }
            }
            value => {
                supplied.insert(spec.name(), value);
            }
        }
    }

    let mut flags = BTreeMap::new();
    for spec in contract.iter() {
        let value = supplied
            .get(spec.name())
            .cloned()
            .unwrap_or_else(|| spec.default_value());
        flags.insert(spec.name(), value);
    }

    if let Some(missing) = contract
        .iter()
        .find(|spec| spec.is_required() && !supplied.contains_key(spec.name()))
    {
        return Err(CliError::validation(format!(
            "required flag \"--{}\" not set",
            missing.name()
        )));
    }

    let arity = node.positionals();
    if !arity.accepts(positionals.len()) {
        let expected = if arity.min() == arity.max() {
            arity.min().to_string()
        } else {
            format!("{} to {}", arity.min(), arity.max())
        };
        let hint = if arity.hint().is_empty() {
            String::new()
        } else {
            format!(" {}", arity.hint())
        };
        return Err(CliError::validation(format!(
            "\"{command}\" accepts {expected} argument(s), received {} (usage: {command}{hint})",
            positionals.len()
        )));
    }

    let invocation = Invocation {
        command: command.to_string(),
        flags,
        supplied: supplied.into_keys().collect(),
        positionals,
    };

    for rule in node.rules() {
        rule.check(&invocation)?;
    }
    Ok(invocation)
}

/// Whether `-h` or `--help` sits in a flag position of `raw`.
///
/// A value-taking flag without an inline value consumes the next token, so
/// `--name -h` names something `-h` rather than asking for help.
pub(crate) fn requests_help(node: &CommandNode, raw: &[String]) -> bool {
    let mut tokens = raw.iter();
    while let Some(token) = tokens.next() {
        match token.as_str() {
            "--" => return false,
            "--help" | "-h" => return true,
            _ => {}
        }
        if !is_flag_token(token) {
            continue;
        }
        if let Ok((spec, None)) = lookup_flag(node, token)
            && spec.kind() != FlagKind::Boolean
        {
            tokens.next();
        }
    }
    false
}

fn is_flag_token(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|next| !next.is_ascii_digit())
}

fn lookup_flag<'n, 't>(
    node: &'n CommandNode,
    token: &'t str,
) -> CliResult<(&'n FlagSpec, Option<&'t str>)> {
    let contract = node.flags();
    let unknown = || CliError::validation(format!("unknown flag: {token}"));

    if let Some(long) = token.strip_prefix("--") {
        let (name, inline) = match long.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (long, None),
        };
        return contract
            .by_name(name)
            .map(|spec| (spec, inline))
            .ok_or_else(unknown);
    }

    let body = token.strip_prefix('-').unwrap_or(token);
    let mut chars = body.chars();
    let short = chars.next().ok_or_else(unknown)?;
    let remainder = chars.as_str();
    let spec = contract.by_short(short).ok_or_else(unknown)?;
    let inline = if remainder.is_empty() {
        None
    } else {
        Some(remainder.strip_prefix('=').unwrap_or(remainder))
    };
    Ok((spec, inline))
}

fn parse_value(spec: &FlagSpec, text: &str) -> CliResult<FlagValue> {
    match spec.kind() {
        FlagKind::String => Ok(FlagValue::String(text.to_string())),
        FlagKind::Integer => text.trim().parse::<i64>().map(FlagValue::Integer).map_err(|_| {
            CliError::validation(format!(
                "invalid value \"{text}\" for flag --{}: expected an integer",
                spec.name()
            ))
        }),
        FlagKind::Boolean => match text.trim() {
            "true" | "1" => Ok(FlagValue::Boolean(true)),
            "false" | "0" => Ok(FlagValue::Boolean(false)),
            _ => Err(CliError::validation(format!(
                "invalid value \"{text}\" for flag --{}: expected true or false",
                spec.name()
            ))),
        },
        FlagKind::StringList => Ok(FlagValue::StringList(
            text.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )),
    }
}

/// Cloud provider a server can be created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostProvider {
    BitLaunch,
    DigitalOcean,
    Vultr,
    Linode,
}

impl HostProvider {
    pub(crate) fn parse(name: &str) -> CliResult<Self> {
        match name {
            "bitlaunch" | "bl" => Ok(Self::BitLaunch),
            "digitalocean" | "do" => Ok(Self::DigitalOcean),
            "vultr" | "v" => Ok(Self::Vultr),
            "linode" | "l" => Ok(Self::Linode),
            _ => Err(CliError::validation(format!(
                "invalid host \"{name}\" (expected bitlaunch, digitalocean, vultr or linode)"
            ))),
        }
    }

    /// Identifier the API uses for this provider.
    pub(crate) const fn id(self) -> i64 {
        match self {
            Self::DigitalOcean => 0,
            Self::Vultr => 1,
            Self::Linode => 2,
            Self::BitLaunch => 4,
        }
    }
}

pub(crate) fn check_credentials(password: &str, ssh_keys: &[String]) -> CliResult<()> {
    if password.is_empty() && ssh_keys.is_empty() {
        return Err(CliError::validation(
            "You must provide either --sshkey or --password",
        ));
    }
    Ok(())
}

/// `enable`/`true`/`e` enable protection, `disable`/`false`/`d` disable it.
pub(crate) fn parse_protection_state(value: &str) -> CliResult<bool> {
    match value {
        "enable" | "true" | "e" => Ok(true),
        "disable" | "false" | "d" => Ok(false),
        _ => Err(CliError::validation(format!(
            "invalid protection state \"{value}\" (expected enable, true, e, disable, false or d)"
        ))),
    }
}

/// Parse `port:protocol[,port:protocol...]`.
pub(crate) fn parse_ports(value: &str) -> CliResult<Vec<Port>> {
    value
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            let invalid = |reason: &str| {
                CliError::validation(format!("invalid port entry \"{entry}\": {reason}"))
            };
            let (port, protocol) = entry
                .split_once(':')
                .ok_or_else(|| invalid("expected port:protocol"))?;
            if protocol.is_empty() || protocol.contains(':') {
                return Err(invalid("expected port:protocol"));
            }
            let port_number = port
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid("port must be an integer"))?;
            Ok(Port {
                port_number,
                protocol: protocol.trim().to_string(),
            })
        })
        .collect()
}

pub(crate) fn parse_usd_amount(value: &str) -> CliResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| CliError::validation("Please specify USD as an integer"))
}

pub(crate) fn check_lightning(lightning: bool, symbol: &str) -> CliResult<()> {
    if lightning && symbol != "BTC" && symbol != "LTC" {
        return Err(CliError::validation(
            "Lightning network only available for BTC and LTC",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Operation;
    use crate::tree::PositionalContract;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn history_node() -> CommandNode {
        CommandNode::builder("history")
            .flag(FlagSpec::integer("page").short('p').default_int(1))
            .flag(FlagSpec::integer("items").short('i').default_int(25))
            .operation(Operation::AccountHistory)
            .build()
            .expect("history builds")
    }

    fn create_node() -> CommandNode {
        CommandNode::builder("create")
            .flag(FlagSpec::string("name").short('n').required())
            .flag(FlagSpec::string("host").short('t').required())
            .flag(FlagSpec::string_list("sshkey").short('k'))
            .flag(FlagSpec::string("password").short('p'))
            .rule(DomainRule::PasswordOrSshKey)
            .rule(DomainRule::HostFlag)
            .operation(Operation::ServerCreate)
            .build()
            .expect("create builds")
    }

    #[test]
    fn defaults_apply_and_are_not_marked_supplied() {
        let invocation = validate(&history_node(), "account history", &args(&["-i", "5"]))
            .expect("valid");
        assert_eq!(invocation.integer("page"), 1);
        assert_eq!(invocation.integer("items"), 5);
        assert_eq!(invocation.supplied().collect::<Vec<_>>(), vec!["items"]);
    }

    #[test]
    fn help_only_counts_in_flag_position() {
        let node = create_node();
        assert!(requests_help(&node, &args(&["--help"])));
        assert!(requests_help(&node, &args(&["-n", "foo", "-h"])));
        assert!(requests_help(&node, &args(&["--name=-h", "-h"])));
        assert!(!requests_help(&node, &args(&["--name", "-h", "--host", "do"])));
        assert!(!requests_help(&node, &args(&["-n", "--help"])));
        assert!(!requests_help(&node, &args(&["--", "-h"])));
    }

    #[test]
    fn flag_syntaxes_are_equivalent() {
        for raw in [
            args(&["--items", "7"]),
            args(&["--items=7"]),
            args(&["-i", "7"]),
            args(&["-i=7"]),
            args(&["-i7"]),
        ] {
            let invocation = validate(&history_node(), "account history", &raw).expect("valid");
            assert_eq!(invocation.integer("items"), 7, "{raw:?}");
        }
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = validate(&history_node(), "account history", &args(&["--verbose"]))
            .expect_err("unknown");
        assert_eq!(err.to_string(), "Error: unknown flag: --verbose");
    }

    #[test]
    fn type_mismatch_names_the_flag() {
        let err = validate(&history_node(), "account history", &args(&["--page", "two"]))
            .expect_err("mismatch");
        assert!(matches!(&err, CliError::Validation(message) if message.contains("--page")));
    }

    #[test]
    fn missing_flag_value_is_rejected() {
        let err = validate(&history_node(), "account history", &args(&["--page"]))
            .expect_err("missing value");
        assert!(err.to_string().contains("flag needs an argument: --page"));
    }

    #[test]
    fn required_flag_must_be_supplied() {
        let err = validate(
            &create_node(),
            "server create",
            &args(&["--host", "do", "--password", "pw"]),
        )
        .expect_err("missing name");
        assert_eq!(err.to_string(), "Error: required flag \"--name\" not set");
    }

    #[test]
    fn arity_violation_reports_usage_hint() {
        let node = CommandNode::builder("get")
            .positionals(PositionalContract::exactly(1, "<server-id>"))
            .operation(Operation::ServerGet)
            .build()
            .expect("get builds");
        let err = validate(&node, "server get", &[]).expect_err("arity");
        assert!(matches!(&err, CliError::Validation(message)
            if message.contains("<server-id>") && message.contains("received 0")));

        let err = validate(&node, "server get", &args(&["a", "b"])).expect_err("too many");
        assert!(err.to_string().contains("received 2"));
    }

    #[test]
    fn positionals_after_double_dash_are_literal() {
        let node = CommandNode::builder("delete")
            .positionals(PositionalContract::exactly(1, "<key-id>"))
            .operation(Operation::SshKeyDelete)
            .build()
            .expect("delete builds");
        let invocation = validate(&node, "sshkey delete", &args(&["--", "--odd-id"]))
            .expect("valid");
        assert_eq!(invocation.positional(0), "--odd-id");
    }

    #[test]
    fn negative_numbers_are_positionals() {
        let node = CommandNode::builder("create")
            .positionals(PositionalContract::exactly(2, "<amount-usd> <symbol>"))
            .rule(DomainRule::UsdAmount)
            .operation(Operation::TransactionCreate)
            .build()
            .expect("create builds");
        let invocation =
            validate(&node, "transaction create", &args(&["-5", "BTC"])).expect("valid");
        assert_eq!(invocation.positional(0), "-5");
    }

    #[test]
    fn ssh_key_lists_accumulate() {
        let invocation = validate(
            &create_node(),
            "server create",
            &args(&["-n", "foo", "-t", "do", "-k", "k1,k2", "--sshkey", "k3"]),
        )
        .expect("valid");
        assert_eq!(invocation.list("sshkey"), args(&["k1", "k2", "k3"]).as_slice());
    }

    #[test]
    fn server_create_requires_password_or_ssh_key() {
        let base = ["--name", "foo", "--host", "do"];
        let err = validate(&create_node(), "server create", &args(&base)).expect_err("neither");
        assert_eq!(
            err.to_string(),
            "Error: You must provide either --sshkey or --password"
        );

        let mut with_key = args(&base);
        with_key.extend(args(&["--sshkey", "k1"]));
        assert!(validate(&create_node(), "server create", &with_key).is_ok());

        let mut with_password = args(&base);
        with_password.extend(args(&["--password", "secret"]));
        assert!(validate(&create_node(), "server create", &with_password).is_ok());
    }

    #[test]
    fn host_aliases_map_to_the_same_provider() {
        for (long, short, id) in [
            ("bitlaunch", "bl", 4),
            ("digitalocean", "do", 0),
            ("vultr", "v", 1),
            ("linode", "l", 2),
        ] {
            let from_long = HostProvider::parse(long).expect("long");
            let from_short = HostProvider::parse(short).expect("short");
            assert_eq!(from_long, from_short);
            assert_eq!(from_long.id(), id);
        }
        for bad in ["", "DO", "aws", "digital ocean", "vultr "] {
            assert!(HostProvider::parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn unknown_host_fails_server_create() {
        let err = validate(
            &create_node(),
            "server create",
            &args(&["-n", "foo", "-t", "aws", "-p", "pw"]),
        )
        .expect_err("bad host");
        assert!(err.to_string().contains("invalid host \"aws\""));
    }

    #[test]
    fn protection_states_parse_from_closed_set() {
        for value in ["enable", "true", "e"] {
            assert_eq!(parse_protection_state(value).expect(value), true);
        }
        for value in ["disable", "false", "d"] {
            assert_eq!(parse_protection_state(value).expect(value), false);
        }
        for value in ["on", "off", "Enable", "", "yes"] {
            assert!(parse_protection_state(value).is_err(), "{value:?}");
        }
    }

    #[test]
    fn ports_parse_pairs() {
        let ports = parse_ports("22:tcp, 53:udp").expect("valid ports");
        assert_eq!(
            ports,
            vec![
                Port {
                    port_number: 22,
                    protocol: "tcp".into()
                },
                Port {
                    port_number: 53,
                    protocol: "udp".into()
                },
            ]
        );
    }

    #[test]
    fn malformed_ports_name_the_entry() {
        for (input, entry) in [
            ("22:tcp,http:tcp", "http:tcp"),
            ("22", "22"),
            ("22:", "22:"),
            ("22:tcp:udp", "22:tcp:udp"),
            ("", ""),
        ] {
            let err = parse_ports(input).expect_err(input);
            assert!(
                err.to_string().contains(&format!("\"{entry}\"")),
                "{input:?} -> {err}"
            );
        }
    }

    #[test]
    fn usd_amount_must_be_integer() {
        assert_eq!(parse_usd_amount("20").expect("integer"), 20);
        for bad in ["20.5", "twenty", ""] {
            assert_eq!(
                parse_usd_amount(bad).expect_err(bad).to_string(),
                "Error: Please specify USD as an integer"
            );
        }
    }

    #[test]
    fn lightning_only_for_btc_and_ltc() {
        assert!(check_lightning(true, "BTC").is_ok());
        assert!(check_lightning(true, "LTC").is_ok());
        assert!(check_lightning(false, "ETH").is_ok());
        for symbol in ["ETH", "btc", "BCH", ""] {
            assert!(check_lightning(true, symbol).is_err(), "{symbol:?}");
        }
    }
}
