//! Declarative command hierarchy and path resolution.
//!
//! Nodes are assembled through [`CommandBuilder`], which checks each node's
//! contract once at startup. After that the tree is immutable.

mod contract;

use std::fmt::Write as _;

use thiserror::Error;

pub(crate) use contract::{
    ContractError, FlagContract, FlagKind, FlagSpec, FlagValue, PositionalContract,
};

use crate::commands::Operation;
use crate::validate::DomainRule;

/// One addressable command or command group.
#[derive(Debug, Clone)]
pub(crate) struct CommandNode {
    name: &'static str,
    about: &'static str,
    long_about: &'static str,
    aliases: Vec<&'static str>,
    children: Vec<CommandNode>,
    default_child: Option<&'static str>,
    flags: FlagContract,
    positionals: PositionalContract,
    rules: Vec<DomainRule>,
    operation: Option<Operation>,
}

impl CommandNode {
    pub(crate) fn builder(name: &'static str) -> CommandBuilder {
        CommandBuilder {
            node: Self {
                name,
                about: "",
                long_about: "",
                aliases: Vec::new(),
                children: Vec::new(),
                default_child: None,
                flags: FlagContract::default(),
                positionals: PositionalContract::none(),
                rules: Vec::new(),
                operation: None,
            },
        }
    }

    pub(crate) const fn flags(&self) -> &FlagContract {
        &self.flags
    }

    pub(crate) const fn positionals(&self) -> &PositionalContract {
        &self.positionals
    }

    pub(crate) fn rules(&self) -> &[DomainRule] {
        &self.rules
    }

    fn matches(&self, segment: &str) -> bool {
        self.name == segment || self.aliases.contains(&segment)
    }

    /// Child addressed by name or alias.
    pub(crate) fn child(&self, segment: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.matches(segment))
    }

    fn default_child(&self) -> Option<&Self> {
        self.default_child.and_then(|name| self.child(name))
    }

    fn child_names(&self) -> String {
        self.children
            .iter()
            .map(|child| child.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Help text for this node, addressed as `path` (e.g. `blcli server create`).
    pub(crate) fn usage(&self, path: &str) -> String {
        let mut out = String::new();
        let description = if self.long_about.is_empty() {
            self.about
        } else {
            self.long_about
        };
        if !description.is_empty() {
            let _ = writeln!(out, "{description}\n");
        }

        if self.operation.is_some() {
            let _ = write!(out, "Usage: {path}");
            if !self.flags.is_empty() {
                out.push_str(" [flags]");
            }
            if !self.positionals.hint().is_empty() {
                let _ = write!(out, " {}", self.positionals.hint());
            }
            out.push('\n');
        } else {
            let _ = writeln!(out, "Usage: {path} <command>");
        }

        if !self.aliases.is_empty() {
            let _ = writeln!(out, "\nAliases: {}", self.aliases.join(", "));
        }

        if !self.children.is_empty() {
            out.push_str("\nCommands:\n");
            for child in &self.children {
                let marker = if self.default_child == Some(child.name) {
                    " (default)"
                } else {
                    ""
                };
                let _ = writeln!(out, "  {:<14}{}{marker}", child.name, child.about);
            }
        }

        if !self.flags.is_empty() {
            out.push_str("\nFlags:\n");
            for spec in self.flags.iter() {
                let short = spec
                    .short_name()
                    .map_or_else(|| "    ".to_string(), |short| format!("-{short}, "));
                let long = format!("--{} {}", spec.name(), spec.kind().placeholder());
                let required = if spec.is_required() { " (required)" } else { "" };
                let _ = writeln!(
                    out,
                    "  {short}{:<22}{}{required}",
                    long.trim_end(),
                    spec.help_text()
                );
            }
        }

        out.trim_end().to_string()
    }

    fn check(&self) -> Result<(), ContractError> {
        let command = self.name;
        self.flags.check(command)?;
        self.positionals.check(command)?;

        match (self.operation.is_some(), self.children.is_empty()) {
            (true, false) => return Err(ContractError::Ambiguous { command }),
            (false, true) => return Err(ContractError::Empty { command }),
            _ => {}
        }

        let mut seen: Vec<&'static str> = Vec::new();
        for child in &self.children {
            for name in std::iter::once(child.name).chain(child.aliases.iter().copied()) {
                if seen.contains(&name) {
                    return Err(ContractError::DuplicateChild { command, name });
                }
                seen.push(name);
            }
        }

        if let Some(child) = self.default_child
            && !self.children.iter().any(|node| node.name == child)
        {
            return Err(ContractError::MissingDefault { command, child });
        }
        Ok(())
    }
}

/// Builder producing validated, immutable [`CommandNode`]s.
#[derive(Debug)]
pub(crate) struct CommandBuilder {
    node: CommandNode,
}

impl CommandBuilder {
    #[must_use]
    pub(crate) const fn about(mut self, about: &'static str) -> Self {
        self.node.about = about;
        self
    }

    #[must_use]
    pub(crate) const fn long_about(mut self, long_about: &'static str) -> Self {
        self.node.long_about = long_about;
        self
    }

    #[must_use]
    pub(crate) fn aliases(mut self, aliases: &[&'static str]) -> Self {
        self.node.aliases.extend_from_slice(aliases);
        self
    }

    #[must_use]
    pub(crate) fn flag(mut self, spec: FlagSpec) -> Self {
        self.node.flags.push(spec);
        self
    }

    #[must_use]
    pub(crate) const fn positionals(mut self, contract: PositionalContract) -> Self {
        self.node.positionals = contract;
        self
    }

    #[must_use]
    pub(crate) fn rule(mut self, rule: DomainRule) -> Self {
        self.node.rules.push(rule);
        self
    }

    #[must_use]
    pub(crate) const fn operation(mut self, operation: Operation) -> Self {
        self.node.operation = Some(operation);
        self
    }

    #[must_use]
    pub(crate) fn child(mut self, child: CommandNode) -> Self {
        self.node.children.push(child);
        self
    }

    /// Child invoked when the group is called without a subcommand.
    #[must_use]
    pub(crate) const fn default_child(mut self, name: &'static str) -> Self {
        self.node.default_child = Some(name);
        self
    }

    pub(crate) fn build(self) -> Result<CommandNode, ContractError> {
        self.node.check()?;
        Ok(self.node)
    }
}

/// Root of the command hierarchy.
#[derive(Debug, Clone)]
pub(crate) struct CommandTree {
    root: CommandNode,
}

/// A path resolved to a runnable node plus the arguments left for it.
#[derive(Debug)]
pub(crate) struct Resolved<'t> {
    pub(crate) node: &'t CommandNode,
    pub(crate) operation: Operation,
    pub(crate) path: Vec<&'static str>,
    pub(crate) args: Vec<String>,
}

impl Resolved<'_> {
    /// Canonical command path without the program name, e.g. `server create`.
    pub(crate) fn command_path(&self) -> String {
        self.path.join(" ")
    }
}

/// The path does not lead to a runnable command.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub(crate) struct NotFound(String);

impl CommandTree {
    pub(crate) const fn new(root: CommandNode) -> Self {
        Self { root }
    }

    pub(crate) const fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Walk `segments` from the root, matching names and aliases exactly.
    ///
    /// A segment starting with `-` ends the walk. Groups called without a
    /// subcommand continue into their declared default child.
    pub(crate) fn resolve(&self, segments: &[String]) -> Result<Resolved<'_>, NotFound> {
        let mut node = &self.root;
        let mut path: Vec<&'static str> = Vec::new();
        let mut rest = segments;

        loop {
            if let Some(operation) = node.operation {
                return Ok(Resolved {
                    node,
                    operation,
                    path,
                    args: rest.to_vec(),
                });
            }

            match rest.split_first() {
                Some((segment, tail)) if !segment.starts_with('-') => {
                    let Some(child) = node.child(segment) else {
                        return Err(NotFound(format!(
                            "unknown command \"{segment}\" for \"{}\" (available: {})",
                            self.display_path(&path),
                            node.child_names()
                        )));
                    };
                    path.push(child.name);
                    node = child;
                    rest = tail;
                }
                _ => {
                    let Some(child) = node.default_child() else {
                        return Err(NotFound(format!(
                            "\"{}\" requires a subcommand (available: {})",
                            self.display_path(&path),
                            node.child_names()
                        )));
                    };
                    path.push(child.name);
                    node = child;
                }
            }
        }
    }

    /// Deepest node named by the leading non-flag segments, for help output.
    ///
    /// Unlike [`Self::resolve`] this never follows default children, so
    /// `account --help` describes the group rather than `account show`.
    pub(crate) fn help_target(&self, segments: &[String]) -> (String, &CommandNode) {
        let mut node = &self.root;
        let mut path: Vec<&'static str> = Vec::new();
        for segment in segments {
            if segment.starts_with('-') {
                break;
            }
            let Some(child) = node.child(segment) else {
                break;
            };
            path.push(child.name);
            node = child;
        }
        (self.display_path(&path), node)
    }

    /// Full path including the program name.
    pub(crate) fn display_path(&self, path: &[&str]) -> String {
        std::iter::once(self.root.name)
            .chain(path.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[cfg(test)]
    pub(crate) fn leaves(&self) -> Vec<(String, &CommandNode)> {
        fn walk<'t>(
            node: &'t CommandNode,
            path: &mut Vec<&'static str>,
            out: &mut Vec<(String, &'t CommandNode)>,
        ) {
            if node.operation.is_some() {
                out.push((path.join(" "), node));
            }
            for child in &node.children {
                path.push(child.name);
                walk(child, path, out);
                path.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut Vec::new(), &mut out);
        out
    }
}
