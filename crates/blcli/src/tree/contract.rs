//! Flag and positional-argument contracts attached to command nodes.

use thiserror::Error;

/// Value type accepted by a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlagKind {
    String,
    Integer,
    Boolean,
    StringList,
}

impl FlagKind {
    const fn zero(self) -> FlagValue {
        match self {
            Self::String => FlagValue::String(String::new()),
            Self::Integer => FlagValue::Integer(0),
            Self::Boolean => FlagValue::Boolean(false),
            Self::StringList => FlagValue::StringList(Vec::new()),
        }
    }

    pub(crate) const fn placeholder(self) -> &'static str {
        match self {
            Self::String => "<string>",
            Self::Integer => "<int>",
            Self::Boolean => "",
            Self::StringList => "<list>",
        }
    }
}

/// Parsed flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FlagValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    StringList(Vec<String>),
}

impl FlagValue {
    pub(crate) const fn kind(&self) -> FlagKind {
        match self {
            Self::String(_) => FlagKind::String,
            Self::Integer(_) => FlagKind::Integer,
            Self::Boolean(_) => FlagKind::Boolean,
            Self::StringList(_) => FlagKind::StringList,
        }
    }
}

/// Declaration of a single flag.
#[derive(Debug, Clone)]
pub(crate) struct FlagSpec {
    name: &'static str,
    short: Option<char>,
    kind: FlagKind,
    default: Option<FlagValue>,
    required: bool,
    help: &'static str,
}

impl FlagSpec {
    const fn new(name: &'static str, kind: FlagKind) -> Self {
        Self {
            name,
            short: None,
            kind,
            default: None,
            required: false,
            help: "",
        }
    }

    pub(crate) const fn string(name: &'static str) -> Self {
        Self::new(name, FlagKind::String)
    }

    pub(crate) const fn integer(name: &'static str) -> Self {
        Self::new(name, FlagKind::Integer)
    }

    pub(crate) const fn boolean(name: &'static str) -> Self {
        Self::new(name, FlagKind::Boolean)
    }

    pub(crate) const fn string_list(name: &'static str) -> Self {
        Self::new(name, FlagKind::StringList)
    }

    #[must_use]
    pub(crate) const fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    #[must_use]
    pub(crate) const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub(crate) const fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    #[must_use]
    pub(crate) fn default_str(mut self, value: &str) -> Self {
        self.default = Some(FlagValue::String(value.to_string()));
        self
    }

    #[must_use]
    pub(crate) fn default_int(mut self, value: i64) -> Self {
        self.default = Some(FlagValue::Integer(value));
        self
    }

    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) const fn short_name(&self) -> Option<char> {
        self.short
    }

    pub(crate) const fn kind(&self) -> FlagKind {
        self.kind
    }

    pub(crate) const fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) const fn help_text(&self) -> &'static str {
        self.help
    }

    /// Value applied when the flag is not supplied.
    pub(crate) fn default_value(&self) -> FlagValue {
        self.default.clone().unwrap_or_else(|| self.kind.zero())
    }
}

/// Ordered set of flags accepted by a command.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlagContract {
    flags: Vec<FlagSpec>,
}

impl FlagContract {
    pub(crate) fn push(&mut self, spec: FlagSpec) {
        self.flags.push(spec);
    }

    pub(crate) fn by_name(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|spec| spec.name == name)
    }

    pub(crate) fn by_short(&self, short: char) -> Option<&FlagSpec> {
        self.flags.iter().find(|spec| spec.short == Some(short))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &FlagSpec> {
        self.flags.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub(crate) fn check(&self, command: &'static str) -> Result<(), ContractError> {
        for (index, spec) in self.flags.iter().enumerate() {
            if spec.name == "help" || spec.short == Some('h') {
                return Err(ContractError::ReservedFlag {
                    command,
                    flag: spec.name,
                });
            }
            if spec.required && spec.default.is_some() {
                return Err(ContractError::RequiredWithDefault {
                    command,
                    flag: spec.name,
                });
            }
            if let Some(default) = &spec.default
                && default.kind() != spec.kind
            {
                return Err(ContractError::DefaultKindMismatch {
                    command,
                    flag: spec.name,
                });
            }
            let earlier = &self.flags[..index];
            if earlier.iter().any(|other| other.name == spec.name) {
                return Err(ContractError::DuplicateFlag {
                    command,
                    flag: spec.name,
                });
            }
            if let Some(short) = spec.short
                && earlier.iter().any(|other| other.short == Some(short))
            {
                return Err(ContractError::DuplicateShort { command, short });
            }
        }
        Ok(())
    }
}

/// Accepted number of positional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PositionalContract {
    min: usize,
    max: usize,
    hint: &'static str,
}

impl Default for PositionalContract {
    fn default() -> Self {
        Self::none()
    }
}

impl PositionalContract {
    pub(crate) const fn none() -> Self {
        Self {
            min: 0,
            max: 0,
            hint: "",
        }
    }

    pub(crate) const fn exactly(count: usize, hint: &'static str) -> Self {
        Self {
            min: count,
            max: count,
            hint,
        }
    }

    #[cfg(test)]
    pub(crate) const fn range(min: usize, max: usize, hint: &'static str) -> Self {
        Self { min, max, hint }
    }

    pub(crate) const fn min(&self) -> usize {
        self.min
    }

    pub(crate) const fn max(&self) -> usize {
        self.max
    }

    pub(crate) const fn hint(&self) -> &'static str {
        self.hint
    }

    pub(crate) const fn accepts(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }

    pub(crate) const fn check(&self, command: &'static str) -> Result<(), ContractError> {
        if self.min > self.max {
            return Err(ContractError::PositionalRange {
                command,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// A command declaration that cannot be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ContractError {
    #[error("command '{command}': flag '--{flag}' is reserved")]
    ReservedFlag {
        command: &'static str,
        flag: &'static str,
    },
    #[error("command '{command}': required flag '--{flag}' declares a default")]
    RequiredWithDefault {
        command: &'static str,
        flag: &'static str,
    },
    #[error("command '{command}': default for '--{flag}' does not match its type")]
    DefaultKindMismatch {
        command: &'static str,
        flag: &'static str,
    },
    #[error("command '{command}': flag '--{flag}' declared twice")]
    DuplicateFlag {
        command: &'static str,
        flag: &'static str,
    },
    #[error("command '{command}': short flag '-{short}' declared twice")]
    DuplicateShort { command: &'static str, short: char },
    #[error("command '{command}': positional minimum {min} exceeds maximum {max}")]
    PositionalRange {
        command: &'static str,
        min: usize,
        max: usize,
    },
    #[error("command '{command}': child name or alias '{name}' declared twice")]
    DuplicateChild {
        command: &'static str,
        name: &'static str,
    },
    #[error("command '{command}': default child '{child}' is not declared")]
    MissingDefault {
        command: &'static str,
        child: &'static str,
    },
    #[error("command '{command}' has neither an operation nor subcommands")]
    Empty { command: &'static str },
    #[error("command '{command}' has both an operation and subcommands")]
    Ambiguous { command: &'static str },
}
