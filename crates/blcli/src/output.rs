//! Structured output rendering.

use serde::Serialize;

use crate::error::{CliError, CliResult};

/// Supported structured output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum OutputFormat {
    #[default]
    Json,
}

impl OutputFormat {
    pub(crate) fn parse(name: &str) -> CliResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            _ => Err(CliError::render(format!("unknown output format '{name}'"))),
        }
    }

    /// Render `value` into text, keeping its declared field order.
    pub(crate) fn render<T: Serialize + ?Sized>(self, value: &T) -> CliResult<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(value)
                .map_err(|err| CliError::render(format!("failed to format JSON: {err}"))),
        }
    }
}
