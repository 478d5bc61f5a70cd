//! CLI error taxonomy and the one-line stderr reporter.

use blcli_api::ApiError;
use thiserror::Error;

/// Failure of a single CLI invocation.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Arguments were rejected before any network call.
    #[error("Error: {0}")]
    Validation(String),
    /// The remote service reported a failure.
    #[error("Error {action}: {source}")]
    Remote {
        action: &'static str,
        #[source]
        source: ApiError,
    },
    /// The result could not be rendered in the requested form.
    #[error("Error: {0}")]
    Render(String),
    /// The process could not be set up (credentials, config, client).
    #[error("Error: {0}")]
    Startup(String),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    pub(crate) fn startup(message: impl Into<String>) -> Self {
        Self::Startup(message.into())
    }

    /// Adapter for `map_err` on remote calls.
    pub(crate) fn remote(action: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Remote { action, source }
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Remote { .. } | Self::Render(_) | Self::Startup(_) => 1,
        }
    }

    /// The single line written to stderr.
    pub(crate) fn display_message(&self) -> String {
        self.to_string().replace(['\r', '\n'], " ")
    }

    /// Print the error and return the process exit code.
    pub(crate) fn report(&self) -> i32 {
        tracing::debug!(error = ?self, "command failed");
        eprintln!("{}", self.display_message());
        self.exit_code()
    }
}
