//! Dependencies threaded through command execution.

use blcli_api::{HttpConfig, HttpRemoteService, RemoteService};
use uuid::Uuid;

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use crate::payment::{QrRenderer, TerminalQr};
use crate::settings::Settings;

/// Everything a handler may touch, resolved once at startup.
pub(crate) struct AppContext {
    pub(crate) service: Box<dyn RemoteService>,
    pub(crate) output: OutputFormat,
    pub(crate) qr: Box<dyn QrRenderer>,
}

impl AppContext {
    /// Build the HTTP-backed context.
    ///
    /// The output format is checked here so an unknown name fails before any
    /// remote call.
    pub(crate) fn connect(settings: &Settings) -> CliResult<Self> {
        let output = OutputFormat::parse(&settings.output)?;
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(api_url = %settings.api_url, %request_id, "connecting");
        let service = HttpRemoteService::new(&HttpConfig {
            base_url: settings.api_url.clone(),
            token: settings.token.clone(),
            timeout: settings.timeout,
            request_id,
        })
        .map_err(|err| CliError::startup(err.to_string()))?;

        Ok(Self {
            service: Box::new(service),
            output,
            qr: Box::new(TerminalQr),
        })
    }
}
