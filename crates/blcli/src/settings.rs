//! Global settings: command-line flags, environment, and the YAML config file.
//!
//! Precedence is flag, then environment (both handled by clap), then the
//! config file, then the built-in default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use blcli_api::DEFAULT_API_URL;
use blcli_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig};
use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;
use crate::error::CliError;

const CONFIG_FILE_NAME: &str = ".blcli.yaml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OUTPUT: &str = "json";

/// Contents of `~/.blcli.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) token: Option<String>,
    pub(crate) api_url: Option<String>,
    pub(crate) output: Option<String>,
    pub(crate) log_level: Option<String>,
    pub(crate) log_format: Option<String>,
    pub(crate) timeout_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(
        "You must specify your API token with either the --token parameter or by exporting it as an environment variable: export BL_API_TOKEN='<your_token_here>'"
    )]
    MissingToken,
    #[error("invalid API URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::startup(err.to_string())
    }
}

/// `~/.blcli.yaml`, when a home directory can be determined.
pub(crate) fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
}

/// Load the config file.
///
/// An explicit path must exist; the default path is optional.
pub(crate) fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig, SettingsError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(FileConfig::default()),
        },
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(source) => return Err(SettingsError::Read { path, source }),
    };

    if text.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&text).map_err(|source| SettingsError::Parse { path, source })
}

/// Logging settings, available before the token is checked.
pub(crate) fn logging_config<'a>(cli: &'a Cli, file: &'a FileConfig) -> LoggingConfig<'a> {
    LoggingConfig {
        level: cli
            .log_level
            .as_deref()
            .or(file.log_level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL),
        format: file
            .log_format
            .as_deref()
            .map_or_else(LogFormat::infer, LogFormat::from_name),
    }
}

/// Process-wide settings resolved once at startup.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) token: String,
    pub(crate) api_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) output: String,
}

impl Settings {
    pub(crate) fn resolve(cli: &Cli, file: &FileConfig) -> Result<Self, SettingsError> {
        let token = cli
            .token
            .as_deref()
            .or(file.token.as_deref())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(SettingsError::MissingToken)?
            .to_string();

        let api_url = cli
            .api_url
            .as_deref()
            .or(file.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);
        let api_url = Url::parse(api_url).map_err(|source| SettingsError::InvalidUrl {
            value: api_url.to_string(),
            source,
        })?;

        let timeout_secs = cli
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let output = cli
            .output
            .as_deref()
            .or(file.output.as_deref())
            .unwrap_or(DEFAULT_OUTPUT)
            .to_string();

        Ok(Self {
            token,
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            output,
        })
    }
}
