//! Error taxonomy for the core library.
//!
//! [`ConfigError`] covers everything that can go wrong while reading or writing
//! an agent's config file. The installer turns it into a per-agent failure.
//! [`ValidationError`] is raised before any file is touched and aborts the
//! whole invocation.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::client_config::ConfigFormat;
use crate::types::ConfigScope;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {format} config {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {format} config: {message}")]
    Serialize {
        format: ConfigFormat,
        message: String,
    },

    #[error("Config path {} escapes the project directory", path.display())]
    PathOutsideRoot { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn io(action: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("No agents selected")]
    NoAgentsSelected,

    #[error("None of the selected agents support the {transport} transport")]
    UnsupportedTransport { transport: String },

    #[error("None of the selected agents support custom headers")]
    HeadersUnsupported,

    #[error("None of the selected agents support {scope} configuration")]
    ScopeUnsupported { scope: ConfigScope },
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
