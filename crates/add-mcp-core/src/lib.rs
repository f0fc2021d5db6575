//! add-mcp core library
//!
//! Installs MCP server declarations into the config files of coding agents.
//! A raw target is classified ([`source`]), turned into a canonical record
//! ([`mcp`]), reshaped per agent ([`client`]) and merged into each agent's
//! JSON, YAML or TOML file ([`config`], [`install`]).

pub mod client;
pub mod config;
pub mod error;
pub mod install;
pub mod mcp;
pub mod source;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Sources and servers
    pub use crate::mcp::{BuildOptions, McpTransport, RemoteTransport, ServerConfig, build};
    pub use crate::source::{ParsedSource, SourceKind, classify};

    // Agents
    pub use crate::client::{AgentDescriptor, AgentRegistry, PlatformDirs, TransformKind};

    // Install
    pub use crate::install::{
        InstallManyOptions, InstallOptions, InstallResult, InstallSummary, Installer,
        resolve_routing, validate_selection,
    };

    // Config
    pub use crate::config::{ConfigDocument, ConfigFormat};
    pub use crate::error::{ConfigError, ValidationError};
    pub use crate::types::ConfigScope;
}
