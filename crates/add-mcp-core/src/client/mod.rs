//! Agent descriptors.
//!
//! Every supported coding agent is described by plain data: where its config
//! files live, which key holds the servers map, which format the file uses
//! and which transform produces its on-disk entry shape.

mod paths;
mod registry;
pub mod transform;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::ConfigFormat;
use crate::mcp::McpTransport;
use crate::types::ConfigScope;

pub use paths::PlatformDirs;
pub use registry::AgentRegistry;
pub use transform::{TransformContext, TransformKind, transform};

/// Static description of one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Absolute path of the user-level config file.
    pub global_config_path: PathBuf,
    /// Project config file, relative to the working directory.
    pub local_config_path: Option<PathBuf>,
    /// Relative paths whose presence suggests the project uses this agent.
    pub project_detect_paths: Vec<PathBuf>,
    /// Dotted key of the servers map.
    pub config_key: &'static str,
    /// Dotted key used in the project file, when it differs.
    pub local_config_key: Option<&'static str>,
    pub format: ConfigFormat,
    pub supported_transports: BTreeSet<McpTransport>,
    pub supports_headers: bool,
    pub transform: TransformKind,
}

impl AgentDescriptor {
    pub fn supports_scope(&self, scope: ConfigScope) -> bool {
        match scope {
            ConfigScope::Global => true,
            ConfigScope::Project => self.local_config_path.is_some(),
        }
    }

    pub fn supports_transport(&self, transport: McpTransport) -> bool {
        self.supported_transports.contains(&transport)
    }

    /// The scope a write will actually target.
    ///
    /// Project requests fall back to global for agents without a project file.
    pub fn effective_scope(&self, requested: ConfigScope) -> ConfigScope {
        if self.supports_scope(requested) {
            requested
        } else {
            ConfigScope::Global
        }
    }

    pub fn config_key_for(&self, scope: ConfigScope) -> &'static str {
        match (self.effective_scope(scope), self.local_config_key) {
            (ConfigScope::Project, Some(key)) => key,
            _ => self.config_key,
        }
    }

    pub fn config_path_for(&self, scope: ConfigScope, cwd: &Path) -> PathBuf {
        match (self.effective_scope(scope), &self.local_config_path) {
            (ConfigScope::Project, Some(local)) => cwd.join(local),
            _ => self.global_config_path.clone(),
        }
    }
}
