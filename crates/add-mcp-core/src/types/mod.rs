//! Shared core types used across the registry and installer layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of an agent's config files a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    /// The user-level file under the home or platform config directory.
    Global,
    /// The project-local file, relative to the working directory.
    Project,
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigScope::Global => f.write_str("global"),
            ConfigScope::Project => f.write_str("project"),
        }
    }
}
