//! Platform base directories used to resolve agent config paths.

use std::path::{Path, PathBuf};

/// Base directories captured once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// The user's home directory.
    pub home: PathBuf,
    /// OS application config directory: Application Support on macOS,
    /// Roaming AppData on Windows, XDG config on Linux.
    pub app_config: PathBuf,
    /// `$XDG_CONFIG_HOME`, or `~/.config`.
    pub xdg_config: PathBuf,
    /// `$CODEX_HOME`, or `~/.codex`.
    pub codex_home: PathBuf,
}

impl PlatformDirs {
    /// Read base directories from the environment.
    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            tracing::warn!("Could not determine home directory, using current directory");
            PathBuf::from(".")
        });
        let xdg_config = env_dir("XDG_CONFIG_HOME").unwrap_or_else(|| home.join(".config"));
        let app_config = dirs::config_dir().unwrap_or_else(|| xdg_config.clone());
        let codex_home = env_dir("CODEX_HOME").unwrap_or_else(|| home.join(".codex"));

        Self {
            home,
            app_config,
            xdg_config,
            codex_home,
        }
    }

    /// A fully isolated layout under `root`, for tests and sandboxes.
    pub fn rooted_at(root: &Path) -> Self {
        let home = root.join("home");
        Self {
            app_config: root.join("app-config"),
            xdg_config: home.join(".config"),
            codex_home: home.join(".codex"),
            home,
        }
    }
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
