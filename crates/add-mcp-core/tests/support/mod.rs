#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use add_mcp_core::client::{AgentRegistry, PlatformDirs};
use add_mcp_core::install::{InstallOptions, InstallResult, Installer};
use add_mcp_core::mcp::{BuildOptions, ServerConfig, build};
use add_mcp_core::source::classify;
use add_mcp_core::types::ConfigScope;

/// A throwaway home directory plus a project directory inside it.
pub struct Sandbox {
    pub temp: TempDir,
    pub dirs: PlatformDirs,
    pub registry: AgentRegistry,
    pub project: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let dirs = PlatformDirs::rooted_at(temp.path());
        let registry = AgentRegistry::new(&dirs);
        let project = temp.path().join("project");
        std::fs::create_dir_all(&project).expect("create project dir");
        Self {
            temp,
            dirs,
            registry,
            project,
        }
    }

    pub fn installer(&self) -> Installer<'_> {
        Installer::new(&self.registry)
    }

    pub fn install(
        &self,
        name: &str,
        server: &ServerConfig,
        agent_id: &str,
        scope: ConfigScope,
    ) -> InstallResult {
        self.installer().install_one(
            name,
            server,
            agent_id,
            &InstallOptions {
                scope,
                cwd: self.project.clone(),
            },
        )
    }

    pub fn is_installed(&self, name: &str, agent_id: &str, scope: ConfigScope) -> bool {
        self.installer()
            .is_server_installed(name, agent_id, scope, &self.project)
    }
}

/// Classify and build a target with default options.
pub fn server(target: &str) -> ServerConfig {
    build(&classify(target), &BuildOptions::default())
}

pub fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).expect("read config");
    serde_json::from_str(&content).expect("valid JSON")
}

pub fn read_yaml(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).expect("read config");
    serde_yaml::from_str(&content).expect("valid YAML")
}

pub fn read_toml(path: &Path) -> toml::Table {
    let content = std::fs::read_to_string(path).expect("read config");
    toml::from_str(&content).expect("valid TOML")
}
