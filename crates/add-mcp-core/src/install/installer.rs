//! Per-agent install pipeline: resolve path and key, transform, merge-write.
//!
//! Failures never escape [`Installer::install_one`]; they are folded into the
//! agent's [`InstallResult`] so one broken config file cannot stop the others.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::client::{AgentDescriptor, AgentRegistry, TransformContext, transform};
use crate::config::client_config::read_map_at_key;
use crate::config::{ConfigDocument, nest_under_key, serializer_for_format};
use crate::error::{ConfigError, Result};
use crate::mcp::ServerConfig;
use crate::types::ConfigScope;

/// Options for a single agent install.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub scope: ConfigScope,
    pub cwd: PathBuf,
}

/// Options for installing to several agents.
#[derive(Debug, Clone, Default)]
pub struct InstallManyOptions {
    /// Scope per agent id. Agents missing here are installed globally.
    pub routing: BTreeMap<String, ConfigScope>,
    pub cwd: PathBuf,
}

/// Outcome of installing one server into one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub agent_id: String,
    pub success: bool,
    /// The config file written, or that would have been written.
    pub path: PathBuf,
    pub error: Option<String>,
}

impl InstallResult {
    fn succeeded(agent_id: &str, path: PathBuf) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            success: true,
            path,
            error: None,
        }
    }

    fn failed(agent_id: &str, path: PathBuf, error: String) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            success: false,
            path,
            error: Some(error),
        }
    }
}

/// Read-only view splitting results into successes and failures.
#[derive(Debug, Clone, Copy)]
pub struct InstallSummary<'a> {
    results: &'a BTreeMap<String, InstallResult>,
}

impl<'a> InstallSummary<'a> {
    pub fn new(results: &'a BTreeMap<String, InstallResult>) -> Self {
        Self { results }
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &'a InstallResult> + 'a {
        self.results.values().filter(|r| r.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &'a InstallResult> + 'a {
        self.results.values().filter(|r| !r.success)
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.values().all(|r| r.success)
    }
}

/// Installs server entries using the agents of one registry.
#[derive(Debug, Clone, Copy)]
pub struct Installer<'a> {
    registry: &'a AgentRegistry,
}

impl<'a> Installer<'a> {
    pub fn new(registry: &'a AgentRegistry) -> Self {
        Self { registry }
    }

    /// Install `server` as `name` into one agent's config file.
    pub fn install_one(
        &self,
        name: &str,
        server: &ServerConfig,
        agent_id: &str,
        options: &InstallOptions,
    ) -> InstallResult {
        let Some(agent) = self.registry.get(agent_id) else {
            return InstallResult::failed(
                agent_id,
                PathBuf::new(),
                format!("Unknown agent '{agent_id}'"),
            );
        };

        let scope = agent.effective_scope(options.scope);
        if scope != options.scope {
            tracing::warn!(
                agent = agent.id,
                requested = %options.scope,
                "Agent has no {} config, installing to {}",
                options.scope,
                scope
            );
        }
        let path = agent.config_path_for(scope, &options.cwd);

        match write_entry(agent, scope, name, server, &path) {
            Ok(()) => {
                tracing::info!(
                    agent = agent.id,
                    server = name,
                    path = %path.display(),
                    "Installed MCP server"
                );
                InstallResult::succeeded(agent.id, path)
            }
            Err(err) => {
                tracing::debug!(agent = agent.id, error = %err, "Install failed");
                InstallResult::failed(agent.id, path, err.to_string())
            }
        }
    }

    /// Install into each agent in turn; results are keyed by agent id.
    ///
    /// There is no rollback: a failure is recorded and the next agent proceeds.
    pub fn install_many(
        &self,
        name: &str,
        server: &ServerConfig,
        agent_ids: &[&str],
        options: &InstallManyOptions,
    ) -> BTreeMap<String, InstallResult> {
        let mut results = BTreeMap::new();
        for &agent_id in agent_ids {
            let scope = options
                .routing
                .get(agent_id)
                .copied()
                .unwrap_or(ConfigScope::Global);
            let single = InstallOptions {
                scope,
                cwd: options.cwd.clone(),
            };
            let result = self.install_one(name, server, agent_id, &single);
            results.insert(agent_id.to_string(), result);
        }
        results
    }

    /// Whether `name` is a direct child of the agent's servers map.
    ///
    /// Unreadable files and missing keys count as "not installed".
    pub fn is_server_installed(
        &self,
        name: &str,
        agent_id: &str,
        scope: ConfigScope,
        cwd: &Path,
    ) -> bool {
        let Some(agent) = self.registry.get(agent_id) else {
            return false;
        };
        let path = agent.config_path_for(scope, cwd);
        let key = agent.config_key_for(scope);

        match read_map_at_key(&path, key, agent.format) {
            Ok(Some(servers)) => servers.contains_key(name),
            Ok(None) => false,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Config unreadable");
                false
            }
        }
    }
}

fn write_entry(
    agent: &AgentDescriptor,
    scope: ConfigScope,
    name: &str,
    server: &ServerConfig,
    path: &Path,
) -> Result<()> {
    if scope == ConfigScope::Project
        && let Some(local) = &agent.local_config_path
    {
        ensure_relative_path(local)?;
    }

    let key = agent.config_key_for(scope);
    let ctx = TransformContext {
        local: scope == ConfigScope::Project,
    };
    let mut entries = ConfigDocument::new();
    entries.insert(name.to_string(), transform(agent.transform, name, server, ctx));
    let patch = nest_under_key(key, entries);

    tracing::debug!(
        agent = agent.id,
        path = %path.display(),
        key,
        format = %agent.format,
        "Resolved config target"
    );
    serializer_for_format(agent.format).write(path, &patch)
}

/// Project config paths must stay under the working directory.
fn ensure_relative_path(path: &Path) -> Result<()> {
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        return Err(ConfigError::PathOutsideRoot {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
