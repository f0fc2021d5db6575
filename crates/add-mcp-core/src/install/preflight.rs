//! Validation that runs before any file is touched.

use std::collections::BTreeMap;

use crate::client::{AgentDescriptor, AgentRegistry};
use crate::error::ValidationError;
use crate::mcp::ServerConfig;
use crate::types::ConfigScope;

/// An agent dropped from the selection, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAgent {
    pub agent_id: &'static str,
    pub reason: String,
}

/// The agents that can take the server, and those that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preflight {
    pub agents: Vec<&'static str>,
    pub skipped: Vec<SkippedAgent>,
}

/// Check a selection of agents against `server`.
///
/// Unknown ids and an empty selection are errors. Agents that cannot carry
/// the server's transport, or its headers, are skipped; it is an error only
/// when nothing is left.
pub fn validate_selection<S: AsRef<str>>(
    registry: &AgentRegistry,
    agent_ids: &[S],
    server: &ServerConfig,
) -> Result<Preflight, ValidationError> {
    let mut selected: Vec<&AgentDescriptor> = Vec::new();
    for id in agent_ids {
        let id = id.as_ref();
        let agent = registry
            .get(id)
            .ok_or_else(|| ValidationError::UnknownAgent(id.to_string()))?;
        if !selected.iter().any(|seen| seen.id == agent.id) {
            selected.push(agent);
        }
    }
    if selected.is_empty() {
        return Err(ValidationError::NoAgentsSelected);
    }

    let transport = server.transport();
    let mut preflight = Preflight::default();
    let (capable, unsupported): (Vec<_>, Vec<_>) = selected
        .into_iter()
        .partition(|agent| agent.supports_transport(transport));
    for agent in unsupported {
        skip(
            &mut preflight,
            agent.id,
            format!("does not support the {transport} transport"),
        );
    }
    if capable.is_empty() {
        return Err(ValidationError::UnsupportedTransport {
            transport: transport.to_string(),
        });
    }

    let wants_headers = server.headers().is_some();
    for agent in capable {
        if wants_headers && !agent.supports_headers {
            skip(&mut preflight, agent.id, "does not support custom headers".to_string());
        } else {
            preflight.agents.push(agent.id);
        }
    }
    if preflight.agents.is_empty() {
        return Err(ValidationError::HeadersUnsupported);
    }

    Ok(preflight)
}

fn skip(preflight: &mut Preflight, agent_id: &'static str, reason: String) {
    tracing::warn!(agent = agent_id, "Skipping agent: {reason}");
    preflight.skipped.push(SkippedAgent { agent_id, reason });
}

/// Decide which config file each agent writes to.
///
/// With no explicit scope, agents that have a project file use it. An explicit
/// project request routes agents without one to their global file instead.
pub fn resolve_routing<S: AsRef<str>>(
    registry: &AgentRegistry,
    agent_ids: &[S],
    requested: Option<ConfigScope>,
) -> Result<BTreeMap<String, ConfigScope>, ValidationError> {
    let mut routing = BTreeMap::new();
    for id in agent_ids {
        let id = id.as_ref();
        let agent = registry
            .get(id)
            .ok_or_else(|| ValidationError::UnknownAgent(id.to_string()))?;
        let has_project = agent.supports_scope(ConfigScope::Project);

        let scope = match requested {
            Some(ConfigScope::Global) => ConfigScope::Global,
            Some(ConfigScope::Project) if !has_project => {
                tracing::warn!(
                    agent = agent.id,
                    "No project config for this agent, installing globally"
                );
                ConfigScope::Global
            }
            _ if has_project => ConfigScope::Project,
            _ => ConfigScope::Global,
        };
        routing.insert(agent.id.to_string(), scope);
    }

    if requested == Some(ConfigScope::Project)
        && !routing.is_empty()
        && routing.values().all(|scope| *scope == ConfigScope::Global)
    {
        return Err(ValidationError::ScopeUnsupported {
            scope: ConfigScope::Project,
        });
    }
    Ok(routing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PlatformDirs;
    use crate::mcp::RemoteTransport;
    use std::path::Path;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(&PlatformDirs::rooted_at(Path::new("/sandbox")))
    }

    fn remote(headers: bool) -> ServerConfig {
        ServerConfig::Remote {
            transport: RemoteTransport::Http,
            url: "https://mcp.neon.tech/mcp".to_string(),
            headers: headers.then(|| {
                BTreeMap::from([("Authorization".to_string(), "Bearer x".to_string())])
            }),
        }
    }

    fn local() -> ServerConfig {
        ServerConfig::Local {
            command: "npx".to_string(),
            args: vec!["-y".to_string(), "pkg".to_string()],
            env: None,
        }
    }

    #[test]
    fn unknown_agent_is_rejected() {
        let err = validate_selection(&registry(), &["cursor", "emacs"], &local())
            .expect_err("emacs is unknown");
        assert_eq!(err, ValidationError::UnknownAgent("emacs".to_string()));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(
            validate_selection(&registry(), &empty, &local()),
            Err(ValidationError::NoAgentsSelected)
        );
    }

    #[test]
    fn transport_mismatch_skips_agent() {
        let preflight = validate_selection(&registry(), &["claude-desktop", "cursor"], &remote(false))
            .expect("cursor remains");

        assert_eq!(preflight.agents, vec!["cursor"]);
        assert_eq!(preflight.skipped.len(), 1);
        assert_eq!(preflight.skipped[0].agent_id, "claude-desktop");
    }

    #[test]
    fn transport_mismatch_everywhere_is_fatal() {
        assert_eq!(
            validate_selection(&registry(), &["claude-desktop"], &remote(false)),
            Err(ValidationError::UnsupportedTransport {
                transport: "http".to_string()
            })
        );
    }

    #[test]
    fn headers_require_support() {
        let mut no_headers = registry().get("cursor").expect("cursor").clone();
        no_headers.supports_headers = false;
        let registry = registry().with_descriptor(no_headers);

        assert_eq!(
            validate_selection(&registry, &["cursor"], &remote(true)),
            Err(ValidationError::HeadersUnsupported)
        );
        let preflight =
            validate_selection(&registry, &["cursor", "vscode"], &remote(true)).expect("vscode");
        assert_eq!(preflight.agents, vec!["vscode"]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let preflight =
            validate_selection(&registry(), &["zed", "zed"], &local()).expect("valid");
        assert_eq!(preflight.agents, vec!["zed"]);
    }

    #[test]
    fn routing_defaults_to_project_where_possible() {
        let routing = resolve_routing(&registry(), &["claude-code", "goose"], None).expect("routing");

        assert_eq!(routing["claude-code"], ConfigScope::Project);
        assert_eq!(routing["goose"], ConfigScope::Global);
    }

    #[test]
    fn explicit_global_routes_everything_global() {
        let routing = resolve_routing(&registry(), &["claude-code", "codex"], Some(ConfigScope::Global))
            .expect("routing");

        assert!(routing.values().all(|scope| *scope == ConfigScope::Global));
    }

    #[test]
    fn explicit_project_needs_one_project_agent() {
        let routing = resolve_routing(&registry(), &["cursor", "goose"], Some(ConfigScope::Project))
            .expect("cursor has a project file");
        assert_eq!(routing["cursor"], ConfigScope::Project);
        assert_eq!(routing["goose"], ConfigScope::Global);

        assert_eq!(
            resolve_routing(&registry(), &["goose", "claude-desktop"], Some(ConfigScope::Project)),
            Err(ValidationError::ScopeUnsupported {
                scope: ConfigScope::Project
            })
        );
    }
}
