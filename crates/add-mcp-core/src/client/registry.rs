//! The table of supported agents.
//!
//! The registry is built once from [`PlatformDirs`] and never mutated. Callers
//! that need a variation (tests, mostly) take a modified copy through
//! [`AgentRegistry::with_descriptor`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{AgentDescriptor, PlatformDirs, TransformKind};
use crate::config::ConfigFormat;
use crate::mcp::McpTransport;
use crate::types::ConfigScope;

/// Registry of known agents, ordered by id.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
}

impl AgentRegistry {
    /// Build the agent table with paths resolved against `dirs`.
    pub fn new(dirs: &PlatformDirs) -> Self {
        let home = &dirs.home;
        let app = &dirs.app_config;
        let xdg = &dirs.xdg_config;

        let zed_global = if cfg!(windows) {
            app.join("Zed").join("settings.json")
        } else {
            xdg.join("zed").join("settings.json")
        };

        let agents = vec![
            AgentDescriptor {
                id: "antigravity",
                display_name: "Antigravity",
                global_config_path: home.join(".gemini/antigravity/mcp_config.json"),
                local_config_path: None,
                project_detect_paths: Vec::new(),
                config_key: "mcpServers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Passthrough,
            },
            AgentDescriptor {
                id: "claude-code",
                display_name: "Claude Code",
                global_config_path: home.join(".claude.json"),
                local_config_path: Some(PathBuf::from(".mcp.json")),
                project_detect_paths: paths(&[".mcp.json", ".claude"]),
                config_key: "mcpServers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Passthrough,
            },
            AgentDescriptor {
                id: "claude-desktop",
                display_name: "Claude Desktop",
                global_config_path: app.join("Claude").join("claude_desktop_config.json"),
                local_config_path: None,
                project_detect_paths: Vec::new(),
                config_key: "mcpServers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: BTreeSet::from([McpTransport::Stdio]),
                supports_headers: false,
                transform: TransformKind::Passthrough,
            },
            AgentDescriptor {
                id: "cline",
                display_name: "Cline",
                global_config_path: app.join(
                    "Code/User/globalStorage/saoudrizwan.claude-dev/settings/cline_mcp_settings.json",
                ),
                local_config_path: None,
                project_detect_paths: Vec::new(),
                config_key: "mcpServers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Passthrough,
            },
            AgentDescriptor {
                id: "codex",
                display_name: "Codex",
                global_config_path: dirs.codex_home.join("config.toml"),
                local_config_path: Some(PathBuf::from(".codex/config.toml")),
                project_detect_paths: paths(&[".codex"]),
                config_key: "mcp_servers",
                local_config_key: None,
                format: ConfigFormat::Toml,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Codex,
            },
            AgentDescriptor {
                id: "cursor",
                display_name: "Cursor",
                global_config_path: home.join(".cursor/mcp.json"),
                local_config_path: Some(PathBuf::from(".cursor/mcp.json")),
                project_detect_paths: paths(&[".cursor"]),
                config_key: "mcpServers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Cursor,
            },
            AgentDescriptor {
                id: "gemini-cli",
                display_name: "Gemini CLI",
                global_config_path: home.join(".gemini/settings.json"),
                local_config_path: Some(PathBuf::from(".gemini/settings.json")),
                project_detect_paths: paths(&[".gemini"]),
                config_key: "mcpServers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Passthrough,
            },
            AgentDescriptor {
                id: "github-copilot-cli",
                display_name: "GitHub Copilot CLI",
                global_config_path: home.join(".copilot/mcp-config.json"),
                local_config_path: Some(PathBuf::from(".vscode/mcp.json")),
                project_detect_paths: Vec::new(),
                config_key: "mcpServers",
                local_config_key: Some("servers"),
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::CopilotCli,
            },
            AgentDescriptor {
                id: "goose",
                display_name: "Goose",
                global_config_path: xdg.join("goose/config.yaml"),
                local_config_path: None,
                project_detect_paths: Vec::new(),
                config_key: "extensions",
                local_config_key: None,
                format: ConfigFormat::Yaml,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Goose,
            },
            AgentDescriptor {
                id: "opencode",
                display_name: "OpenCode",
                global_config_path: xdg.join("opencode/opencode.json"),
                local_config_path: Some(PathBuf::from("opencode.json")),
                project_detect_paths: paths(&["opencode.json", ".opencode"]),
                config_key: "mcp",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::OpenCode,
            },
            AgentDescriptor {
                id: "vscode",
                display_name: "VS Code",
                global_config_path: app.join("Code/User/mcp.json"),
                local_config_path: Some(PathBuf::from(".vscode/mcp.json")),
                project_detect_paths: paths(&[".vscode"]),
                config_key: "servers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Passthrough,
            },
            AgentDescriptor {
                id: "zed",
                display_name: "Zed",
                global_config_path: zed_global,
                local_config_path: Some(PathBuf::from(".zed/settings.json")),
                project_detect_paths: paths(&[".zed"]),
                config_key: "context_servers",
                local_config_key: None,
                format: ConfigFormat::Json,
                supported_transports: all_transports(),
                supports_headers: true,
                transform: TransformKind::Zed,
            },
        ];

        Self { agents }
    }

    /// List all agent IDs.
    pub fn ids(&self) -> Vec<&'static str> {
        self.agents.iter().map(|a| a.id).collect()
    }

    /// Get an agent by ID.
    pub fn get(&self, id: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn all(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    /// Unknown ids support nothing.
    pub fn supports_scope(&self, id: &str, scope: ConfigScope) -> bool {
        self.get(id).is_some_and(|a| a.supports_scope(scope))
    }

    pub fn supports_transport(&self, id: &str, transport: McpTransport) -> bool {
        self.get(id).is_some_and(|a| a.supports_transport(transport))
    }

    pub fn supports_headers(&self, id: &str) -> bool {
        self.get(id).is_some_and(|a| a.supports_headers)
    }

    /// A copy of this registry with `descriptor` replacing the agent of the
    /// same id, or appended if the id is new.
    pub fn with_descriptor(&self, descriptor: AgentDescriptor) -> Self {
        let mut agents = self.agents.clone();
        match agents.iter_mut().find(|a| a.id == descriptor.id) {
            Some(slot) => *slot = descriptor,
            None => {
                agents.push(descriptor);
                agents.sort_by_key(|a| a.id);
            }
        }
        Self { agents }
    }

    /// Agents with at least one detection marker present under `cwd`.
    pub fn detect_project_agents(&self, cwd: &Path) -> Vec<&'static str> {
        self.agents
            .iter()
            .filter(|a| a.project_detect_paths.iter().any(|p| cwd.join(p).exists()))
            .map(|a| a.id)
            .collect()
    }
}

fn all_transports() -> BTreeSet<McpTransport> {
    BTreeSet::from([McpTransport::Stdio, McpTransport::Http, McpTransport::Sse])
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(&PlatformDirs::rooted_at(Path::new("/sandbox")))
    }

    #[test]
    fn test_default_agents_registered() {
        let ids = registry().ids();

        assert_eq!(
            ids,
            vec![
                "antigravity",
                "claude-code",
                "claude-desktop",
                "cline",
                "codex",
                "cursor",
                "gemini-cli",
                "github-copilot-cli",
                "goose",
                "opencode",
                "vscode",
                "zed",
            ]
        );
    }

    #[test]
    fn test_get_agent_by_id() {
        let registry = registry();

        let claude = registry.get("claude-code").expect("agent exists");
        assert_eq!(claude.display_name, "Claude Code");
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_scope_predicates() {
        let registry = registry();

        assert!(registry.supports_scope("claude-code", ConfigScope::Project));
        assert!(registry.supports_scope("goose", ConfigScope::Global));
        assert!(!registry.supports_scope("goose", ConfigScope::Project));
        assert!(!registry.supports_scope("claude-desktop", ConfigScope::Project));
        assert!(!registry.supports_scope("unknown", ConfigScope::Global));
    }

    #[test]
    fn test_transport_and_header_predicates() {
        let registry = registry();

        assert!(registry.supports_transport("claude-desktop", McpTransport::Stdio));
        assert!(!registry.supports_transport("claude-desktop", McpTransport::Http));
        assert!(!registry.supports_headers("claude-desktop"));
        assert!(registry.supports_transport("goose", McpTransport::Sse));
        assert!(registry.supports_headers("cursor"));
    }

    #[test]
    fn test_global_paths_follow_platform_dirs() {
        let registry = registry();

        assert_eq!(
            registry.get("codex").expect("codex").global_config_path,
            PathBuf::from("/sandbox/home/.codex/config.toml")
        );
        assert_eq!(
            registry.get("goose").expect("goose").global_config_path,
            PathBuf::from("/sandbox/home/.config/goose/config.yaml")
        );
        assert_eq!(
            registry.get("claude-code").expect("claude").global_config_path,
            PathBuf::from("/sandbox/home/.claude.json")
        );
    }

    #[test]
    fn test_copilot_uses_distinct_local_key() {
        let registry = registry();
        let copilot = registry.get("github-copilot-cli").expect("copilot");

        assert_eq!(copilot.config_key_for(ConfigScope::Global), "mcpServers");
        assert_eq!(copilot.config_key_for(ConfigScope::Project), "servers");
        assert_eq!(
            copilot.config_path_for(ConfigScope::Project, Path::new("/work")),
            PathBuf::from("/work/.vscode/mcp.json")
        );
    }

    #[test]
    fn test_project_request_falls_back_to_global_path() {
        let registry = registry();
        let goose = registry.get("goose").expect("goose");

        assert_eq!(goose.effective_scope(ConfigScope::Project), ConfigScope::Global);
        assert_eq!(
            goose.config_path_for(ConfigScope::Project, Path::new("/work")),
            goose.global_config_path
        );
    }

    #[test]
    fn test_with_descriptor_returns_copy() {
        let registry = registry();
        let mut custom = registry.get("cursor").expect("cursor").clone();
        custom.supports_headers = false;

        let modified = registry.with_descriptor(custom);

        assert!(!modified.supports_headers("cursor"));
        assert!(registry.supports_headers("cursor"));
        assert_eq!(modified.ids(), registry.ids());
    }

    #[test]
    fn test_detect_project_agents() {
        let temp_dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir(temp_dir.path().join(".cursor")).expect("mkdir");
        std::fs::write(temp_dir.path().join(".mcp.json"), "{}").expect("write");

        let detected = registry().detect_project_agents(temp_dir.path());

        assert_eq!(detected, vec!["claude-code", "cursor"]);
    }
}
