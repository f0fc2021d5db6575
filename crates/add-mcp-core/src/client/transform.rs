//! Per-agent entry shapes.
//!
//! Each agent family stores a server entry differently. Some fields are
//! omitted when empty while others are always written as an empty map.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::mcp::spec::{non_empty, string_map};
use crate::mcp::{RemoteTransport, ServerConfig};

/// Timeout, in seconds, Goose applies to an extension.
const GOOSE_TIMEOUT_SECS: u64 = 300;

/// How an agent's on-disk entry is derived from the canonical record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// The canonical record, unchanged.
    #[default]
    Passthrough,
    /// Goose `extensions` entries (YAML).
    Goose,
    /// Zed `context_servers` entries.
    Zed,
    /// OpenCode `mcp` entries.
    OpenCode,
    /// Codex `mcp_servers` tables (TOML).
    Codex,
    /// Cursor: remote entries carry no `type`.
    Cursor,
    /// GitHub Copilot CLI: the project file shares the VS Code schema, the
    /// global file adds a `tools` allow-list.
    CopilotCli,
}

/// Where the entry is going to be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformContext {
    /// True when writing the agent's project file.
    pub local: bool,
}

/// Render `server` in the shape `kind` expects.
pub fn transform(kind: TransformKind, name: &str, server: &ServerConfig, ctx: TransformContext) -> Value {
    match kind {
        TransformKind::Passthrough => server.to_value(),
        TransformKind::Goose => render_goose(name, server),
        TransformKind::Zed => render_zed(server),
        TransformKind::OpenCode => render_opencode(server),
        TransformKind::Codex => render_codex(server),
        TransformKind::Cursor => render_cursor(server),
        TransformKind::CopilotCli if ctx.local => server.to_value(),
        TransformKind::CopilotCli => render_copilot_global(server),
    }
}

fn render_goose(name: &str, server: &ServerConfig) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), json!(name));
    match server {
        ServerConfig::Remote {
            transport,
            url,
            headers,
        } => {
            let kind = match transport {
                RemoteTransport::Http => "streamable_http",
                RemoteTransport::Sse => "sse",
            };
            obj.insert("type".to_string(), json!(kind));
            obj.insert("url".to_string(), json!(url));
            if let Some(headers) = non_empty(headers) {
                obj.insert("headers".to_string(), string_map(headers));
            }
            obj.insert("enabled".to_string(), json!(true));
        }
        ServerConfig::Local { command, args, env } => {
            obj.insert("cmd".to_string(), json!(command));
            obj.insert("args".to_string(), json!(args));
            obj.insert("enabled".to_string(), json!(true));
            obj.insert("envs".to_string(), map_or_empty(env));
            obj.insert("type".to_string(), json!("stdio"));
        }
    }
    obj.insert("timeout".to_string(), json!(GOOSE_TIMEOUT_SECS));
    Value::Object(obj)
}

fn render_zed(server: &ServerConfig) -> Value {
    match server {
        ServerConfig::Remote {
            transport,
            url,
            headers,
        } => json!({
            "source": "custom",
            "type": transport.as_str(),
            "url": url,
            "headers": map_or_empty(headers),
        }),
        ServerConfig::Local { command, args, env } => json!({
            "source": "custom",
            "command": command,
            "args": args,
            "env": map_or_empty(env),
        }),
    }
}

fn render_opencode(server: &ServerConfig) -> Value {
    match server {
        ServerConfig::Remote { url, headers, .. } => {
            let mut obj = Map::new();
            obj.insert("type".to_string(), json!("remote"));
            obj.insert("url".to_string(), json!(url));
            obj.insert("enabled".to_string(), json!(true));
            if let Some(headers) = non_empty(headers) {
                obj.insert("headers".to_string(), string_map(headers));
            }
            Value::Object(obj)
        }
        ServerConfig::Local { command, args, env } => json!({
            "type": "local",
            "command": command,
            "args": args,
            "enabled": true,
            "environment": map_or_empty(env),
        }),
    }
}

// Codex tables share the canonical keys.
fn render_codex(server: &ServerConfig) -> Value {
    server.to_value()
}

fn render_cursor(server: &ServerConfig) -> Value {
    match server {
        ServerConfig::Remote { url, headers, .. } => {
            let mut obj = Map::new();
            obj.insert("url".to_string(), json!(url));
            if let Some(headers) = non_empty(headers) {
                obj.insert("headers".to_string(), string_map(headers));
            }
            Value::Object(obj)
        }
        ServerConfig::Local { .. } => server.to_value(),
    }
}

fn render_copilot_global(server: &ServerConfig) -> Value {
    let mut obj = Map::new();
    match server {
        ServerConfig::Remote {
            transport,
            url,
            headers,
        } => {
            obj.insert("type".to_string(), json!(transport.as_str()));
            obj.insert("url".to_string(), json!(url));
            obj.insert("tools".to_string(), json!(["*"]));
            if let Some(headers) = non_empty(headers) {
                obj.insert("headers".to_string(), string_map(headers));
            }
        }
        ServerConfig::Local { command, args, env } => {
            obj.insert("type".to_string(), json!("stdio"));
            obj.insert("command".to_string(), json!(command));
            obj.insert("args".to_string(), json!(args));
            obj.insert("tools".to_string(), json!(["*"]));
            if let Some(env) = non_empty(env) {
                obj.insert("env".to_string(), string_map(env));
            }
        }
    }
    Value::Object(obj)
}

fn map_or_empty(map: &Option<BTreeMap<String, String>>) -> Value {
    non_empty(map).map(string_map).unwrap_or_else(|| json!({}))
}
