//! Canonical MCP server description shared by every agent transform.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Any transport an agent may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpTransport {
    Stdio,
    Http,
    Sse,
}

impl McpTransport {
    pub fn as_str(self) -> &'static str {
        match self {
            McpTransport::Stdio => "stdio",
            McpTransport::Http => "http",
            McpTransport::Sse => "sse",
        }
    }
}

impl fmt::Display for McpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport of a remote server. Local servers are always stdio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteTransport {
    #[default]
    Http,
    Sse,
}

impl RemoteTransport {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteTransport::Http => "http",
            RemoteTransport::Sse => "sse",
        }
    }
}

impl From<RemoteTransport> for McpTransport {
    fn from(transport: RemoteTransport) -> Self {
        match transport {
            RemoteTransport::Http => McpTransport::Http,
            RemoteTransport::Sse => McpTransport::Sse,
        }
    }
}

impl std::str::FromStr for RemoteTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(RemoteTransport::Http),
            "sse" => Ok(RemoteTransport::Sse),
            other => Err(format!("Unknown transport '{other}' (expected http or sse)")),
        }
    }
}

/// A server as the user asked for it, before any agent-specific shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerConfig {
    Remote {
        transport: RemoteTransport,
        url: String,
        headers: Option<BTreeMap<String, String>>,
    },
    Local {
        command: String,
        args: Vec<String>,
        env: Option<BTreeMap<String, String>>,
    },
}

impl ServerConfig {
    pub fn transport(&self) -> McpTransport {
        match self {
            ServerConfig::Remote { transport, .. } => (*transport).into(),
            ServerConfig::Local { .. } => McpTransport::Stdio,
        }
    }

    /// Headers, if any were attached. Always `None` for local servers.
    pub fn headers(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ServerConfig::Remote { headers, .. } => headers.as_ref().filter(|h| !h.is_empty()),
            ServerConfig::Local { .. } => None,
        }
    }

    /// Render the canonical record: `{type, url, headers?}` or `{command, args, env?}`.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        match self {
            ServerConfig::Remote {
                transport,
                url,
                headers,
            } => {
                obj.insert("type".to_string(), json!(transport.as_str()));
                obj.insert("url".to_string(), json!(url));
                if let Some(headers) = non_empty(headers) {
                    obj.insert("headers".to_string(), string_map(headers));
                }
            }
            ServerConfig::Local { command, args, env } => {
                obj.insert("command".to_string(), json!(command));
                obj.insert("args".to_string(), json!(args));
                if let Some(env) = non_empty(env) {
                    obj.insert("env".to_string(), string_map(env));
                }
            }
        }
        Value::Object(obj)
    }
}

pub(crate) fn non_empty(
    map: &Option<BTreeMap<String, String>>,
) -> Option<&BTreeMap<String, String>> {
    map.as_ref().filter(|m| !m.is_empty())
}

pub(crate) fn string_map(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}
