//! Builds the canonical [`ServerConfig`] from a classified source.
//!
//! - Remote targets become `{transport, url, headers?}` (transport defaults to HTTP)
//! - Raw commands are split on single spaces into `command` + `args`
//! - Packages are launched through `npx -y <package>`
//!
//! Command splitting has no shell-quote awareness: `node "my server.js"` yields
//! the arguments `"my` and `server.js"`. Arguments containing spaces cannot be
//! expressed through a raw command target.

use std::collections::BTreeMap;

use crate::source::{ParsedSource, SourceKind};

use super::spec::{RemoteTransport, ServerConfig};

/// Command used to launch package targets.
pub const PACKAGE_RUNNER: &str = "npx";

/// Options that shape the canonical record beyond what the target implies.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub transport: Option<RemoteTransport>,
    pub headers: BTreeMap<String, String>,
    /// Environment for local servers. Ignored for remote targets.
    pub env: BTreeMap<String, String>,
}

/// Build the canonical server record. Never fails.
pub fn build(parsed: &ParsedSource, opts: &BuildOptions) -> ServerConfig {
    let env = (!opts.env.is_empty()).then(|| opts.env.clone());

    match parsed.kind {
        SourceKind::Remote => ServerConfig::Remote {
            transport: opts.transport.unwrap_or_default(),
            url: parsed.value.clone(),
            headers: (!opts.headers.is_empty()).then(|| opts.headers.clone()),
        },
        SourceKind::Command => {
            let mut parts = parsed.value.split(' ').map(str::to_string);
            let command = parts.next().unwrap_or_default();
            ServerConfig::Local {
                command,
                args: parts.collect(),
                env,
            }
        }
        SourceKind::Package => ServerConfig::Local {
            command: PACKAGE_RUNNER.to_string(),
            args: vec!["-y".to_string(), parsed.value.clone()],
            env,
        },
    }
}

/// Parse a `Key: Value` header argument.
pub fn parse_header(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Parse a `KEY=VALUE` environment argument.
pub fn parse_env(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
