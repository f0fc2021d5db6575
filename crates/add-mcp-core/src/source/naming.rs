//! Human-friendly server name inference.

use std::path::Path;

use url::{Host, Url};

use super::{LAUNCHERS, split_version};

/// Name used when nothing better can be derived from the target.
pub const DEFAULT_SERVER_NAME: &str = "mcp-server";

const COMMON_TLDS: &[&str] = &[
    "com", "org", "net", "io", "dev", "ai", "tech", "co", "app", "cloud", "sh", "run",
];

const NOISE_LABELS: &[&str] = &["mcp", "api", "www"];

/// `https://mcp.neon.tech/mcp` -> `neon`, `https://api.company.com/mcp/v1` -> `company`.
pub fn infer_name_from_url(value: &str) -> String {
    let Ok(url) = Url::parse(value) else {
        return DEFAULT_SERVER_NAME.to_string();
    };
    // IP literals carry no name.
    let Some(Host::Domain(host)) = url.host() else {
        return DEFAULT_SERVER_NAME.to_string();
    };

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if let Some(label) = labels
        .iter()
        .copied()
        .find(|label| !COMMON_TLDS.contains(label) && !NOISE_LABELS.contains(label))
    {
        return label.to_string();
    }

    if labels.len() >= 2 {
        return labels[labels.len() - 2].to_string();
    }
    DEFAULT_SERVER_NAME.to_string()
}

/// `@modelcontextprotocol/server-postgres@1.0.0` -> `postgres`.
pub fn infer_name_from_package(value: &str) -> String {
    let (name, _) = split_version(value);

    let name = match name.strip_prefix('@') {
        Some(scoped) => scoped.split_once('/').map_or(scoped, |(_, pkg)| pkg),
        None => name,
    };

    let name = name
        .strip_prefix("mcp-server-")
        .or_else(|| name.strip_prefix("server-"))
        .unwrap_or(name);
    let name = name.strip_suffix("-mcp").unwrap_or(name);

    if name.is_empty() {
        DEFAULT_SERVER_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Name from the first positional token after the launcher and its flags.
pub fn infer_name_from_command(value: &str) -> String {
    let mut tokens = value.split(' ').filter(|t| !t.is_empty()).peekable();
    if tokens.peek().is_some_and(|first| LAUNCHERS.contains(first)) {
        tokens.next();
    }

    match tokens.find(|token| !token.starts_with('-')) {
        Some(token) if is_path_like(token) => Path::new(token)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(infer_name_from_package)
            .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
        Some(token) => infer_name_from_package(token),
        None => DEFAULT_SERVER_NAME.to_string(),
    }
}

fn is_path_like(token: &str) -> bool {
    !token.starts_with('@') && (token.contains('/') || token.contains('\\'))
}
