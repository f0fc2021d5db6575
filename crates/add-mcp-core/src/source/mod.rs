//! Classification of the raw target string a user hands us.
//!
//! A target is one of:
//! - a remote server URL (`https://mcp.example.com/mcp`)
//! - a raw launch command (`node ./server.js --port 3000`)
//! - an installable npm package (`@scope/name@1.2.3`, `mcp-server-postgres`)
//!
//! Classification is total: every input maps to some [`ParsedSource`].

mod naming;


pub use naming::{
    DEFAULT_SERVER_NAME, infer_name_from_command, infer_name_from_package, infer_name_from_url,
};

/// Executables that mark a target as a launch command.
pub const LAUNCHERS: &[&str] = &[
    "npx", "node", "python", "python3", "uvx", "uv", "bunx", "bun", "deno", "docker", "pnpm",
    "pnpx", "yarn",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Remote,
    Package,
    Command,
}

/// A classified target. `value` is the trimmed input, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    pub kind: SourceKind,
    pub value: String,
    pub inferred_name: String,
}

impl ParsedSource {
    pub fn is_remote(&self) -> bool {
        self.kind == SourceKind::Remote
    }
}

/// Classify a raw target string. First matching rule wins.
pub fn classify(raw: &str) -> ParsedSource {
    let value = raw.trim();

    let (kind, inferred_name) = if is_remote_url(value) {
        (SourceKind::Remote, infer_name_from_url(value))
    } else if is_command(value) {
        (SourceKind::Command, infer_name_from_command(value))
    } else {
        if !is_package_spec(value) {
            tracing::debug!(
                input = value,
                "Target is not a recognised package name; treating it as one anyway"
            );
        }
        (SourceKind::Package, infer_name_from_package(value))
    };

    ParsedSource {
        kind,
        value: value.to_string(),
        inferred_name,
    }
}

fn is_remote_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn is_command(value: &str) -> bool {
    let launcher_prefixed = LAUNCHERS
        .iter()
        .any(|launcher| value.strip_prefix(*launcher).is_some_and(|rest| rest.starts_with(' ')));
    launcher_prefixed || value.contains(' ')
}

/// `@scope/name[@version]` or `name[@version]`.
pub fn is_package_spec(value: &str) -> bool {
    let (name, version) = split_version(value);
    if version.is_some_and(|v| v.is_empty() || v.chars().any(char::is_whitespace)) {
        return false;
    }
    match name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, pkg)) => is_package_segment(scope) && is_package_segment(pkg),
            None => false,
        },
        None => is_package_segment(name),
    }
}

/// Split `name@version` at the last `@` that is not the scope marker.
pub(crate) fn split_version(value: &str) -> (&str, Option<&str>) {
    match value.rfind('@') {
        Some(idx) if idx > 0 => (&value[..idx], Some(&value[idx + 1..])),
        _ => (value, None),
    }
}

fn is_package_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphanumeric() || first == '-' || first == '~') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
}
