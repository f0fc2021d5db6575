//! End-to-end: raw target string to config file on disk.

mod support;

use std::collections::BTreeMap;

use serde_json::json;

use add_mcp_core::install::{InstallManyOptions, resolve_routing, validate_selection};
use add_mcp_core::mcp::{BuildOptions, build};
use add_mcp_core::source::{SourceKind, classify};

use support::{Sandbox, read_json};

#[test]
fn package_target_installs_into_claude_code_project() {
    let sandbox = Sandbox::new();

    let parsed = classify("mcp-server-postgres");
    assert_eq!(parsed.kind, SourceKind::Package);
    assert_eq!(parsed.inferred_name, "postgres");
    let server = build(&parsed, &BuildOptions::default());

    let agents = ["claude-code"];
    let preflight = validate_selection(&sandbox.registry, &agents, &server).expect("valid selection");
    let routing = resolve_routing(&sandbox.registry, &preflight.agents, None).expect("routing");
    let results = sandbox.installer().install_many(
        &parsed.inferred_name,
        &server,
        &preflight.agents,
        &InstallManyOptions {
            routing,
            cwd: sandbox.project.clone(),
        },
    );

    let result = &results["claude-code"];
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.path, sandbox.project.join(".mcp.json"));
    assert_eq!(
        read_json(&result.path),
        json!({"mcpServers": {"postgres": {"command": "npx", "args": ["-y", "mcp-server-postgres"]}}})
    );
}

#[test]
fn remote_target_with_headers_across_agents() {
    let sandbox = Sandbox::new();

    let parsed = classify("  https://mcp.neon.tech/mcp  ");
    assert_eq!(parsed.inferred_name, "neon");
    let server = build(
        &parsed,
        &BuildOptions {
            headers: BTreeMap::from([("X-Api-Key".to_string(), "k".to_string())]),
            ..BuildOptions::default()
        },
    );

    let agents = ["claude-desktop", "vscode", "zed"];
    let preflight = validate_selection(&sandbox.registry, &agents, &server).expect("valid selection");
    assert_eq!(preflight.agents, vec!["vscode", "zed"]);
    assert_eq!(preflight.skipped[0].agent_id, "claude-desktop");

    let routing = resolve_routing(&sandbox.registry, &preflight.agents, None).expect("routing");
    let results = sandbox.installer().install_many(
        &parsed.inferred_name,
        &server,
        &preflight.agents,
        &InstallManyOptions {
            routing,
            cwd: sandbox.project.clone(),
        },
    );

    assert_eq!(
        read_json(&sandbox.project.join(".vscode/mcp.json")),
        json!({"servers": {"neon": {
            "type": "http",
            "url": "https://mcp.neon.tech/mcp",
            "headers": {"X-Api-Key": "k"}
        }}})
    );
    assert_eq!(
        read_json(&results["zed"].path)["context_servers"]["neon"]["headers"],
        json!({"X-Api-Key": "k"})
    );
}

#[test]
fn command_target_keeps_arguments_in_order() {
    let sandbox = Sandbox::new();

    let parsed = classify("node /path/to/server.js --port 3000");
    assert_eq!(parsed.kind, SourceKind::Command);
    let server = build(&parsed, &BuildOptions::default());

    let result = sandbox.install(&parsed.inferred_name, &server, "gemini-cli", add_mcp_core::types::ConfigScope::Project);
    assert!(result.success, "{:?}", result.error);

    let doc = read_json(&result.path);
    assert_eq!(
        doc["mcpServers"][parsed.inferred_name.as_str()],
        json!({"command": "node", "args": ["/path/to/server.js", "--port", "3000"]})
    );
}
