//! add-mcp - install an MCP server into your coding agents
//!
//! Usage:
//!   add-mcp https://mcp.neon.tech/mcp            # agents detected in this project
//!   add-mcp mcp-server-postgres -a cursor -g     # one agent, global config
//!   add-mcp "node ./server.js --port 3000" --all
//!   add-mcp --list-agents

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use add_mcp_core::client::{AgentRegistry, PlatformDirs};
use add_mcp_core::error::ValidationError;
use add_mcp_core::install::{
    InstallManyOptions, InstallResult, InstallSummary, Installer, Preflight, resolve_routing,
    validate_selection,
};
use add_mcp_core::mcp::{BuildOptions, RemoteTransport, ServerConfig, build, parse_env, parse_header};
use add_mcp_core::source::classify;
use add_mcp_core::types::ConfigScope;

#[derive(Parser)]
#[command(name = "add-mcp")]
#[command(about = "Install MCP servers into coding agents", long_about = None)]
struct Cli {
    /// Server to install: a URL, an npm package, or a launch command
    #[arg(required_unless_present = "list_agents")]
    target: Option<String>,

    /// Agent to install into (repeatable)
    #[arg(short, long = "agent", value_name = "ID")]
    agents: Vec<String>,

    /// Install into every known agent
    #[arg(long, conflicts_with = "agents")]
    all: bool,

    /// Write to global (user-level) config files
    #[arg(short, long, conflicts_with = "project")]
    global: bool,

    /// Write to project config files where the agent has one
    #[arg(short, long)]
    project: bool,

    /// Transport for remote servers (http or sse)
    #[arg(short, long)]
    transport: Option<RemoteTransport>,

    /// Header for remote servers, as "Key: Value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// Environment variable for local servers, as KEY=VALUE (repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Server name (defaults to one inferred from the target)
    #[arg(short, long)]
    name: Option<String>,

    /// List supported agents and exit
    #[arg(long)]
    list_agents: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable lines
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "add_mcp=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let registry = AgentRegistry::new(&PlatformDirs::from_env());

    if cli.list_agents {
        print_agents(&registry, cli.format)?;
        return Ok(());
    }

    run_install(&cli, &registry)
}

fn run_install(cli: &Cli, registry: &AgentRegistry) -> Result<()> {
    let target = cli.target.as_deref().context("Missing install target")?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    let parsed = classify(target);
    let options = build_options(cli)?;
    if !parsed.is_remote() && (cli.transport.is_some() || !options.headers.is_empty()) {
        tracing::warn!("--transport and --header only apply to remote servers; ignoring them");
    }
    if parsed.is_remote() && !options.env.is_empty() {
        tracing::warn!("--env only applies to local servers; ignoring it");
    }
    let server = build(&parsed, &options);
    let name = cli
        .name
        .clone()
        .unwrap_or_else(|| parsed.inferred_name.clone());

    let agent_ids = select_agents(cli, registry, &cwd)?;
    let preflight = validate_selection(registry, &agent_ids, &server)?;
    let requested = if cli.global {
        Some(ConfigScope::Global)
    } else if cli.project {
        Some(ConfigScope::Project)
    } else {
        None
    };
    let routing = resolve_routing(registry, &preflight.agents, requested)?;

    let results = Installer::new(registry).install_many(
        &name,
        &server,
        &preflight.agents,
        &InstallManyOptions { routing, cwd },
    );

    print_results(cli.format, &name, &server, &preflight, &results)?;

    let summary = InstallSummary::new(&results);
    let failed = summary.failed().count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} agent installs failed", results.len());
    }
    Ok(())
}

fn build_options(cli: &Cli) -> Result<BuildOptions> {
    let headers = cli
        .headers
        .iter()
        .map(|raw| {
            parse_header(raw).with_context(|| format!("Invalid header '{raw}', expected 'Key: Value'"))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;
    let env = cli
        .env
        .iter()
        .map(|raw| parse_env(raw).with_context(|| format!("Invalid env '{raw}', expected KEY=VALUE")))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(BuildOptions {
        transport: cli.transport,
        headers,
        env,
    })
}

/// `--agent` wins, then `--all`, then whatever the project looks like it uses.
fn select_agents(cli: &Cli, registry: &AgentRegistry, cwd: &Path) -> Result<Vec<String>> {
    let ids: Vec<String> = if !cli.agents.is_empty() {
        cli.agents.clone()
    } else if cli.all {
        registry.ids().into_iter().map(String::from).collect()
    } else {
        let detected = registry.detect_project_agents(cwd);
        if !detected.is_empty() {
            tracing::info!(agents = ?detected, "Using agents detected in this project");
        }
        detected.into_iter().map(String::from).collect()
    };

    if ids.is_empty() {
        return Err(ValidationError::NoAgentsSelected)
            .context("No agents selected; pass --agent <ID> or --all (see --list-agents)");
    }
    Ok(ids)
}

fn print_results(
    format: OutputFormat,
    name: &str,
    server: &ServerConfig,
    preflight: &Preflight,
    results: &BTreeMap<String, InstallResult>,
) -> Result<()> {
    let summary = InstallSummary::new(results);

    match format {
        OutputFormat::Table => {
            println!("Installing '{}' ({})", name, server.transport());
            for skipped in &preflight.skipped {
                println!("  - {}: skipped, {}", skipped.agent_id, skipped.reason);
            }
            for result in results.values() {
                match &result.error {
                    None => println!("✓ {}: {}", result.agent_id, result.path.display()),
                    Some(error) => println!("✗ {}: {}", result.agent_id, error),
                }
            }
            println!(
                "{} succeeded, {} failed",
                summary.succeeded().count(),
                summary.failed().count()
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": name,
                "server": server.to_value(),
                "results": results.values().map(|r| serde_json::json!({
                    "agent": r.agent_id,
                    "success": r.success,
                    "path": r.path.display().to_string(),
                    "error": r.error,
                })).collect::<Vec<_>>(),
                "skipped": preflight.skipped.iter().map(|s| serde_json::json!({
                    "agent": s.agent_id,
                    "reason": s.reason,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_agents(registry: &AgentRegistry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{:<20} {:<20} {:<6} {:<20} Global config", "ID", "Name", "Format", "Project config");
            println!("{}", "-".repeat(100));
            for agent in registry.all() {
                let local = agent
                    .local_config_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<20} {:<20} {:<6} {:<20} {}",
                    agent.id,
                    agent.display_name,
                    agent.format.to_string(),
                    local,
                    agent.global_config_path.display()
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = registry
                .all()
                .iter()
                .map(|agent| {
                    serde_json::json!({
                        "id": agent.id,
                        "name": agent.display_name,
                        "format": agent.format,
                        "globalConfig": agent.global_config_path.display().to_string(),
                        "projectConfig": agent.local_config_path.as_ref().map(|p| p.display().to_string()),
                        "transports": agent.supported_transports,
                        "headers": agent.supports_headers,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_install_flags() {
        let cli = Cli::try_parse_from([
            "add-mcp",
            "https://mcp.neon.tech/mcp",
            "-a",
            "cursor",
            "--agent",
            "zed",
            "-g",
            "-t",
            "sse",
            "-H",
            "Authorization: Bearer x",
        ])
        .expect("valid args");

        assert_eq!(cli.target.as_deref(), Some("https://mcp.neon.tech/mcp"));
        assert_eq!(cli.agents, vec!["cursor", "zed"]);
        assert!(cli.global);
        assert_eq!(cli.transport, Some(RemoteTransport::Sse));

        let options = build_options(&cli).expect("options");
        assert_eq!(options.headers["Authorization"], "Bearer x");
    }

    #[test]
    fn cli_rejects_conflicting_scopes() {
        assert!(Cli::try_parse_from(["add-mcp", "pkg", "-g", "-p"]).is_err());
    }

    #[test]
    fn cli_requires_target_unless_listing() {
        assert!(Cli::try_parse_from(["add-mcp"]).is_err());
        let cli = Cli::try_parse_from(["add-mcp", "--list-agents"]).expect("valid args");
        assert!(cli.list_agents);
    }

    #[test]
    fn malformed_env_is_rejected() {
        let cli = Cli::try_parse_from(["add-mcp", "pkg", "-e", "NOVALUE"]).expect("valid args");
        assert!(build_options(&cli).is_err());
    }
}
