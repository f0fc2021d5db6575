//! MCP server descriptions: the canonical record and how it is built.

pub mod builder;
pub mod spec;

pub use builder::{BuildOptions, PACKAGE_RUNNER, build, parse_env, parse_header};
pub use spec::{McpTransport, RemoteTransport, ServerConfig};
