//! Writing a server entry into agent config files.

mod installer;
pub mod preflight;

pub use installer::{
    InstallManyOptions, InstallOptions, InstallResult, InstallSummary, Installer,
};
pub use preflight::{Preflight, SkippedAgent, resolve_routing, validate_selection};
