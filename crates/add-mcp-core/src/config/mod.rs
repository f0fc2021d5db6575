//! Reading and merging agent configuration documents.
//!
//! Every format is normalized to a [`ConfigDocument`] (a JSON-compatible map),
//! so merge logic and config-key resolution are format-agnostic.

pub mod client_config;
pub mod key_path;
pub mod merge;

use serde_json::{Map, Value};

pub use client_config::{ConfigFormat, ConfigSerializer, serializer_for_format};
pub use key_path::{get_map_at_key, nest_under_key};
pub use merge::deep_merge;

/// In-memory form of an agent config file, whatever its on-disk format.
pub type ConfigDocument = Map<String, Value>;
