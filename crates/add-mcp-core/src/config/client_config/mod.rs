//! Agent configuration file codecs.
//!
//! This module reads and writes third-party agent config files
//! (e.g. `~/.codex/config.toml`, `.vscode/mcp.json`, `goose/config.yaml`).
//! Every codec normalizes to a [`ConfigDocument`] and writes by deep-merging a
//! patch into whatever is already on disk.

mod json;
mod jsonc_edit;
mod toml;
mod yaml;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConfigDocument;
use super::key_path::get_map_at_key;
use crate::error::{ConfigError, Result};

pub use self::json::{JsonSerializer, JsonWriteStrategy, detect_indent};
pub use self::toml::TomlSerializer;
pub use self::yaml::YamlSerializer;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => f.write_str("JSON"),
            ConfigFormat::Yaml => f.write_str("YAML"),
            ConfigFormat::Toml => f.write_str("TOML"),
        }
    }
}

/// Reads and merge-writes one config file format.
pub trait ConfigSerializer: Send + Sync {
    /// Load a configuration file as a JSON-compatible map.
    ///
    /// Returns an empty map if the file does not exist.
    fn load(&self, path: &Path) -> Result<ConfigDocument>;

    /// Deep-merge `patch` into the file at `path` and persist the result.
    ///
    /// Creates parent directories if they don't exist.
    fn write(&self, path: &Path, patch: &ConfigDocument) -> Result<()>;

    /// Get the format this serializer handles.
    fn format(&self) -> ConfigFormat;
}

/// Create a serializer for the given format.
pub fn serializer_for_format(format: ConfigFormat) -> Box<dyn ConfigSerializer> {
    match format {
        ConfigFormat::Json => Box::new(JsonSerializer),
        ConfigFormat::Yaml => Box::new(YamlSerializer),
        ConfigFormat::Toml => Box::new(TomlSerializer),
    }
}

/// Read the map stored at a dotted `key`.
///
/// `Ok(None)` when the file or any segment of the key is missing.
pub fn read_map_at_key(
    config_path: &Path,
    key: &str,
    format: ConfigFormat,
) -> Result<Option<ConfigDocument>> {
    let root = serializer_for_format(format).load(config_path)?;
    Ok(get_map_at_key(&root, key).cloned())
}

/// File contents, or `None` when the file does not exist.
pub(crate) fn read_existing(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ConfigError::io("read config file", path, err)),
    }
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|err| ConfigError::io("create config directory", parent, err))?;
    }
    std::fs::write(path, content).map_err(|err| ConfigError::io("write config file", path, err))
}

/// Accept an object (or an empty document) at the root.
pub(crate) fn into_document(path: &Path, format: ConfigFormat, value: Value) -> Result<ConfigDocument> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ConfigDocument::new()),
        _ => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message: "expected an object at the document root".to_string(),
        }),
    }
}

pub(crate) fn parse_error(path: &Path, format: ConfigFormat, err: impl fmt::Display) -> ConfigError {
    ConfigError::Parse {
        path: path.to_path_buf(),
        format,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> ConfigDocument {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn load_nonexistent_file_returns_empty_map_for_every_format() {
        let path = Path::new("/nonexistent/path/config");
        for format in [ConfigFormat::Json, ConfigFormat::Yaml, ConfigFormat::Toml] {
            let result = serializer_for_format(format).load(path).expect("load should succeed");
            assert!(result.is_empty(), "{format} should load as empty");
        }
    }

    #[test]
    fn write_creates_parent_directories_for_every_format() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let patch = doc(json!({"key": "value"}));

        for (format, name) in [
            (ConfigFormat::Json, "config.json"),
            (ConfigFormat::Yaml, "config.yaml"),
            (ConfigFormat::Toml, "config.toml"),
        ] {
            let path = temp_dir.path().join("nested/deep").join(name);
            serializer_for_format(format)
                .write(&path, &patch)
                .expect("write should succeed");

            let content = std::fs::read_to_string(&path).expect("read file");
            assert!(content.contains("key"), "{format} output missing key");
        }
    }

    #[test]
    fn read_map_at_key_walks_nested_keys() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"a": {"b": {"srv": {"command": "x"}}}}"#).expect("write");

        let found = read_map_at_key(&path, "a.b", ConfigFormat::Json)
            .expect("read should succeed")
            .expect("key should exist");
        assert!(found.contains_key("srv"));

        let missing = read_map_at_key(&path, "a.c", ConfigFormat::Json).expect("read");
        assert!(missing.is_none());
    }

    #[test]
    fn serializer_for_format_returns_correct_type() {
        for format in [ConfigFormat::Json, ConfigFormat::Yaml, ConfigFormat::Toml] {
            assert_eq!(serializer_for_format(format).format(), format);
        }
    }
}
