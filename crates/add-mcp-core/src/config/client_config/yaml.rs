//! YAML serializer for client configuration files.
//!
//! Writes convert only the patch to YAML and merge it into the parsed
//! mapping, so unrelated values keep their YAML types (`.inf`, non-string
//! keys). The merged document is re-serialized with 2-space indentation.
//! Comments in an existing file are not preserved.

use std::path::Path;

use serde_json::{Map, Value};
use serde_yaml::{Mapping, Value as YamlValue};

use super::{ConfigFormat, ConfigSerializer, parse_error, read_existing, write_file};
use crate::config::ConfigDocument;
use crate::error::{ConfigError, Result};

/// YAML configuration file serializer.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlSerializer;

impl ConfigSerializer for YamlSerializer {
    fn load(&self, path: &Path) -> Result<ConfigDocument> {
        load_mapping(path).map(mapping_to_json)
    }

    fn write(&self, path: &Path, patch: &ConfigDocument) -> Result<()> {
        let mut mapping = load_mapping(path)?;
        let patch = match serde_yaml::to_value(patch).map_err(serialize_error)? {
            YamlValue::Mapping(patch) => patch,
            other => return Err(serialize_error(format!("patch became {other:?}"))),
        };
        merge_mappings(&mut mapping, &patch);

        let content = serde_yaml::to_string(&mapping).map_err(serialize_error)?;
        tracing::debug!(path = %path.display(), "Writing YAML config");
        write_file(path, &content)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Yaml
    }
}

fn load_mapping(path: &Path) -> Result<Mapping> {
    let Some(content) = read_existing(path)? else {
        return Ok(Mapping::new());
    };
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<YamlValue>(&content).map_err(|err| parse_error(path, ConfigFormat::Yaml, err))? {
        YamlValue::Mapping(mapping) => Ok(mapping),
        YamlValue::Null => Ok(Mapping::new()),
        _ => Err(parse_error(
            path,
            ConfigFormat::Yaml,
            "expected a mapping at the document root",
        )),
    }
}

/// Same rules as [`crate::config::deep_merge`], applied to YAML mappings.
fn merge_mappings(target: &mut Mapping, patch: &Mapping) {
    for (key, incoming) in patch {
        match (target.get_mut(key), incoming) {
            (Some(YamlValue::Mapping(existing)), YamlValue::Mapping(incoming)) => {
                merge_mappings(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

fn mapping_to_json(mapping: Mapping) -> Map<String, Value> {
    mapping
        .into_iter()
        .map(|(key, value)| (key_to_string(key), yaml_to_json(value)))
        .collect()
}

/// JSON view of a YAML value for reading. Values JSON cannot hold
/// (non-finite floats) come back as their YAML text.
fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string()))
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => Value::Object(mapping_to_json(mapping)),
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn serialize_error(err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Serialize {
        format: ConfigFormat::Yaml,
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
    fn yaml_load_existing_file_parses_correctly() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "GOOSE_MODEL: gpt-4o\nextensions:\n  developer:\n    enabled: true\n    type: builtin\n",
        )
        .expect("write file");

        let result = YamlSerializer.load(&path).expect("load should succeed");

        assert_eq!(result["GOOSE_MODEL"], json!("gpt-4o"));
        assert_eq!(result["extensions"]["developer"]["enabled"], json!(true));
    }

    #[test]
    fn yaml_empty_file_is_empty_document() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "\n").expect("write file");

        assert!(YamlSerializer.load(&path).expect("load").is_empty());
    }

    #[test]
    fn yaml_scalar_root_is_a_parse_error() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "just a string\n").expect("write file");

        assert!(matches!(
            YamlSerializer.load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn yaml_write_merges_and_keeps_other_keys() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "GOOSE_PROVIDER: openai\nextensions:\n  developer:\n    enabled: true\n",
        )
        .expect("write file");

        YamlSerializer
            .write(
                &path,
                &doc(json!({"extensions": {"neon": {"name": "neon", "timeout": 300}}})),
            )
            .expect("write");

        let reloaded = YamlSerializer.load(&path).expect("load");
        assert_eq!(
            Value::Object(reloaded),
            json!({
                "GOOSE_PROVIDER": "openai",
                "extensions": {
                    "developer": {"enabled": true},
                    "neon": {"name": "neon", "timeout": 300}
                }
            })
        );

        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains("\n  neon:\n    name: neon\n"));
    }

    #[test]
    fn yaml_write_keeps_unrelated_value_types() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "GOOSE_TEMPERATURE: .inf\nGOOSE_MAX_TURNS: 50\nGOOSE_TOOLSHIM: false\nratio: 0.75\n1: one\n",
        )
        .expect("write file");

        YamlSerializer
            .write(&path, &doc(json!({"extensions": {"pg": {"cmd": "npx"}}})))
            .expect("write");

        let content = std::fs::read_to_string(&path).expect("read");
        let raw: YamlValue = serde_yaml::from_str(&content).expect("valid yaml");
        assert_eq!(raw["GOOSE_TEMPERATURE"].as_f64(), Some(f64::INFINITY));
        assert_eq!(raw["GOOSE_MAX_TURNS"].as_u64(), Some(50));
        assert_eq!(raw["GOOSE_TOOLSHIM"].as_bool(), Some(false));
        assert_eq!(raw["ratio"].as_f64(), Some(0.75));
        let mapping = raw.as_mapping().expect("mapping root");
        assert!(mapping.iter().any(|(key, value)| key.as_u64() == Some(1) && value.as_str() == Some("one")));
        assert_eq!(raw["extensions"]["pg"]["cmd"].as_str(), Some("npx"));
    }

    #[test]
    fn yaml_load_accepts_non_string_keys() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "1: one\ntrue: yes\nlimit: .inf\n").expect("write file");

        let loaded = YamlSerializer.load(&path).expect("load");

        assert_eq!(loaded["1"], json!("one"));
        assert_eq!(loaded["true"], json!("yes"));
        assert_eq!(loaded["limit"], json!(".inf"));
    }
}
