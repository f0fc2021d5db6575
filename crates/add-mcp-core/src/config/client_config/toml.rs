//! TOML serializer for client configuration files.
//!
//! Reads hand back a JSON view of the file. Writes convert only the patch to
//! TOML and merge it into the parsed table, so datetimes and non-finite
//! floats elsewhere in the file keep their types. The whole table is then
//! re-serialized; comments are not preserved.

use std::path::Path;

use serde_json::{Map, Value};

use super::{ConfigFormat, ConfigSerializer, parse_error, read_existing, write_file};
use crate::config::ConfigDocument;
use crate::error::{ConfigError, Result};

/// TOML configuration file serializer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlSerializer;

impl ConfigSerializer for TomlSerializer {
    fn load(&self, path: &Path) -> Result<ConfigDocument> {
        load_table(path).map(toml_table_to_json)
    }

    fn write(&self, path: &Path, patch: &ConfigDocument) -> Result<()> {
        let mut table = load_table(path)?;
        merge_tables(&mut table, &json_map_to_toml(patch)?);

        let content = ::toml::to_string_pretty(&table).map_err(serialize_error)?;
        tracing::debug!(path = %path.display(), "Writing TOML config");
        write_file(path, &content)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Toml
    }
}

fn load_table(path: &Path) -> Result<::toml::Table> {
    let Some(content) = read_existing(path)? else {
        return Ok(::toml::Table::new());
    };
    ::toml::from_str(&content).map_err(|err| parse_error(path, ConfigFormat::Toml, err))
}

/// Same rules as [`crate::config::deep_merge`], applied to TOML tables.
fn merge_tables(target: &mut ::toml::Table, patch: &::toml::Table) {
    for (key, incoming) in patch {
        match (target.get_mut(key), incoming) {
            (Some(::toml::Value::Table(existing)), ::toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

fn toml_table_to_json(table: ::toml::Table) -> Map<String, Value> {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json_value(value)))
        .collect()
}

/// Convert a single TOML value to a JSON value for reading. Datetimes and
/// non-finite floats have no JSON form and are read back as strings.
fn toml_to_json_value(toml_value: ::toml::Value) -> Value {
    match toml_value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::Number(i.into()),
        ::toml::Value::Float(f) => {
            serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string()))
        }
        ::toml::Value::Boolean(b) => Value::Bool(b),
        ::toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        ::toml::Value::Array(arr) => {
            Value::Array(arr.into_iter().map(toml_to_json_value).collect())
        }
        ::toml::Value::Table(table) => Value::Object(toml_table_to_json(table)),
    }
}

/// Convert a patch to a TOML table. Nulls have no TOML form and are dropped.
fn json_map_to_toml(map: &Map<String, Value>) -> Result<::toml::Table> {
    let mut table = ::toml::Table::new();
    for (key, value) in map {
        if let Some(value) = json_to_toml_value(value)? {
            table.insert(key.clone(), value);
        }
    }
    Ok(table)
}

fn json_to_toml_value(json_value: &Value) -> Result<Option<::toml::Value>> {
    let value = match json_value {
        Value::Null => return Ok(None),
        Value::Bool(b) => ::toml::Value::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ::toml::Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                ::toml::Value::Float(f)
            } else {
                return Err(serialize_error(format!("unsupported number {n}")));
            }
        }
        Value::String(s) => ::toml::Value::String(s.clone()),
        Value::Array(arr) => {
            let mut items = Vec::with_capacity(arr.len());
            for item in arr {
                if let Some(item) = json_to_toml_value(item)? {
                    items.push(item);
                }
            }
            ::toml::Value::Array(items)
        }
        Value::Object(obj) => ::toml::Value::Table(json_map_to_toml(obj)?),
    };
    Ok(Some(value))
}

fn serialize_error(err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Serialize {
        format: ConfigFormat::Toml,
        message: err.to_string(),
    }
}
