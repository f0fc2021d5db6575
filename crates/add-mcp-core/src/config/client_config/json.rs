//! JSON (and JSON-with-comments) serializer for client configuration files.

use std::path::Path;

use serde_json::Value;

use super::jsonc_edit;
use super::{ConfigFormat, ConfigSerializer, into_document, parse_error, read_existing, write_file};
use crate::config::{ConfigDocument, deep_merge};
use crate::error::{ConfigError, Result};

/// Indent used when nothing can be detected from an existing file.
const DEFAULT_INDENT: &str = "  ";

/// JSON configuration file serializer.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

/// How merged JSON reaches the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonWriteStrategy {
    /// Edit the original text in place; comments and formatting elsewhere survive.
    StructuralPatch,
    /// Pretty-print the whole merged document with a 2-space indent, keeping
    /// CRLF line endings if the original used them.
    FullRewrite,
}

impl JsonWriteStrategy {
    /// Produce the new file contents for `merged`, the result of merging `patch`
    /// into the document parsed from `original`.
    pub fn render(
        self,
        original: &str,
        patch: &ConfigDocument,
        merged: &ConfigDocument,
    ) -> Result<String> {
        match self {
            JsonWriteStrategy::StructuralPatch => {
                let indent = detect_indent(original);
                let patched = jsonc_edit::patch_document(original, patch, &indent)
                    .map_err(serialize_error)?;
                let reparsed = parse_jsonc(&patched).map_err(serialize_error)?;
                if reparsed != Value::Object(merged.clone()) {
                    return Err(serialize_error(
                        "patched text does not match the merged document",
                    ));
                }
                Ok(patched)
            }
            JsonWriteStrategy::FullRewrite => {
                let mut content = serde_json::to_string_pretty(merged).map_err(serialize_error)?;
                content.push('\n');
                if original.contains("\r\n") {
                    content = content.replace('\n', "\r\n");
                }
                Ok(content)
            }
        }
    }
}

impl ConfigSerializer for JsonSerializer {
    fn load(&self, path: &Path) -> Result<ConfigDocument> {
        match read_existing(path)? {
            Some(content) => parse_document(path, &content),
            None => Ok(ConfigDocument::new()),
        }
    }

    fn write(&self, path: &Path, patch: &ConfigDocument) -> Result<()> {
        let original = read_existing(path)?.filter(|content| !content.trim().is_empty());
        let mut merged = match original.as_deref() {
            Some(content) => parse_document(path, content)?,
            None => ConfigDocument::new(),
        };
        deep_merge(&mut merged, patch);

        let content = match original.as_deref() {
            Some(content) => JsonWriteStrategy::StructuralPatch
                .render(content, patch, &merged)
                .or_else(|err| {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Could not edit JSON config in place; rewriting the whole file"
                    );
                    JsonWriteStrategy::FullRewrite.render(content, patch, &merged)
                })?,
            None => JsonWriteStrategy::FullRewrite.render("", patch, &merged)?,
        };

        tracing::debug!(path = %path.display(), "Writing JSON config");
        write_file(path, &content)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }
}

/// Indent unit of the first indented property line: a tab, or N spaces.
pub fn detect_indent(text: &str) -> String {
    for line in text.lines().skip(1) {
        let trimmed = line.trim_start_matches([' ', '\t']);
        let whitespace = &line[..line.len() - trimmed.len()];
        if whitespace.is_empty() || !trimmed.starts_with('"') {
            continue;
        }
        if whitespace.starts_with('\t') {
            return "\t".to_string();
        }
        return " ".repeat(whitespace.len());
    }
    DEFAULT_INDENT.to_string()
}

fn parse_document(path: &Path, content: &str) -> Result<ConfigDocument> {
    if content.trim().is_empty() {
        return Ok(ConfigDocument::new());
    }
    let value = parse_jsonc(content).map_err(|err| parse_error(path, ConfigFormat::Json, err))?;
    into_document(path, ConfigFormat::Json, value)
}

/// Strict JSON first, then JSON5 (a superset of JSON with comments).
fn parse_jsonc(content: &str) -> std::result::Result<Value, json5::Error> {
    let content = content.trim_start_matches('\u{feff}');
    serde_json::from_str(content).or_else(|_| json5::from_str(content))
}

fn serialize_error(err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Serialize {
        format: ConfigFormat::Json,
        message: err.to_string(),
    }
}
