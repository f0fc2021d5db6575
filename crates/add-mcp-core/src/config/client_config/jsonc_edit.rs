//! Structural edits on JSON-with-comments text.
//!
//! The original text is scanned into a tree of byte spans (objects keep their
//! members, everything else is an opaque value). A patch is then applied as a
//! set of text replacements and insertions at those spans, so comments and
//! formatting outside the touched values stay byte-for-byte identical.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message} at byte {offset}")]
pub(crate) struct EditError {
    message: String,
    offset: usize,
}

impl EditError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

#[derive(Debug)]
struct Node {
    start: usize,
    end: usize,
    kind: NodeKind,
}

#[derive(Debug)]
enum NodeKind {
    Object { close: usize, members: Vec<Member> },
    Other,
}

#[derive(Debug)]
struct Member {
    key: String,
    key_start: usize,
    value: Node,
}

/// How inserted text is laid out: the indent unit and the line ending of the
/// original text.
#[derive(Debug, Clone, Copy)]
struct Style<'a> {
    unit: &'a str,
    eol: &'static str,
}

#[derive(Debug)]
struct TextEdit {
    start: usize,
    end: usize,
    text: String,
}

/// Apply `patch` to `text` with deep-merge semantics, printing any new values
/// with the `indent` unit. New lines use `\r\n` when the text already does.
pub(crate) fn patch_document(
    text: &str,
    patch: &Map<String, Value>,
    indent: &str,
) -> Result<String, EditError> {
    let root = Scanner::new(text).parse_document()?;
    let style = Style {
        unit: indent,
        eol: if text.contains("\r\n") { "\r\n" } else { "\n" },
    };
    let mut edits = Vec::new();
    plan_object(text, &root, patch, style, &mut edits)?;
    Ok(apply_edits(text, edits))
}

fn plan_object(
    text: &str,
    node: &Node,
    patch: &Map<String, Value>,
    style: Style<'_>,
    edits: &mut Vec<TextEdit>,
) -> Result<(), EditError> {
    let NodeKind::Object { close, members } = &node.kind else {
        return Err(EditError::new("expected an object", node.start));
    };

    let mut missing = Vec::new();
    for (key, incoming) in patch {
        // Duplicate keys: the last occurrence is the one parsers keep.
        let Some(member) = members.iter().rev().find(|m| &m.key == key) else {
            missing.push((key, incoming));
            continue;
        };
        match (&member.value.kind, incoming) {
            (NodeKind::Object { .. }, Value::Object(nested)) => {
                plan_object(text, &member.value, nested, style, edits)?;
            }
            _ => edits.push(TextEdit {
                start: member.value.start,
                end: member.value.end,
                text: render_value(incoming, style, line_indent(text, member.key_start))?,
            }),
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    let Style { unit, eol } = style;
    let parent_indent = line_indent(text, node.start);
    match members.last() {
        Some(last) => {
            let indent = if starts_line(text, last.key_start) {
                line_indent(text, last.key_start).to_string()
            } else {
                format!("{parent_indent}{unit}")
            };
            let mut insert = String::new();
            for (key, value) in missing {
                insert.push(',');
                insert.push_str(eol);
                insert.push_str(&indent);
                insert.push_str(&render_member(key, value, style, &indent)?);
            }
            edits.push(TextEdit {
                start: last.value.end,
                end: last.value.end,
                text: insert,
            });
        }
        None => {
            let child_indent = format!("{parent_indent}{unit}");
            let entries = missing
                .iter()
                .map(|(key, value)| {
                    render_member(key, value, style, &child_indent)
                        .map(|member| format!("{child_indent}{member}"))
                })
                .collect::<Result<Vec<_>, _>>()?
                .join(format!(",{eol}").as_str());

            let inner_start = node.start + 1;
            let close_line = line_start(text, *close);
            if text[inner_start..*close].trim().is_empty() {
                edits.push(TextEdit {
                    start: inner_start,
                    end: *close,
                    text: format!("{eol}{entries}{eol}{parent_indent}"),
                });
            } else if close_line > inner_start && text[close_line..*close].trim().is_empty() {
                // Only comments inside: add the entries on their own lines before `}`.
                edits.push(TextEdit {
                    start: close_line,
                    end: close_line,
                    text: format!("{entries}{eol}"),
                });
            } else {
                edits.push(TextEdit {
                    start: *close,
                    end: *close,
                    text: format!("{eol}{entries}{eol}{parent_indent}"),
                });
            }
        }
    }
    Ok(())
}

fn apply_edits(text: &str, mut edits: Vec<TextEdit>) -> String {
    // Back to front so earlier offsets stay valid. An insertion at the end of a
    // replaced value sorts first and is untouched by the replacement.
    edits.sort_by(|a, b| b.start.cmp(&a.start));
    let mut out = text.to_string();
    for edit in edits {
        out.replace_range(edit.start..edit.end, &edit.text);
    }
    out
}

fn render_member(key: &str, value: &Value, style: Style<'_>, indent: &str) -> Result<String, EditError> {
    let key = serde_json::to_string(key).map_err(|err| EditError::new(err.to_string(), 0))?;
    Ok(format!("{key}: {}", render_value(value, style, indent)?))
}

/// Pretty-print `value` with the style's indentation, continuing lines at `base`.
fn render_value(value: &Value, style: Style<'_>, base: &str) -> Result<String, EditError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(style.unit.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| EditError::new(err.to_string(), 0))?;
    let rendered = String::from_utf8(buf).map_err(|err| EditError::new(err.to_string(), 0))?;
    Ok(rendered.replace('\n', &format!("{}{base}", style.eol)))
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |idx| idx + 1)
}

/// Leading whitespace of the line containing `pos`.
fn line_indent(text: &str, pos: usize) -> &str {
    let prefix = &text[line_start(text, pos)..pos];
    let len = prefix.len() - prefix.trim_start().len();
    &prefix[..len]
}

fn starts_line(text: &str, pos: usize) -> bool {
    text[line_start(text, pos)..pos].trim().is_empty()
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> EditError {
        EditError::new(message, self.pos)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn parse_document(&mut self) -> Result<Node, EditError> {
        if self.text.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
        self.skip_trivia()?;
        if self.peek() != Some(b'{') {
            return Err(self.error("document root is not an object"));
        }
        let root = self.parse_value()?;
        self.skip_trivia()?;
        if self.pos != self.bytes.len() {
            return Err(self.error("unexpected content after the root object"));
        }
        Ok(root)
    }

    fn skip_trivia(&mut self) -> Result<(), EditError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => {
                        while self.peek().is_some_and(|b| b != b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(b'*') => {
                        let end = self.text[self.pos + 2..]
                            .find("*/")
                            .ok_or_else(|| self.error("unterminated block comment"))?;
                        self.pos += 2 + end + 2;
                    }
                    _ => return Err(self.error("unexpected '/'")),
                },
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Node, EditError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => {
                let start = self.pos;
                self.scan_string()?;
                Ok(Node {
                    start,
                    end: self.pos,
                    kind: NodeKind::Other,
                })
            }
            Some(_) => self.parse_literal(),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Node, EditError> {
        let start = self.pos;
        self.pos += 1;
        let mut members = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b'}') => {
                    let close = self.pos;
                    self.pos += 1;
                    return Ok(Node {
                        start,
                        end: self.pos,
                        kind: NodeKind::Object { close, members },
                    });
                }
                Some(b'"') => {}
                _ => return Err(self.error("expected a property name or '}'")),
            }

            let key_start = self.pos;
            self.scan_string()?;
            let key: String = serde_json::from_str(&self.text[key_start..self.pos])
                .map_err(|err| EditError::new(format!("invalid property name: {err}"), key_start))?;

            self.skip_trivia()?;
            if self.peek() != Some(b':') {
                return Err(self.error("expected ':'"));
            }
            self.pos += 1;

            let value = self.parse_value()?;
            members.push(Member {
                key,
                key_start,
                value,
            });

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Node, EditError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b']') {
                self.pos += 1;
                return Ok(Node {
                    start,
                    end: self.pos,
                    kind: NodeKind::Other,
                });
            }
            self.parse_value()?;
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {}
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
    }

    fn scan_string(&mut self) -> Result<(), EditError> {
        self.pos += 1;
        loop {
            match self.peek() {
                Some(b'\\') => self.pos += 2,
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_literal(&mut self) -> Result<Node, EditError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || matches!(b, b',' | b'}' | b']' | b'/') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a value"));
        }
        Ok(Node {
            start,
            end: self.pos,
            kind: NodeKind::Other,
        })
    }
}
