//! Reading and writing `bunfig.toml`.
//!
//! Output is driven entirely by a static [`Schema`]: sections are written in
//! schema order, only declared properties make it out, and a section whose
//! value doesn't fit its declared type is skipped with a warning instead of
//! failing the whole write.

use toml::Value;

pub use crate::document::{take_table, Bunfig};
pub use crate::error::BunfigTomlError;
pub use crate::schema::{Schema, BUNFIG_SCHEMA};

mod document;
mod error;
mod schema;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

enum Section {
    Line(String),
    Table(Vec<String>),
}

/// Serializes `document` with the default bunfig schema.
pub fn to_string(document: &Bunfig) -> String {
    serialize(document, BUNFIG_SCHEMA)
}

/// Serializes `document`, emitting only what `schema` declares.
///
/// Root-level scalars always come before the first `[section]` header, or
/// TOML would read them as part of that section.
pub fn serialize(document: &Bunfig, schema: &[(&str, Schema)]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut tables: Vec<Vec<String>> = Vec::new();
    for section in schema
        .iter()
        .filter_map(|(key, node)| render_section(document, key, node))
    {
        match section {
            Section::Line(line) => lines.push(line),
            Section::Table(block) => tables.push(block),
        }
    }
    for block in tables {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(block);
    }
    let mut out = lines.join(LINE_ENDING);
    out.push_str(LINE_ENDING);
    out
}

fn render_section(document: &Bunfig, key: &str, schema: &Schema) -> Option<Section> {
    let value = document.get(key)?;
    if !schema.validate(value) {
        tracing::warn!("key: {key} has invalid value and was skipped: {value}");
        return None;
    }
    if !schema.is_table() {
        return Some(Section::Line(key_value(key, value)));
    }
    let table = value.as_table()?;
    let mut block = vec![format!("[{key}]")];
    match schema {
        Schema::Object { properties, .. } => {
            for (name, _) in properties.iter() {
                if let Some(value) = table.get(*name) {
                    block.push(key_value(name, value));
                }
            }
        }
        _ => {
            for (name, value) in table {
                block.push(key_value(name, value));
            }
        }
    }
    tracing::trace!("rendered [{key}] with {} entries", block.len() - 1);
    Some(Section::Table(block))
}

fn key_value(key: &str, value: &Value) -> String {
    format!("{} = {}", render_key(key), render_value(value))
}

fn render_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        quote(key)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) if f.is_nan() => "nan".into(),
        Value::Float(f) if f.is_infinite() => {
            if f.is_sign_negative() {
                "-inf".into()
            } else {
                "inf".into()
            }
        }
        Value::Float(f) => format!("{f:?}"),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        Value::Array(items) => {
            let items = items.iter().map(render_value).collect::<Vec<_>>();
            format!("[{}]", items.join(","))
        }
        Value::Table(table) if table.is_empty() => "{}".into(),
        Value::Table(table) => {
            let pairs = table
                .iter()
                .map(|(k, v)| key_value(k, v))
                .collect::<Vec<_>>();
            format!("{{ {} }}", pairs.join(", "))
        }
    }
}

/// Basic TOML string, which is also a valid JSON string.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
