//! JSON format handler

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::value::{MAX_DEPTH, Value};

/// Handler for JSON documents.
///
/// Numbers keep the literal text they were written with, so `1.0` and `1`
/// stay different scalars.
#[derive(Debug, Default)]
pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }

    fn to_canonical(value: JsonValue) -> Value {
        match value {
            JsonValue::Null => Value::scalar("null"),
            JsonValue::Bool(b) => Value::scalar(b.to_string()),
            JsonValue::Number(n) => Value::scalar(n.to_string()),
            JsonValue::String(s) => Value::Scalar(s),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Self::to_canonical).collect())
            }
            JsonValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::to_canonical(v)))
                    .collect(),
            ),
        }
    }

    fn render_into(value: &Value, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth + 1);
        let close = "  ".repeat(depth);
        match value {
            Value::Scalar(text) => out.push_str(&render_scalar(text)),
            Value::Object(entries) if entries.is_empty() => out.push_str("{}"),
            Value::Object(entries) => {
                out.push_str("{\n");
                for (i, (key, child)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    out.push_str(&indent);
                    out.push_str(&quote(key));
                    out.push_str(": ");
                    Self::render_into(child, depth + 1, out);
                }
                out.push('\n');
                out.push_str(&close);
                out.push('}');
            }
            Value::Array(items) if items.is_empty() => out.push_str("[]"),
            Value::Array(items) => {
                out.push_str("[\n");
                for (i, child) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    out.push_str(&indent);
                    Self::render_into(child, depth + 1, out);
                }
                out.push('\n');
                out.push_str(&close);
                out.push(']');
            }
            // Tables only come from CSV; show rows as arrays of cells
            Value::Table(table) => {
                let rows = table
                    .rows
                    .iter()
                    .map(|row| Value::Array(row.cells.iter().cloned().map(Value::Scalar).collect()))
                    .collect();
                Self::render_into(&Value::Array(rows), depth, out);
            }
        }
    }
}

impl FormatHandler for JsonHandler {
    fn format(&self) -> Format {
        Format::Json
    }

    fn parse(&self, source: &str) -> Result<Value> {
        check_depth(source)?;

        // Nesting is bounded above, so serde_json's own limit is lifted
        let mut de = serde_json::Deserializer::from_str(source);
        de.disable_recursion_limit();
        let value = JsonValue::deserialize(&mut de)
            .and_then(|value| de.end().map(|()| value))
            .map_err(|e| Error::malformed_at(Format::Json, e.to_string(), e.line(), e.column()))?;
        Ok(Self::to_canonical(value))
    }

    fn render(&self, value: &Value) -> String {
        let mut out = String::new();
        Self::render_into(value, 0, &mut out);
        out
    }
}

/// Reject documents nested deeper than [`MAX_DEPTH`] arrays or objects
fn check_depth(source: &str) -> Result<()> {
    let (mut depth, mut line, mut column) = (0usize, 1usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for ch in source.chars() {
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' | '{' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(Error::malformed_at(
                        Format::Json,
                        format!("nesting exceeds {MAX_DEPTH} levels"),
                        line,
                        column,
                    ));
                }
            }
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Literals that parse as JSON numbers, booleans or null render bare
fn render_scalar(text: &str) -> String {
    match serde_json::from_str::<JsonValue>(text) {
        Ok(JsonValue::Number(_) | JsonValue::Bool(_) | JsonValue::Null) => text.to_string(),
        _ => quote(text),
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}
