//! XML format handler
//!
//! Elements map onto the canonical model as follows:
//!
//! - the document becomes `{ root_name: element }`
//! - an element with neither attributes nor child elements collapses to its
//!   trimmed text
//! - otherwise it becomes an object: attributes first, then `#text` if the
//!   element also carries text, then one entry per distinct child name, in
//!   order of first appearance; a name that repeats becomes an array
//!
//! Namespace prefixes are dropped and `xmlns` declarations are not
//! attributes. Text interleaved with child elements is rejected, as is
//! element nesting deeper than [`MAX_DEPTH`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::value::{MAX_DEPTH, Value};

/// Entry name used for the text of an element that also has attributes
pub const TEXT_KEY: &str = "#text";

/// Handler for XML documents
#[derive(Debug, Default)]
pub struct XmlHandler;

impl XmlHandler {
    pub fn new() -> Self {
        Self
    }
}

/// An element still being read
struct Frame {
    name: String,
    attributes: Vec<(String, Value)>,
    /// Child values grouped by local name, in order of first appearance
    children: Vec<(String, Vec<Value>)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, offset: u64) -> Result<Self> {
        let name = utf8(start.local_name().as_ref(), offset)?.to_string();
        let mut attributes: Vec<(String, Value)> = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| malformed(e.to_string(), offset))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = utf8(attr.key.local_name().as_ref(), offset)?.to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| malformed(e.to_string(), offset))?;
            if attributes.iter().any(|(k, _)| *k == key) {
                return Err(malformed(
                    format!("element <{name}> repeats attribute local name '{key}'"),
                    offset,
                ));
            }
            attributes.push((key, Value::scalar(value.into_owned())));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value, offset: u64) -> Result<()> {
        if self.attributes.iter().any(|(k, _)| *k == name) {
            return Err(malformed(
                format!(
                    "element <{}> has both an attribute and a child element named '{name}'",
                    self.name
                ),
                offset,
            ));
        }
        match self.children.iter_mut().find(|(k, _)| *k == name) {
            Some((_, group)) => group.push(value),
            None => self.children.push((name, vec![value])),
        }
        Ok(())
    }

    fn close(self, offset: u64) -> Result<(String, Value)> {
        let text = self.text.trim();
        if !self.children.is_empty() && !text.is_empty() {
            return Err(malformed(
                format!("element <{}> mixes text and child elements", self.name),
                offset,
            ));
        }
        if self.attributes.is_empty() && self.children.is_empty() {
            return Ok((self.name, Value::scalar(text)));
        }

        let mut entries = self.attributes;
        if !text.is_empty() {
            entries.push((TEXT_KEY.to_string(), Value::scalar(text)));
        }
        for (name, mut group) in self.children {
            let value = if group.len() == 1 {
                group.remove(0)
            } else {
                Value::Array(group)
            };
            entries.push((name, value));
        }
        Ok((self.name, Value::Object(entries)))
    }
}

impl FormatHandler for XmlHandler {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn parse(&self, source: &str) -> Result<Value> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().check_end_names = true;

        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<(String, Value)> = None;

        loop {
            let offset = reader.buffer_position() as u64;
            let event = reader
                .read_event()
                .map_err(|e| malformed(e.to_string(), reader.error_position() as u64))?;
            match event {
                Event::Start(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(malformed("multiple root elements", offset));
                    }
                    check_depth(&stack, offset)?;
                    stack.push(Frame::open(&start, offset)?);
                }
                Event::Empty(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(malformed("multiple root elements", offset));
                    }
                    check_depth(&stack, offset)?;
                    let closed = Frame::open(&start, offset)?.close(offset)?;
                    attach(&mut stack, &mut root, closed, offset)?;
                }
                Event::End(_) => {
                    let frame = stack
                        .pop()
                        .ok_or_else(|| malformed("unexpected closing tag", offset))?;
                    let closed = frame.close(offset)?;
                    attach(&mut stack, &mut root, closed, offset)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| malformed(e.to_string(), offset))?;
                    match stack.last_mut() {
                        Some(frame) => frame.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(malformed("text outside the root element", offset)),
                    }
                }
                Event::CData(data) => {
                    let text = utf8(&data, offset)?;
                    match stack.last_mut() {
                        Some(frame) => frame.text.push_str(text),
                        None => return Err(malformed("CDATA outside the root element", offset)),
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, DOCTYPE
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(malformed(
                format!("unclosed element <{}>", open.name),
                source.len() as u64,
            ));
        }
        let (name, value) = root.ok_or_else(|| Error::malformed(Format::Xml, "no root element"))?;
        Ok(Value::Object(vec![(name, value)]))
    }

    fn render(&self, value: &Value) -> String {
        let mut out = String::new();
        match value {
            Value::Object(entries) => {
                for (name, child) in entries {
                    render_element(name, child, 0, &mut out);
                }
            }
            other => render_element("value", other, 0, &mut out),
        }
        out.trim_end().to_string()
    }
}

/// An element opened on top of `stack` would be at depth `stack.len() + 1`
fn check_depth(stack: &[Frame], offset: u64) -> Result<()> {
    if stack.len() >= MAX_DEPTH {
        return Err(malformed(
            format!("element nesting exceeds {MAX_DEPTH} levels"),
            offset,
        ));
    }
    Ok(())
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    (name, value): (String, Value),
    offset: u64,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.add_child(name, value, offset),
        None => {
            *root = Some((name, value));
            Ok(())
        }
    }
}

fn render_element(name: &str, value: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Scalar(text) if text.is_empty() => {
            out.push_str(&format!("{indent}<{name}/>\n"));
        }
        Value::Scalar(text) => {
            out.push_str(&format!("{indent}<{name}>{}</{name}>\n", escape(text)));
        }
        Value::Array(items) => {
            for item in items {
                render_element(name, item, depth, out);
            }
        }
        Value::Object(entries) if entries.is_empty() => {
            out.push_str(&format!("{indent}<{name}/>\n"));
        }
        Value::Object(entries) => {
            out.push_str(&format!("{indent}<{name}>\n"));
            for (key, child) in entries {
                match child {
                    Value::Scalar(text) if key == TEXT_KEY => {
                        out.push_str(&format!("{indent}  {}\n", escape(text)));
                    }
                    _ => render_element(key, child, depth + 1, out),
                }
            }
            out.push_str(&format!("{indent}</{name}>\n"));
        }
        Value::Table(table) => {
            out.push_str(&format!("{indent}<{name}>\n"));
            for row in &table.rows {
                let cells = Value::Array(row.cells.iter().cloned().map(Value::Scalar).collect());
                render_element("row", &cells, depth + 1, out);
            }
            out.push_str(&format!("{indent}</{name}>\n"));
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn utf8(bytes: &[u8], offset: u64) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| malformed(e.to_string(), offset))
}

fn malformed(message: impl Into<String>, offset: u64) -> Error {
    Error::malformed(Format::Xml, format!("{} (byte {offset})", message.into()))
}
