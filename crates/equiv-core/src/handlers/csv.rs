//! CSV format handler
//!
//! Quoting follows the backslash convention: inside a field wrapped in
//! `"…"`, `\"` is a literal quote and `\\` a literal backslash. Doubled
//! quotes are not an escape. Unquoted fields are taken verbatim, whitespace
//! included.

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::options::{CsvOptions, HeaderMode};
use crate::value::{Row, Table, Value};

/// Handler for CSV documents
#[derive(Debug, Clone)]
pub struct CsvHandler {
    options: CsvOptions,
    separator: char,
}

impl CsvHandler {
    /// Create a handler, rejecting invalid separator/newline settings
    pub fn new(options: CsvOptions) -> Result<Self> {
        let separator = options.validate()?;
        Ok(Self { options, separator })
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Parse source text into a [`Table`]
    pub fn parse_table(&self, source: &str) -> Result<Table> {
        let mut records = Scanner::new(source, self.separator, &self.options.newline).records()?;

        let header = match self.options.header {
            HeaderMode::Present if records.is_empty() => Some(Vec::new()),
            HeaderMode::Present => Some(records.remove(0)),
            HeaderMode::Missing => None,
        };
        let width = match &header {
            Some(names) => names.len(),
            None => records.first().map_or(0, Vec::len),
        };

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Row {
                number: i + 1,
                invalid: cells.len() != width,
                cells,
            })
            .collect();

        Ok(Table { header, rows })
    }

    /// Render a table back to text using this handler's settings.
    ///
    /// Parsing the output with the same settings yields an equal table.
    pub fn render_table(&self, table: &Table) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(header) = &table.header {
            lines.push(self.render_record(header));
        }
        for row in &table.rows {
            lines.push(self.render_record(&row.cells));
        }
        let mut out = lines.join(&self.options.newline);
        if !out.is_empty() {
            out.push_str(&self.options.newline);
        }
        out
    }

    fn render_record(&self, cells: &[String]) -> String {
        // A lone empty field would otherwise produce an empty line, which is skipped
        if cells.len() == 1 && cells[0].is_empty() {
            return "\"\"".to_string();
        }
        cells
            .iter()
            .map(|cell| self.render_field(cell))
            .collect::<Vec<_>>()
            .join(&self.separator.to_string())
    }

    fn render_field(&self, cell: &str) -> String {
        let needs_quotes = cell.contains(self.separator)
            || cell.contains(['"', '\\', '\r', '\n'])
            || cell.contains(self.options.newline.as_str());
        if !needs_quotes {
            return cell.to_string();
        }
        let escaped = cell.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    }
}

impl FormatHandler for CsvHandler {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn parse(&self, source: &str) -> Result<Value> {
        self.parse_table(source).map(Value::Table)
    }

    fn render(&self, value: &Value) -> String {
        match value {
            Value::Table(table) => self.render_table(table),
            Value::Scalar(text) => self.render_field(text),
            Value::Array(items) => {
                let cells: Vec<String> = items.iter().map(Value::describe).collect();
                self.render_record(&cells)
            }
            Value::Object(entries) => {
                let header: Vec<String> = entries.iter().map(|(k, _)| k.clone()).collect();
                let cells: Vec<String> = entries.iter().map(|(_, v)| v.describe()).collect();
                self.render_table(&Table {
                    header: Some(header),
                    rows: vec![Row::new(1, cells)],
                })
            }
        }
    }
}

/// Splits source text into records of fields
struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    separator: char,
    newline: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, separator: char, newline: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            separator,
            newline,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Length of the record terminator at the current position, if any
    fn newline_len(&self) -> Option<usize> {
        let rest = self.rest();
        if self.newline == "\n" || self.newline == "\r\n" {
            if rest.starts_with("\r\n") {
                return Some(2);
            }
            if rest.starts_with('\n') {
                return Some(1);
            }
            return None;
        }
        rest.starts_with(self.newline).then_some(self.newline.len())
    }

    fn records(mut self) -> Result<Vec<Vec<String>>> {
        let mut records = Vec::new();
        while self.pos < self.source.len() {
            let (fields, quoted) = self.record()?;
            if fields.len() == 1 && fields[0].is_empty() && !quoted {
                continue;
            }
            records.push(fields);
        }
        Ok(records)
    }

    /// Read one record, consuming its terminator.
    ///
    /// Also reports whether any field was quoted, to tell `""` from a blank line.
    fn record(&mut self) -> Result<(Vec<String>, bool)> {
        let mut fields = Vec::new();
        let mut any_quoted = false;
        loop {
            let field = if self.rest().starts_with('"') {
                any_quoted = true;
                self.quoted_field()?
            } else {
                self.plain_field()
            };
            fields.push(field);

            if self.pos >= self.source.len() {
                return Ok((fields, any_quoted));
            }
            if let Some(len) = self.newline_len() {
                self.pos += len;
                return Ok((fields, any_quoted));
            }
            if self.rest().starts_with(self.separator) {
                self.pos += self.separator.len_utf8();
                if self.pos >= self.source.len() {
                    // Trailing separator: one more empty field
                    fields.push(String::new());
                    return Ok((fields, any_quoted));
                }
                continue;
            }
            return Err(self.error("unexpected character after closing quote"));
        }
    }

    fn plain_field(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.source.len() {
            if self.rest().starts_with(self.separator) || self.newline_len().is_some() {
                break;
            }
            let c = self.rest().chars().next().map_or(1, char::len_utf8);
            self.pos += c;
        }
        self.source[start..self.pos].to_string()
    }

    fn quoted_field(&mut self) -> Result<String> {
        let open = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().chars();
        while let Some(c) = chars.next() {
            self.pos += c.len_utf8();
            match c {
                '\\' => match chars.next() {
                    Some(escaped @ ('"' | '\\')) => {
                        self.pos += 1;
                        out.push(escaped);
                    }
                    Some(other) => {
                        self.pos += other.len_utf8();
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                '"' => return Ok(out),
                other => out.push(other),
            }
        }
        self.pos = open;
        Err(self.error("unterminated quoted field"))
    }

    fn error(&self, message: &str) -> Error {
        let before = &self.source[..self.pos];
        let line = before.matches('\n').count() + 1;
        let column = before.rfind('\n').map_or(before.chars().count(), |nl| {
            before[nl + 1..].chars().count()
        }) + 1;
        Error::malformed_at(Format::Csv, message, line, column)
    }
}
