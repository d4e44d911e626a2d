// Order CSV import (Latin-1, semicolon) and result CSV export (UTF-8, comma)

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{ExportError, InputError};

/// Order exports always use `;` between fields.
pub const DELIMITER: u8 = b';';

/// A parsed order export: one header row plus data rows of equal width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    lines: Vec<u64>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rewrite every header in place (used for canonical header keys).
    pub fn map_headers(&mut self, f: impl Fn(&str) -> String) {
        for header in &mut self.headers {
            *header = f(header);
        }
    }

    /// Fail with every `(key, display name)` pair whose key is not a header.
    pub fn require_columns(&self, required: &[(&str, &str)]) -> Result<(), InputError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|(key, _)| self.column_index(key).is_none())
            .map(|(_, display)| display.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(InputError::MissingColumns(missing))
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = OrderRow<'_>> {
        self.rows
            .iter()
            .zip(&self.lines)
            .map(move |(cells, &line)| OrderRow { table: self, cells, line })
    }
}

/// One data row, addressed by header name.
#[derive(Debug, Clone, Copy)]
pub struct OrderRow<'a> {
    table: &'a Table,
    cells: &'a [String],
    line: u64,
}

impl<'a> OrderRow<'a> {
    /// Raw cell text; empty when the column does not exist.
    pub fn cell(&self, column: &str) -> &'a str {
        self.table
            .column_index(column)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Raw cell text, or `None` when blank after trimming.
    pub fn present(&self, column: &str) -> Option<&'a str> {
        let value = self.cell(column);
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// 1-based line in the source file where this record starts.
    pub fn line(&self) -> u64 {
        self.line
    }
}

pub fn import(path: &Path) -> Result<Table, InputError> {
    let bytes = std::fs::read(path).map_err(InputError::unreadable)?;
    parse_latin1(&bytes)
}

pub fn import_reader(mut reader: impl Read) -> Result<Table, InputError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(InputError::unreadable)?;
    parse_latin1(&bytes)
}

/// Decode Latin-1 bytes and split them on `;`. The first record is the header.
///
/// Encoding and delimiter are fixed: nothing is sniffed. Rows shorter than the
/// header are padded with empty cells; rows longer than the header are an error.
pub fn parse_latin1(bytes: &[u8]) -> Result<Table, InputError> {
    // WINDOWS_1252 is the WHATWG decoder behind the "latin1" label. Every byte
    // maps to a character, so decoding itself cannot fail.
    let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);

    // The csv reader runs an unterminated quote to EOF as one field.
    if let Some(line) = unclosed_quote_line(&text) {
        return Err(InputError::Unreadable(format!(
            "line {line}: quoted field is never closed"
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(result) => result.map_err(InputError::unreadable)?,
        None => return Err(InputError::Unreadable("file is empty".into())),
    };
    let headers: Vec<String> = header.iter().map(str::to_string).collect();

    let mut table = Table { headers, ..Table::default() };
    for result in records {
        let record = result.map_err(InputError::unreadable)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        if record.len() > table.headers.len() {
            return Err(InputError::Unreadable(format!(
                "line {line}: expected {} fields, found {}",
                table.headers.len(),
                record.len()
            )));
        }

        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(table.headers.len(), String::new());
        table.rows.push(cells);
        table.lines.push(line);
    }

    log::debug!("parsed {} rows x {} columns", table.len(), table.headers.len());
    Ok(table)
}

/// Line on which a quoted field opens without ever being closed.
///
/// Mirrors the reader's quoting rules: a quote opens a field only at the start
/// of the field, `""` inside a quoted field is an escaped quote, and any other
/// quote is literal text.
fn unclosed_quote_line(text: &str) -> Option<u64> {
    let delimiter = char::from(DELIMITER);
    let mut line = 1;
    let mut open_at = None;
    let mut field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if open_at.is_some() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    open_at = None;
                }
            }
        } else if c == '"' && field_start {
            open_at = Some(line);
        }
        if c == '\n' {
            line += 1;
        }
        field_start = open_at.is_none() && (c == delimiter || c == '\n' || c == '\r');
    }

    open_at
}

/// Write `rows` as UTF-8, comma-separated CSV.
///
/// The header comes from the serialized field names; `header` is only written
/// when there are no rows to serialize.
pub fn export<T: Serialize>(rows: &[T], header: &[&str], writer: impl Write) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    // Always write header, even with zero rows
    if rows.is_empty() {
        csv_writer
            .write_record(header)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io(e.to_string()))?;
    Ok(())
}
