// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

//! Per-format obfuscators.  Each one takes the raw object bytes and the
//! sensitive field list and re-serialises the whole document with those
//! fields masked; nothing is written out until the full result is built.

use super::delimited::{format_row, format_row_with, parse_row, strip_terminator, terminator_of};
use super::fields::resolve_indices;
use super::masker::{mask_record, mask_row};
use crate::error::{ObfuscateError, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Supported file formats, selected from the object key's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.csv`: a header row followed by comma-delimited rows.
    DelimitedText,
    /// `.jsonl`: one JSON object per line.
    LineRecords,
    /// `.json`: an array of objects, or an object of such arrays.
    DocumentRecords,
}

/// Suffix table, checked in order.
const SUFFIXES: [(&str, Format); 3] = [
    (".csv", Format::DelimitedText),
    (".jsonl", Format::LineRecords),
    (".json", Format::DocumentRecords),
];

impl Format {
    /// Pick the format for an object key by exact, case-sensitive suffix.
    pub fn from_key(key: &str) -> Result<Self> {
        SUFFIXES
            .iter()
            .find(|(suffix, _)| key.ends_with(suffix))
            .map(|(_, format)| *format)
            .ok_or_else(|| ObfuscateError::UnsupportedFormat(key.to_string()))
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Format::DelimitedText => ".csv",
            Format::LineRecords => ".jsonl",
            Format::DocumentRecords => ".json",
        }
    }

    pub fn all() -> impl Iterator<Item = Format> {
        SUFFIXES.iter().map(|(_, format)| *format)
    }

    /// Mask `sensitive` in `raw`, returning the complete output document.
    pub fn obfuscate<S: AsRef<str>>(self, raw: &[u8], sensitive: &[S]) -> Result<Vec<u8>> {
        match self {
            Format::DelimitedText => obfuscate_csv(raw, sensitive),
            Format::LineRecords => obfuscate_jsonl(raw, sensitive),
            Format::DocumentRecords => obfuscate_json(raw, sensitive),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::DelimitedText => "CSV",
            Format::LineRecords => "JSON Lines",
            Format::DocumentRecords => "JSON",
        };
        f.write_str(name)
    }
}

/// The header is copied verbatim and resolved before any row is touched.
/// Rows keep their own line ending; an unterminated last row gains `\n`.
pub fn obfuscate_csv<S: AsRef<str>>(raw: &[u8], sensitive: &[S]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(raw)?;
    let mut lines = text.split_inclusive('\n');
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };

    let header = parse_row(header_line);
    let sensitive: Vec<&str> = sensitive.iter().map(AsRef::as_ref).collect();
    let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
    let indices = resolve_indices(&header_refs, &sensitive)?;
    let widest = indices.last().copied();

    let mut out = String::with_capacity(text.len());
    out.push_str(header_line);

    for (offset, line) in lines.enumerate() {
        if strip_terminator(line).is_empty() {
            out.push_str(line);
            continue;
        }
        let row = parse_row(line);
        if let Some(widest) = widest
            && widest >= row.len()
        {
            return Err(ObfuscateError::MalformedDocument(format!(
                "line {} has {} fields but column {} ('{}') must be masked",
                offset + 2,
                row.len(),
                widest + 1,
                header[widest]
            )));
        }
        let masked = mask_row(row, &indices);
        let rewritten = match terminator_of(line) {
            "" => format_row(&masked),
            ending => format_row_with(&masked, ending),
        };
        out.push_str(&rewritten);
    }

    Ok(out.into_bytes())
}

/// Blank lines are skipped; every emitted record ends with `\n`.
pub fn obfuscate_jsonl<S: AsRef<str>>(raw: &[u8], sensitive: &[S]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(raw)?;
    let mut out = Vec::with_capacity(raw.len());

    for (offset, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut record: Map<String, Value> = serde_json::from_str(line).map_err(|err| {
            ObfuscateError::MalformedDocument(format!("line {}: {err}", offset + 1))
        })?;
        mask_record(&mut record, sensitive)?;
        serde_json::to_writer(&mut out, &record)?;
        out.push(b'\n');
    }

    Ok(out)
}

/// Accepts a top-level array of records or an object whose values are
/// arrays of records.  Any other shape is rejected rather than passed
/// through unmasked.
pub fn obfuscate_json<S: AsRef<str>>(raw: &[u8], sensitive: &[S]) -> Result<Vec<u8>> {
    let mut document: Value = serde_json::from_slice(raw)?;

    match &mut document {
        Value::Array(records) => mask_records(records, sensitive, None)?,
        Value::Object(groups) => {
            for (group, value) in groups.iter_mut() {
                match value {
                    Value::Array(records) => mask_records(records, sensitive, Some(group))?,
                    other => {
                        return Err(ObfuscateError::MalformedDocument(format!(
                            "'{group}' must hold an array of records, found {}",
                            kind_of(other)
                        )));
                    }
                }
            }
        }
        other => {
            return Err(ObfuscateError::MalformedDocument(format!(
                "expected an array or an object of arrays, found {}",
                kind_of(other)
            )));
        }
    }

    Ok(serde_json::to_vec(&document)?)
}

fn mask_records<S: AsRef<str>>(
    records: &mut [Value],
    sensitive: &[S],
    group: Option<&String>,
) -> Result<()> {
    for (idx, record) in records.iter_mut().enumerate() {
        match record {
            Value::Object(map) => mask_record(map, sensitive)?,
            other => {
                let place = match group {
                    Some(group) => format!("'{group}'[{idx}]"),
                    None => format!("[{idx}]"),
                };
                return Err(ObfuscateError::MalformedDocument(format!(
                    "record {place} must be an object, found {}",
                    kind_of(other)
                )));
            }
        }
    }
    Ok(())
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
