//! Parsers for candidate data.
//!
//! Two on-disk shapes are supported:
//! - a JSON document: either a top-level array of records, or an object
//!   holding the records under `experts`, `candidates` or `results`
//! - JSON lines: one record per line, blank lines ignored
//!
//! Records come back as untyped [`Value`]s so callers decide what to do with
//! malformed ones. Search-page envelopes are parsed by
//! [`parse_search_page`].

use crate::error::{DataLoadError, Result};
use crate::types::{Candidate, SearchPage};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Keys under which a document may hold its record list.
const RECORD_KEYS: [&str; 3] = ["experts", "candidates", "results"];

/// Keys under which a page envelope may report its total match count.
const TOTAL_KEYS: [&str; 3] = ["totalResults", "total_results", "total"];

/// Read every record from a file, picking the format from the extension.
///
/// `.jsonl` and `.ndjson` are read as JSON lines; anything else as a JSON
/// document.
pub fn read_records(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl") | Some("ndjson") => parse_json_lines(&text, &file),
        _ => parse_json_document(&text),
    }
}

/// Parse a JSON document into its list of records.
pub fn parse_json_document(text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(text)?;
    extract_records(value)
}

/// Parse JSON lines, one record per non-blank line.
///
/// Lines are parsed in parallel; the result keeps file order.
pub fn parse_json_lines(text: &str, file: &str) -> Result<Vec<Value>> {
    let lines: Vec<&str> = text.lines().collect();

    lines
        .par_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<Value>(line).map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: idx + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Pull the record list out of a parsed document.
pub fn extract_records(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => RECORD_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| {
                DataLoadError::InvalidFormat(format!(
                    "expected an array under one of {:?}",
                    RECORD_KEYS
                ))
            }),
        other => Err(DataLoadError::InvalidFormat(format!(
            "expected an array or object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Interpret a search backend response as a [`SearchPage`].
///
/// The envelope must carry a record list; individual malformed records are
/// dropped. A missing total is taken to mean nothing lies beyond this page.
pub fn parse_search_page(value: Value, offset: usize, limit: usize) -> Result<SearchPage> {
    let total = match &value {
        Value::Object(map) => TOTAL_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_u64)),
        _ => None,
    };

    let records = extract_records(value)?;
    let raw_count = records.len();
    let candidates: Vec<Candidate> = records
        .into_iter()
        .filter_map(Candidate::from_value)
        .collect();

    if candidates.len() != raw_count {
        debug!(
            "Dropped {} malformed records from page at offset {}",
            raw_count - candidates.len(),
            offset
        );
    }

    let total_results = total
        .map(|t| t as usize)
        .unwrap_or(offset + raw_count);

    Ok(SearchPage::new(candidates, total_results, offset, limit))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
