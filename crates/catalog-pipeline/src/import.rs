//! Bulk topic import from JSON or CSV.
//!
//! Each row is validated on its own and upserted by slug. Bad rows become
//! `Row N: ...` diagnostics (N counts data rows from 1) and never stop the
//! batch.

use catalog_db::{Topic, TopicStore, Upsert};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validator::{ValidationError, validate_topic};

/// Structural error for CSV input without data rows
pub const CSV_TOO_SHORT: &str = "CSV must have at least a header row and one data row";

/// Headers whose cells hold `;`-separated lists
const LIST_FIELDS: [&str; 4] = [
    "tags",
    "learning_outcomes",
    "prerequisites",
    "related_portfolio_slug",
];

/// Outcome of an import batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows validated and written to the store
    pub success: usize,
    /// One diagnostic per rejected row, or a single structural error
    pub errors: Vec<String>,
}

impl ImportReport {
    fn structural(message: impl Into<String>) -> Self {
        Self {
            success: 0,
            errors: vec![message.into()],
        }
    }

    fn reject(&mut self, row: usize, reason: impl std::fmt::Display) {
        tracing::debug!(row, %reason, "Rejected topic row");
        self.errors.push(format!("Row {row}: {reason}"));
    }

    fn apply(
        &mut self,
        store: &mut TopicStore,
        row: usize,
        result: Result<Topic, ValidationError>,
    ) {
        match result {
            Ok(topic) => {
                let slug = topic.slug.clone();
                match store.upsert(topic) {
                    Upsert::Inserted => tracing::debug!(row, %slug, "Inserted topic"),
                    Upsert::Replaced => tracing::debug!(row, %slug, "Replaced topic"),
                }
                self.success += 1;
            }
            Err(e) => self.reject(row, e),
        }
    }

    /// Number of rejected rows (or 1 for a structural failure)
    pub fn failed(&self) -> usize {
        self.errors.len()
    }
}

/// Import already-parsed JSON records. Every element is processed.
pub fn import_from_json(store: &mut TopicStore, records: &[Value]) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, raw) in records.iter().enumerate() {
        report.apply(store, index + 1, validate_topic(raw));
    }

    tracing::info!(
        imported = report.success,
        rejected = report.failed(),
        "JSON import finished"
    );
    report
}

/// Import JSON text holding either an array of topics or a single topic object
pub fn import_from_json_str(store: &mut TopicStore, text: &str) -> ImportReport {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return ImportReport::structural(format!("Invalid JSON: {e}")),
    };

    match &parsed {
        Value::Array(records) => import_from_json(store, records),
        Value::Object(_) => import_from_json(store, std::slice::from_ref(&parsed)),
        _ => ImportReport::structural(
            "Invalid JSON: expected an array of topics or a single topic object",
        ),
    }
}

/// Import CSV text whose first line names the fields.
///
/// Input is read line by line, so a blank line between rows is a data row of
/// its own (and fails validation). Quoted cells may hold commas and doubled
/// quotes but not line breaks.
pub fn import_from_csv(store: &mut TopicStore, text: &str) -> ImportReport {
    let mut lines = text.trim().lines();

    let headers: Vec<String> = match lines.next().map(split_line) {
        Some(Ok(cells)) => cells.iter().map(|h| strip_quotes(h).to_string()).collect(),
        Some(Err(e)) => return ImportReport::structural(format!("Invalid CSV header: {e}")),
        None => return ImportReport::structural(CSV_TOO_SHORT),
    };

    let mut report = ImportReport::default();
    let mut rows = 0;

    for (index, line) in lines.enumerate() {
        let row = index + 1;
        rows = row;

        match split_line(line) {
            Ok(cells) => {
                let raw = Value::Object(row_to_record(&headers, &cells));
                report.apply(store, row, validate_topic(&raw));
            }
            Err(e) => report.reject(row, format_args!("Parse error - {e}")),
        }
    }

    if rows == 0 {
        return ImportReport::structural(CSV_TOO_SHORT);
    }

    tracing::info!(
        imported = report.success,
        rejected = report.failed(),
        "CSV import finished"
    );
    report
}

/// Split one line into trimmed cells, unquoting quoted ones.
/// A blank line has no cells.
fn split_line(line: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

/// Zip a data row against the headers, coercing cells by field name.
/// Missing trailing cells leave the field absent, extra cells are ignored.
fn row_to_record(headers: &[String], cells: &[String]) -> Map<String, Value> {
    headers
        .iter()
        .zip(cells)
        .map(|(header, cell)| (header.clone(), coerce_cell(header, cell)))
        .collect()
}

fn coerce_cell(header: &str, cell: &str) -> Value {
    match header {
        h if LIST_FIELDS.contains(&h) => Value::Array(
            cell.split(';')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(Value::from)
                .collect(),
        ),
        "duration_estimate" => Value::from(leading_integer(cell).unwrap_or(0)),
        "is_featured" => Value::Bool(cell.to_lowercase() == "true"),
        _ => Value::from(cell),
    }
}

/// Integer at the start of a cell, so `45min` and `45.5` both read as 45
fn leading_integer(cell: &str) -> Option<i64> {
    let cell = cell.trim_start();
    let digits_from = usize::from(cell.starts_with(['+', '-']));
    let end = cell[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(cell.len(), |i| i + digits_from);

    cell[..end].parse().ok()
}

/// Drop one pair of surrounding double quotes left on a header cell
fn strip_quotes(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}
