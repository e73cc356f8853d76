//! Turns an untyped record into a [`Topic`].
//!
//! Records come from parsed JSON or from a CSV row that has already been
//! coerced into JSON values. Validation stops at the first problem and reports
//! it as a [`ValidationError`]; the caller decides how to surface it.

use catalog_db::{DEFAULT_AUTHOR_ID, Difficulty, Topic};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// Fields every record must carry, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "title",
    "slug",
    "description",
    "tags",
    "difficulty",
    "duration_estimate",
];

/// Why a record was rejected. The message is the import diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The record is not a JSON object
    #[error("Record must be an object")]
    NotAnObject,
    /// A required field is absent, null, `false`, zero or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// `difficulty` is not one of the three level names
    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),
    /// `duration_estimate` is not a positive whole number
    #[error("Invalid duration_estimate: {0}")]
    InvalidDuration(String),
    #[error("tags must be an array")]
    TagsNotArray,
    #[error("Field {0} must be an array of strings")]
    NotAStringList(&'static str),
    #[error("Field {0} must be a string")]
    NotAString(&'static str),
}

/// Validate a raw record, stamping it with the current time
pub fn validate_topic(raw: &Value) -> Result<Topic, ValidationError> {
    validate_topic_at(raw, Utc::now())
}

/// Validate a raw record, using `now` for `updated_at` and a missing
/// `created_at`
pub fn validate_topic_at(raw: &Value, now: DateTime<Utc>) -> Result<Topic, ValidationError> {
    let record = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    for field in REQUIRED_FIELDS {
        if !record.get(field).is_some_and(is_truthy) {
            return Err(ValidationError::MissingField(field));
        }
    }

    let difficulty = record["difficulty"]
        .as_str()
        .and_then(|s| s.parse::<Difficulty>().ok())
        .ok_or_else(|| ValidationError::InvalidDifficulty(describe(&record["difficulty"])))?;

    let duration_estimate = parse_duration(&record["duration_estimate"])
        .ok_or_else(|| ValidationError::InvalidDuration(describe(&record["duration_estimate"])))?;

    let tags = match &record["tags"] {
        Value::Array(items) => string_list(items).ok_or(ValidationError::NotAStringList("tags"))?,
        _ => return Err(ValidationError::TagsNotArray),
    };

    let id = match &record["id"] {
        // Numeric ids from hand-written JSON are kept as their decimal text
        Value::Number(n) => n.to_string(),
        other => other
            .as_str()
            .map(str::to_string)
            .ok_or(ValidationError::NotAString("id"))?,
    };

    Ok(Topic {
        id,
        title: required_string(record, "title")?,
        slug: required_string(record, "slug")?,
        description: required_string(record, "description")?,
        tags,
        difficulty,
        duration_estimate,
        is_featured: record
            .get("is_featured")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        learning_outcomes: optional_list(record, "learning_outcomes"),
        prerequisites: optional_list(record, "prerequisites"),
        related_portfolio_slug: related_portfolio(record.get("related_portfolio_slug")),
        author_id: Some(
            record
                .get("author_id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_AUTHOR_ID)
                .to_string(),
        ),
        created_at: Some(
            record
                .get("created_at")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map_or(now, |t| t.with_timezone(&Utc)),
        ),
        updated_at: Some(now),
    })
}

/// Whether a value counts as "present" for a required field.
///
/// Null, `false`, zero and the empty string are absent. Arrays and objects are
/// present even when empty, so a topic may have no tags.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a value for a diagnostic, without quotes around strings
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Positive whole number of minutes. Numeric strings are not accepted.
pub(crate) fn parse_duration(value: &Value) -> Option<u32> {
    let minutes = match value.as_u64() {
        Some(n) => n,
        None => value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f > 0.0 && *f <= f64::from(u32::MAX))
            .map(|f| f as u64)?,
    };

    u32::try_from(minutes).ok().filter(|&m| m > 0)
}

fn string_list(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn required_string(record: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    record[field]
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::NotAString(field))
}

fn optional_list(record: &Map<String, Value>, field: &str) -> Vec<String> {
    match record.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn related_portfolio(value: Option<&Value>) -> Option<String> {
    let joined = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        _ => return None,
    };

    (!joined.is_empty()).then_some(joined)
}
