//! Topic export to JSON and CSV.
//!
//! The CSV layout is the one the importer reads, so an export can be loaded
//! back without loss.

use catalog_db::{Topic, TopicStore};
use thiserror::Error;

/// CSV export column order
pub const CSV_COLUMNS: [&str; 11] = [
    "id",
    "title",
    "slug",
    "description",
    "tags",
    "difficulty",
    "duration_estimate",
    "is_featured",
    "learning_outcomes",
    "prerequisites",
    "related_portfolio_slug",
];

/// Failure while serializing the catalog
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing a CSV record failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Flushing the CSV buffer failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing to JSON failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Copy of every topic in the store
pub fn export_to_json(store: &TopicStore) -> Vec<Topic> {
    store.all()
}

/// Pretty-printed JSON array of every topic
pub fn export_to_json_string(store: &TopicStore) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&store.all())?)
}

/// CSV of every topic with a header row.
///
/// Every cell is quoted, list fields are joined with `;` and rows are
/// separated by `\n` without a trailing newline.
pub fn export_to_csv(store: &TopicStore) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for topic in store.iter() {
        writer.write_record(csv_row(topic))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

fn csv_row(topic: &Topic) -> [String; 11] {
    [
        topic.id.clone(),
        topic.title.clone(),
        topic.slug.clone(),
        topic.description.clone(),
        topic.tags.join(";"),
        topic.difficulty.to_string(),
        topic.duration_estimate.to_string(),
        topic.is_featured.to_string(),
        topic.learning_outcomes.join(";"),
        topic.prerequisites.join(";"),
        topic.related_portfolio_slug.clone().unwrap_or_default(),
    ]
}
