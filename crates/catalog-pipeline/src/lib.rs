//! Topic import, validation, export and migration for the course catalog.
//!
//! Every operation works on a caller-owned [`TopicStore`] and reports bad input
//! as diagnostics in its result rather than failing the whole call.

pub mod export;
pub mod import;
pub mod migration;
pub mod validator;

pub use catalog_db::TopicStore;
pub use export::{CSV_COLUMNS, ExportError, export_to_csv, export_to_json, export_to_json_string};
pub use import::{ImportReport, import_from_csv, import_from_json, import_from_json_str};
pub use migration::{
    BackfillSummary, InvalidTopic, MigrationReport, ValidationSweep, backfill_learning_outcomes,
    backfill_prerequisites, backfill_related_portfolio, migrate_schema, run_all_backfills,
    validate_store, validate_topics,
};
pub use validator::{REQUIRED_FIELDS, ValidationError, validate_topic, validate_topic_at};
