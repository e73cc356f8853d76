//! One-shot repairs for topics that predate a schema addition.
//!
//! Every pass only fills fields that are absent or empty and never overwrites
//! a present value, so running a pass twice changes nothing the second time.

use catalog_db::{DEFAULT_AUTHOR_ID, Difficulty, Topic, TopicStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validator::{REQUIRED_FIELDS, describe, is_truthy, parse_duration};

/// Outcome of a single migration pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Topics the pass changed
    pub updated: usize,
    /// Topics the pass looked at
    pub total: usize,
}

/// Reports of every pass run by [`run_all_backfills`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillSummary {
    /// [`migrate_schema`]
    pub schema: MigrationReport,
    /// [`backfill_learning_outcomes`]
    pub learning_outcomes: MigrationReport,
    /// [`backfill_prerequisites`]
    pub prerequisites: MigrationReport,
    /// [`backfill_related_portfolio`]
    pub related_portfolio: MigrationReport,
}

/// A record that failed the validation sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidTopic {
    /// Position of the record in the input
    pub index: usize,
    /// Slug of the record, when it has a string one
    pub slug: Option<String>,
    /// Every problem found, in check order
    pub errors: Vec<String>,
}

/// Result of [`validate_topics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSweep {
    /// Records with no problems
    pub valid: usize,
    /// Records with at least one problem
    pub invalid: Vec<InvalidTopic>,
}

fn learning_outcomes_for(slug: &str) -> Option<&'static [&'static str]> {
    let outcomes: &[&str] = match slug {
        "prompt-engineering-fundamentals" => &[
            "Structure prompts with roles, context and explicit output formats",
            "Use few-shot examples to steer model behaviour",
            "Evaluate prompt variants against a small test set",
        ],
        "python-for-ai" => &[
            "Work comfortably in notebooks and virtual environments",
            "Load, clean and explore tabular data with pandas",
            "Call hosted model APIs from Python scripts",
        ],
        "building-rag-pipelines" => &[
            "Chunk and embed documents for retrieval",
            "Combine retrieved context with generation prompts",
            "Measure retrieval quality and answer faithfulness",
        ],
        "vector-databases" => &[
            "Choose an index type for a given recall and latency budget",
            "Run filtered similarity search at scale",
        ],
        "fine-tuning-llms" => &[
            "Prepare instruction datasets for supervised fine-tuning",
            "Apply parameter-efficient tuning methods such as LoRA",
            "Compare tuned and base models with held-out evaluations",
        ],
        "mlops-deployment" => &[
            "Package a model behind a versioned inference API",
            "Monitor drift and latency in production",
            "Roll back a bad model release safely",
        ],
        "responsible-ai" => &[
            "Identify sources of bias in training data and outputs",
            "Apply privacy safeguards to user data",
            "Map product decisions to governance requirements",
        ],
        _ => return None,
    };
    Some(outcomes)
}

fn generic_learning_outcomes(title: &str) -> Vec<String> {
    vec![
        format!("Explain the core concepts behind {title}"),
        format!("Apply {title} techniques in a hands-on project"),
        format!("Recognise common pitfalls when working with {title}"),
    ]
}

fn prerequisites_for(slug: &str) -> Option<&'static [&'static str]> {
    let prerequisites: &[&str] = match slug {
        "fine-tuning-llms" => &[
            "Python for AI Practitioners",
            "Building RAG Pipelines",
            "Basic understanding of neural network training",
        ],
        "ai-agent-architecture" => &[
            "Prompt Engineering Fundamentals",
            "Building RAG Pipelines",
        ],
        "mlops-deployment" => &[
            "Python for AI Practitioners",
            "Familiarity with containers and CI pipelines",
        ],
        _ => return None,
    };
    Some(prerequisites)
}

const GENERIC_PREREQUISITES: [&str; 2] = [
    "Completion of an intermediate course in the same track",
    "Comfortable writing and debugging Python code",
];

fn related_portfolio_for(slug: &str) -> Option<&'static [&'static str]> {
    let projects: &[&str] = match slug {
        "prompt-engineering-fundamentals" => &["prompt-playground"],
        "building-rag-pipelines" => &["docs-qa-assistant", "support-search-bot"],
        "vector-databases" => &["semantic-search-demo"],
        "fine-tuning-llms" => &["domain-tuned-summarizer"],
        "ai-agent-architecture" => &["research-agent", "support-search-bot"],
        _ => return None,
    };
    Some(projects)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Run `fill` over every topic, stamping `updated_at` on the ones it changed
fn backfill<F>(store: &mut TopicStore, pass: &str, mut fill: F) -> MigrationReport
where
    F: FnMut(&mut Topic) -> bool,
{
    let now = Utc::now();
    let updated = store.update_each(|topic| {
        let changed = fill(topic);
        if changed {
            topic.updated_at = Some(now);
        }
        changed
    });

    let report = MigrationReport {
        updated,
        total: store.len(),
    };
    tracing::info!(pass, updated = report.updated, total = report.total, "Backfill finished");
    report
}

/// Fill absent `author_id`, `created_at` and `updated_at`.
///
/// `related_portfolio_slug` is left alone: an absent link is already its
/// default, and [`backfill_related_portfolio`] fills it where a mapping exists.
pub fn migrate_schema(store: &mut TopicStore) -> MigrationReport {
    let now = Utc::now();
    let updated = store.update_each(|topic| {
        let mut changed = false;
        if topic.author_id.is_none() {
            topic.author_id = Some(DEFAULT_AUTHOR_ID.to_string());
            changed = true;
        }
        if topic.created_at.is_none() {
            topic.created_at = Some(now);
            changed = true;
        }
        if topic.updated_at.is_none() {
            topic.updated_at = Some(now);
            changed = true;
        }
        changed
    });

    let report = MigrationReport {
        updated,
        total: store.len(),
    };
    tracing::info!(updated = report.updated, total = report.total, "Schema migration finished");
    report
}

/// Give every topic without learning outcomes a set from the lookup table,
/// or generic ones derived from its title
pub fn backfill_learning_outcomes(store: &mut TopicStore) -> MigrationReport {
    backfill(store, "learning_outcomes", |topic| {
        if !topic.learning_outcomes.is_empty() {
            return false;
        }
        topic.learning_outcomes = learning_outcomes_for(&topic.slug)
            .map(to_strings)
            .unwrap_or_else(|| generic_learning_outcomes(&topic.title));
        true
    })
}

/// Give advanced topics without prerequisites a set from the lookup table
pub fn backfill_prerequisites(store: &mut TopicStore) -> MigrationReport {
    backfill(store, "prerequisites", |topic| {
        if topic.difficulty != Difficulty::Advanced || !topic.prerequisites.is_empty() {
            return false;
        }
        topic.prerequisites = to_strings(prerequisites_for(&topic.slug).unwrap_or(&GENERIC_PREREQUISITES));
        true
    })
}

/// Link topics to their portfolio projects when a mapping exists
pub fn backfill_related_portfolio(store: &mut TopicStore) -> MigrationReport {
    backfill(store, "related_portfolio_slug", |topic| {
        if !topic.related_portfolio_slugs().is_empty() {
            return false;
        }
        match related_portfolio_for(&topic.slug) {
            Some(projects) => {
                topic.related_portfolio_slug = Some(projects.join(","));
                true
            }
            None => false,
        }
    })
}

/// Run the schema migration and every backfill, in that order
pub fn run_all_backfills(store: &mut TopicStore) -> BackfillSummary {
    BackfillSummary {
        schema: migrate_schema(store),
        learning_outcomes: backfill_learning_outcomes(store),
        prerequisites: backfill_prerequisites(store),
        related_portfolio: backfill_related_portfolio(store),
    }
}

/// Check raw records, collecting every problem of each record
pub fn validate_topics(records: &[Value]) -> ValidationSweep {
    let mut sweep = ValidationSweep::default();

    for (index, raw) in records.iter().enumerate() {
        let errors = collect_errors(raw);
        if errors.is_empty() {
            sweep.valid += 1;
        } else {
            sweep.invalid.push(InvalidTopic {
                index,
                slug: raw.get("slug").and_then(Value::as_str).map(str::to_string),
                errors,
            });
        }
    }

    sweep
}

/// Run [`validate_topics`] over the records currently in the store
pub fn validate_store(store: &TopicStore) -> ValidationSweep {
    let records: Vec<Value> = store
        .iter()
        .map(|topic| serde_json::to_value(topic).unwrap_or(Value::Null))
        .collect();
    validate_topics(&records)
}

fn collect_errors(raw: &Value) -> Vec<String> {
    let Some(record) = raw.as_object() else {
        return vec!["Record must be an object".to_string()];
    };

    let mut errors: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !record.get(**field).is_some_and(is_truthy))
        .map(|field| format!("Missing required field: {field}"))
        .collect();

    for field in ["id", "title", "slug", "description"] {
        match record.get(field) {
            Some(Value::String(_) | Value::Null) | None => {}
            Some(Value::Number(_)) if field == "id" => {}
            Some(_) => errors.push(format!("Field {field} must be a string")),
        }
    }

    for field in ["tags", "learning_outcomes", "prerequisites"] {
        match record.get(field) {
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
            Some(Value::Array(_)) => errors.push(format!("{field} must be an array of strings")),
            Some(Value::Null) | None => {}
            Some(_) => errors.push(format!("{field} must be an array")),
        }
    }

    if let Some(value) = record.get("difficulty").filter(|v| is_truthy(v)) {
        if value.as_str().and_then(|s| s.parse::<Difficulty>().ok()).is_none() {
            errors.push(format!("Invalid difficulty: {}", describe(value)));
        }
    }

    if let Some(value) = record.get("duration_estimate").filter(|v| is_truthy(v)) {
        if parse_duration(value).is_none() {
            errors.push(format!("Invalid duration_estimate: {}", describe(value)));
        }
    }

    match record.get("is_featured") {
        Some(Value::Bool(_) | Value::Null) | None => {}
        Some(other) => errors.push(format!("is_featured must be a boolean, got {other}")),
    }

    errors
}
