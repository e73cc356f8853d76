//! In-memory topic catalog for the course site.
//!
//! The catalog has no external persistence: a [`TopicStore`] lives for as long
//! as the process does and starts from the built-in seed data.

pub mod models;
pub mod seed;
pub mod store;

pub use models::{
    CatalogStats, DEFAULT_AUTHOR_ID, Difficulty, DifficultyBreakdown, ParseDifficultyError, Topic,
};
pub use store::{TopicStore, Upsert};
