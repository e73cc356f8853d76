use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author recorded on topics that do not name one
pub const DEFAULT_AUTHOR_ID: &str = "system";

/// Course difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// No prior experience needed
    Beginner,
    /// Builds on the beginner courses
    Intermediate,
    /// Assumes working knowledge of the field
    Advanced,
}

impl Difficulty {
    /// All levels, easiest first
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Level name as written in imports and exports
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A difficulty name that is not one of the three levels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid difficulty: {0}")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    /// Exact, case-sensitive match on the level name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

/// Topic model - a course in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Opaque identifier assigned by the import source
    pub id: String,
    /// Course title
    pub title: String,
    /// Unique human-readable key, used to match records on import
    pub slug: String,
    /// Course description
    pub description: String,
    /// Filter tags, in insertion order
    pub tags: Vec<String>,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Estimated duration in minutes (always positive)
    pub duration_estimate: u32,
    /// Whether the course is highlighted on the landing page
    #[serde(default)]
    pub is_featured: bool,
    /// What a learner can do after the course
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    /// What a learner should know before starting
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Comma-joined slugs of related portfolio projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_portfolio_slug: Option<String>,
    /// Author of the course (absent on records that predate authorship)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    /// When the topic was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the topic was last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Topic {
    /// Related portfolio slugs, split out of the comma-joined field
    pub fn related_portfolio_slugs(&self) -> Vec<&str> {
        self.related_portfolio_slug
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Topic count per difficulty level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DifficultyBreakdown {
    /// Beginner topics
    pub beginner: usize,
    /// Intermediate topics
    pub intermediate: usize,
    /// Advanced topics
    pub advanced: usize,
}

impl DifficultyBreakdown {
    pub(crate) fn record(&mut self, difficulty: Difficulty) {
        match difficulty {
            Difficulty::Beginner => self.beginner += 1,
            Difficulty::Intermediate => self.intermediate += 1,
            Difficulty::Advanced => self.advanced += 1,
        }
    }
}

/// Aggregate figures over the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    /// Number of topics
    pub total: usize,
    /// Topic count per level
    pub by_difficulty: DifficultyBreakdown,
    /// Featured topics
    pub featured: usize,
    /// Sum of all duration estimates, in minutes
    pub total_duration: u64,
    /// Sorted, deduplicated tags
    pub unique_tags: Vec<String>,
}
