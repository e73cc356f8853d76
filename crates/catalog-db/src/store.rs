use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::{
    models::{CatalogStats, Topic},
    seed,
};

/// Outcome of [`TopicStore::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The slug was new and the topic was appended
    Inserted,
    /// A topic with the same slug was replaced in place
    Replaced,
}

/// Ordered in-memory topic collection, keyed by slug.
///
/// Insertion order is the catalog order. Replacing a topic keeps its position,
/// deleting one keeps the relative order of the rest.
#[derive(Debug, Clone, Default)]
pub struct TopicStore {
    topics: IndexMap<String, Topic>,
}

impl TopicStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from topics, later duplicates replacing earlier ones
    pub fn from_topics(topics: impl IntoIterator<Item = Topic>) -> Self {
        let mut store = Self::new();
        for topic in topics {
            store.upsert(topic);
        }
        store
    }

    /// Store holding the built-in catalog
    pub fn seeded() -> Self {
        Self::from_topics(seed::seed_topics())
    }

    /// Insert a topic, or fully replace the one sharing its slug
    pub fn upsert(&mut self, topic: Topic) -> Upsert {
        match self.topics.insert(topic.slug.clone(), topic) {
            Some(_) => Upsert::Replaced,
            None => Upsert::Inserted,
        }
    }

    /// Topic with the given slug
    pub fn get_by_slug(&self, slug: &str) -> Option<&Topic> {
        self.topics.get(slug)
    }

    /// First topic with the given id. Ids are not unique keys, slugs are.
    pub fn get_by_id(&self, id: &str) -> Option<&Topic> {
        self.topics.values().find(|t| t.id == id)
    }

    /// Remove a topic by slug. Returns `false` if no topic had that slug.
    pub fn delete(&mut self, slug: &str) -> bool {
        self.topics.shift_remove(slug).is_some()
    }

    /// Owned copy of every topic, in catalog order
    pub fn all(&self) -> Vec<Topic> {
        self.topics.values().cloned().collect()
    }

    /// Topics in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    /// Apply `f` to every topic, returning how many it reported as changed.
    ///
    /// `f` must leave the slug untouched.
    pub fn update_each<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&mut Topic) -> bool,
    {
        let mut changed = 0;
        for (slug, topic) in self.topics.iter_mut() {
            if f(topic) {
                changed += 1;
            }
            debug_assert_eq!(slug, &topic.slug, "slug changed during update");
        }
        changed
    }

    /// Number of topics
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether the store holds no topics
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Totals over the whole catalog
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.topics.len(),
            ..CatalogStats::default()
        };
        let mut tags = BTreeSet::new();

        for topic in self.topics.values() {
            stats.by_difficulty.record(topic.difficulty);
            if topic.is_featured {
                stats.featured += 1;
            }
            stats.total_duration += u64::from(topic.duration_estimate);
            tags.extend(topic.tags.iter().cloned());
        }

        stats.unique_tags = tags.into_iter().collect();
        stats
    }
}
