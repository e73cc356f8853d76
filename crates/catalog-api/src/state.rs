use std::sync::Arc;

use catalog_db::TopicStore;
use tokio::sync::RwLock;

use crate::ApiConfig;

/// Shared handler state.
///
/// The catalog lives in one store behind a lock; every import, export or
/// migration holds it for the whole batch.
#[derive(Clone, Debug)]
pub struct ApiState {
    /// The catalog
    pub store: Arc<RwLock<TopicStore>>,
}

impl ApiState {
    /// State over the seed catalog, or an empty one when seeding is off
    pub fn new(config: &ApiConfig) -> Self {
        let store = if config.seed_on_start {
            TopicStore::seeded()
        } else {
            tracing::warn!("Starting with an empty catalog (seed_on_start is disabled)");
            TopicStore::new()
        };
        tracing::info!(topics = store.len(), "Catalog store initialized");

        Self::with_store(store)
    }

    /// State around an existing store
    pub fn with_store(store: TopicStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed_on_start: &str) -> ApiConfig {
        envy::prefixed("CATALOG_")
            .from_iter(vec![("CATALOG_SEED_ON_START".to_string(), seed_on_start.to_string())])
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_state_follows_seed_setting() {
        let seeded = ApiState::new(&config("true"));
        assert_eq!(seeded.store.read().await.len(), TopicStore::seeded().len());

        let empty = ApiState::new(&config("false"));
        assert!(empty.store.read().await.is_empty());
    }
}
