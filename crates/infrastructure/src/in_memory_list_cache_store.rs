use std::collections::HashMap;

use async_trait::async_trait;
use salesdesk_application::{ListCacheStore, ListUpdate};
use salesdesk_core::AppResult;
use salesdesk_domain::{ConfirmedEntity, ListQuery};
use tokio::sync::RwLock;

/// In-memory cache adapter for list query results.
///
/// Writes replace the whole entry, so readers never observe a half-merged list.
#[derive(Debug, Default)]
pub struct InMemoryListCacheStore {
    entries: RwLock<HashMap<ListQuery, Vec<ConfirmedEntity>>>,
}

impl InMemoryListCacheStore {
    /// Creates an empty in-memory list cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a cached list so the next read goes back to the remote side.
    pub async fn evict(&self, query: ListQuery) -> bool {
        self.entries.write().await.remove(&query).is_some()
    }
}

#[async_trait]
impl ListCacheStore for InMemoryListCacheStore {
    async fn read_list(&self, query: ListQuery) -> AppResult<Option<Vec<ConfirmedEntity>>> {
        Ok(self.entries.read().await.get(&query).cloned())
    }

    async fn write_list(&self, query: ListQuery, list: Vec<ConfirmedEntity>) -> AppResult<()> {
        self.entries.write().await.insert(query, list);
        Ok(())
    }

    async fn update_list(&self, query: ListQuery, update: ListUpdate) -> AppResult<Option<usize>> {
        let mut entries = self.entries.write().await;
        let Some(list) = entries.get_mut(&query) else {
            return Ok(None);
        };

        let next = update(list.as_slice());
        *list = next;
        Ok(Some(list.len()))
    }
}
