use std::sync::Arc;

use salesdesk_core::AppResult;
use salesdesk_domain::{ConfirmedEntity, ListQuery};
use tracing::{debug, info};

use crate::{ListCacheStore, RemoteDataService, dedupe_by_id};

/// Cache-first reads of list queries.
#[derive(Clone)]
pub struct ListQueryService {
    remote: Arc<dyn RemoteDataService>,
    cache: Arc<dyn ListCacheStore>,
}

impl ListQueryService {
    /// Creates a list query service.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteDataService>, cache: Arc<dyn ListCacheStore>) -> Self {
        Self { remote, cache }
    }

    /// Returns the cached list, querying the remote side only on a cache miss.
    pub async fn load(&self, query: ListQuery) -> AppResult<Vec<ConfirmedEntity>> {
        if let Some(list) = self.cache.read_list(query).await? {
            debug!(query = %query, len = list.len(), "list served from cache");
            return Ok(list);
        }

        self.refresh(query).await
    }

    /// Re-runs the query and replaces the cached list with the result.
    pub async fn refresh(&self, query: ListQuery) -> AppResult<Vec<ConfirmedEntity>> {
        let list = dedupe_by_id(self.remote.query(query).await?);
        self.cache.write_list(query, list.clone()).await?;

        info!(query = %query, len = list.len(), "list loaded from remote");
        Ok(list)
    }
}
