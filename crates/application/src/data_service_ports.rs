use async_trait::async_trait;
use salesdesk_core::{AppResult, RemoteError};
use salesdesk_domain::{
    ConfirmedEntity, EntityDraft, ListQuery, MutationOperation, NavigationTarget,
};

/// Port for the remote side that executes mutations and list queries.
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    /// Executes one create mutation and returns the confirmed record.
    async fn mutate(
        &self,
        operation: MutationOperation,
        input: &EntityDraft,
    ) -> Result<ConfirmedEntity, RemoteError>;

    /// Runs a list query against the remote side, bypassing the cache.
    async fn query(&self, query: ListQuery) -> Result<Vec<ConfirmedEntity>, RemoteError>;
}

/// Replacement list computed from the currently cached one.
pub type ListUpdate = Box<dyn FnOnce(&[ConfirmedEntity]) -> Vec<ConfirmedEntity> + Send>;

/// Keyed store holding the last known result of each list query.
///
/// Implementations replace a keyed entry as a whole: readers see either the
/// previous list or the new one, never a partial write.
#[async_trait]
pub trait ListCacheStore: Send + Sync {
    /// Returns the cached list, or `None` when the query was never loaded.
    async fn read_list(&self, query: ListQuery) -> AppResult<Option<Vec<ConfirmedEntity>>>;

    /// Replaces the cached list for one query.
    async fn write_list(&self, query: ListQuery, list: Vec<ConfirmedEntity>) -> AppResult<()>;

    /// Replaces a cached list with `update(current)` as one step, so no other
    /// write can land between the read and the write.
    ///
    /// Returns the new length, or `None` without calling `update` when the
    /// query was never loaded.
    async fn update_list(&self, query: ListQuery, update: ListUpdate) -> AppResult<Option<usize>>;
}

/// Port for the view layer's navigation and modal side effects.
pub trait Navigator: Send + Sync {
    /// Moves the screen to another view.
    fn navigate(&self, target: NavigationTarget);

    /// Shows a blocking confirmation modal.
    fn alert(&self, title: &str, text: &str);
}
