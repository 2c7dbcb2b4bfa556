use std::sync::Arc;

use salesdesk_core::{AppError, AppResult};
use salesdesk_domain::{ConfirmedEntity, ListQuery};
use tracing::debug;

use crate::ListCacheStore;

/// Returns `prior` with `confirmed` merged in by id.
///
/// An element with the same id is replaced where it stands; otherwise the
/// entity is appended. `prior` is never modified.
#[must_use]
pub fn merge(prior: &[ConfirmedEntity], confirmed: ConfirmedEntity) -> Vec<ConfirmedEntity> {
    let mut next = prior.to_vec();
    upsert(&mut next, confirmed);
    next
}

/// Collapses duplicate ids, keeping the first position and the last value.
#[must_use]
pub fn dedupe_by_id(list: Vec<ConfirmedEntity>) -> Vec<ConfirmedEntity> {
    let mut deduped = Vec::with_capacity(list.len());
    for entity in list {
        upsert(&mut deduped, entity);
    }
    deduped
}

fn upsert(list: &mut Vec<ConfirmedEntity>, confirmed: ConfirmedEntity) {
    match list
        .iter()
        .position(|existing| existing.id() == confirmed.id())
    {
        Some(index) => list[index] = confirmed,
        None => list.push(confirmed),
    }
}

/// Writes server-confirmed entities back into cached list query results.
#[derive(Clone)]
pub struct ListCacheUpdater {
    store: Arc<dyn ListCacheStore>,
}

impl ListCacheUpdater {
    /// Creates an updater over a cache store.
    #[must_use]
    pub fn new(store: Arc<dyn ListCacheStore>) -> Self {
        Self { store }
    }

    /// Merges a confirmed entity into the cached result of `query`.
    ///
    /// The merge runs inside one store update, so concurrent merges into the
    /// same list never drop each other's entity.
    ///
    /// Returns the new list length. Fails with [`AppError::CacheReadMissing`]
    /// when the list was never loaded; the entity then shows up on the next
    /// full query instead.
    pub async fn apply(&self, query: ListQuery, confirmed: ConfirmedEntity) -> AppResult<usize> {
        if confirmed.entity() != query.entity() {
            return Err(AppError::Validation(format!(
                "cannot merge a {} into the '{query}' list",
                confirmed.entity()
            )));
        }

        let len = self
            .store
            .update_list(query, Box::new(move |prior: &[ConfirmedEntity]| merge(prior, confirmed)))
            .await?
            .ok_or_else(|| AppError::CacheReadMissing(query.as_str().to_owned()))?;

        debug!(query = %query, len, "merged confirmed entity into cached list");
        Ok(len)
    }
}
