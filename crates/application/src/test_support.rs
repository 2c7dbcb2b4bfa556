//! In-memory fakes shared by the application tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use salesdesk_core::{AppResult, RemoteError};
use salesdesk_domain::{ConfirmedEntity, EntityDraft, ListQuery, MutationOperation};
use serde_json::Value;
use tokio::sync::{Mutex, Notify};

use crate::{ListCacheStore, ListUpdate, RemoteDataService};

/// Scripted answer to one mutation.
pub(crate) enum Reply {
    /// Confirms the draft under this id.
    Confirm(&'static str),
    /// Fails with this raw message.
    Fail(&'static str),
}

#[derive(Default)]
pub(crate) struct FakeRemote {
    replies: parking_lot::Mutex<VecDeque<Reply>>,
    inputs: parking_lot::Mutex<Vec<(MutationOperation, Value)>>,
    calls: AtomicUsize,
    queries: AtomicUsize,
    gate: Option<Arc<Notify>>,
    listing: Vec<Value>,
    offline: bool,
}

impl FakeRemote {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: parking_lot::Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Holds every mutation until `gate` is notified.
    pub(crate) fn gated(replies: Vec<Reply>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(replies)
        }
    }

    /// Answers every list query with these payloads.
    pub(crate) fn listing(listing: Vec<Value>) -> Self {
        Self {
            listing,
            ..Self::default()
        }
    }

    /// Fails every list query.
    pub(crate) fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub(crate) fn inputs(&self) -> Vec<(MutationOperation, Value)> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl RemoteDataService for FakeRemote {
    async fn mutate(
        &self,
        operation: MutationOperation,
        input: &EntityDraft,
    ) -> Result<ConfirmedEntity, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().push((operation, input.to_value()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Reply::Confirm(id)) => {
                let mut payload = input.data().clone();
                payload.insert("id".to_owned(), Value::from(id));
                ConfirmedEntity::from_payload(operation.entity(), Value::Object(payload))
                    .map_err(|error| RemoteError::new(error.to_string()))
            }
            Some(Reply::Fail(message)) => Err(RemoteError::new(message)),
            None => Err(RemoteError::new("remote error: no scripted reply")),
        }
    }

    async fn query(&self, query: ListQuery) -> Result<Vec<ConfirmedEntity>, RemoteError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(RemoteError::new("remote error: offline"));
        }

        self.listing
            .iter()
            .map(|payload| {
                ConfirmedEntity::from_payload(query.entity(), payload.clone())
                    .map_err(|error| RemoteError::new(error.to_string()))
            })
            .collect()
    }
}

/// Cache store over a map. A suspending cache yields to the scheduler before
/// touching the map, like a store backed by I/O.
#[derive(Default)]
pub(crate) struct FakeCache {
    lists: Mutex<HashMap<ListQuery, Vec<ConfirmedEntity>>>,
    suspending: bool,
}

impl FakeCache {
    /// Creates a cache where each query starts as a loaded empty list.
    pub(crate) fn loaded(queries: &[ListQuery]) -> Arc<Self> {
        Arc::new(Self {
            lists: Mutex::new(queries.iter().map(|query| (*query, Vec::new())).collect()),
            suspending: false,
        })
    }

    pub(crate) fn suspending(queries: &[ListQuery]) -> Arc<Self> {
        Arc::new(Self {
            lists: Mutex::new(queries.iter().map(|query| (*query, Vec::new())).collect()),
            suspending: true,
        })
    }

    pub(crate) async fn payloads(&self, query: ListQuery) -> Option<Vec<Value>> {
        self.lists
            .lock()
            .await
            .get(&query)
            .map(|list| list.iter().map(|entity| entity.data().clone()).collect())
    }

    pub(crate) async fn ids(&self, query: ListQuery) -> Option<Vec<String>> {
        self.lists.lock().await.get(&query).map(|list| {
            list.iter()
                .map(|entity| entity.id().as_str().to_owned())
                .collect()
        })
    }

    pub(crate) async fn is_empty(&self) -> bool {
        self.lists.lock().await.is_empty()
    }

    async fn suspend(&self) {
        if self.suspending {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ListCacheStore for FakeCache {
    async fn read_list(&self, query: ListQuery) -> AppResult<Option<Vec<ConfirmedEntity>>> {
        self.suspend().await;
        Ok(self.lists.lock().await.get(&query).cloned())
    }

    async fn write_list(&self, query: ListQuery, list: Vec<ConfirmedEntity>) -> AppResult<()> {
        self.suspend().await;
        self.lists.lock().await.insert(query, list);
        Ok(())
    }

    async fn update_list(&self, query: ListQuery, update: ListUpdate) -> AppResult<Option<usize>> {
        self.suspend().await;
        let mut lists = self.lists.lock().await;
        let Some(list) = lists.get_mut(&query) else {
            return Ok(None);
        };

        let next = update(list.as_slice());
        *list = next;
        Ok(Some(list.len()))
    }
}
