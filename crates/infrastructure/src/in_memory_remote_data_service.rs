use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use salesdesk_application::RemoteDataService;
use salesdesk_core::{AppResult, RemoteError};
use salesdesk_domain::{ConfirmedEntity, EntityDraft, EntityKind, ListQuery, MutationOperation};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// In-memory remote data service.
///
/// Confirms drafts with a fresh uuid, keeps every confirmed record, and
/// answers list queries from what it holds.
#[derive(Debug, Default)]
pub struct InMemoryRemoteDataService {
    records: RwLock<HashMap<EntityKind, Vec<ConfirmedEntity>>>,
    next_failure: Mutex<Option<String>>,
}

impl InMemoryRemoteDataService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record as if it had been created earlier. The payload must carry its own `id`.
    pub async fn seed(&self, entity: EntityKind, payload: Value) -> AppResult<ConfirmedEntity> {
        let record = ConfirmedEntity::from_payload(entity, payload)?;
        self.records
            .write()
            .await
            .entry(entity)
            .or_default()
            .push(record.clone());

        debug!(entity = %entity, id = %record.id(), "seeded remote record");
        Ok(record)
    }

    /// Makes the next mutation fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_failure.lock() = Some(message.into());
    }
}

#[async_trait]
impl RemoteDataService for InMemoryRemoteDataService {
    async fn mutate(
        &self,
        operation: MutationOperation,
        input: &EntityDraft,
    ) -> Result<ConfirmedEntity, RemoteError> {
        let injected = self.next_failure.lock().take();
        if let Some(message) = injected {
            return Err(RemoteError::new(message));
        }

        let entity = operation.entity();
        if input.entity() != entity {
            return Err(RemoteError::new(format!(
                "remote error: {operation} does not accept a {} draft",
                input.entity()
            )));
        }

        let mut records = self.records.write().await;
        let stored = records.entry(entity).or_default();

        if matches!(entity, EntityKind::User | EntityKind::Client)
            && let Some(email) = input.get("email").and_then(Value::as_str)
            && stored.iter().any(|record| same_email(record, email))
        {
            return Err(RemoteError::new("remote error: duplicate email"));
        }

        let mut data: Map<String, Value> = input.data().clone();
        data.remove("password");
        data.insert("id".to_owned(), Value::String(Uuid::new_v4().to_string()));
        if entity == EntityKind::Product {
            data.insert(
                "created".to_owned(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }

        let confirmed = ConfirmedEntity::from_payload(entity, Value::Object(data))
            .map_err(|error| RemoteError::new(format!("remote error: {error}")))?;
        stored.push(confirmed.clone());

        info!(operation = %operation, id = %confirmed.id(), "remote mutation applied");
        Ok(confirmed)
    }

    async fn query(&self, query: ListQuery) -> Result<Vec<ConfirmedEntity>, RemoteError> {
        Ok(self
            .records
            .read()
            .await
            .get(&query.entity())
            .cloned()
            .unwrap_or_default())
    }
}

fn same_email(record: &ConfirmedEntity, email: &str) -> bool {
    record
        .get("email")
        .and_then(Value::as_str)
        .is_some_and(|stored| stored.trim().eq_ignore_ascii_case(email.trim()))
}
