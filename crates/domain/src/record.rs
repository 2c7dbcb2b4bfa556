use salesdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::EntityKind;

/// Unconfirmed record built from a form's current values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDraft {
    entity: EntityKind,
    data: Map<String, Value>,
}

impl EntityDraft {
    /// Creates a draft from coerced field values.
    #[must_use]
    pub fn new(entity: EntityKind, data: Map<String, Value>) -> Self {
        Self { entity, data }
    }

    /// Returns the entity kind.
    #[must_use]
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Returns one field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Returns the draft fields.
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the draft as the JSON object sent to the remote side.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

/// Record returned by the remote side after a successful mutation or query.
///
/// Immutable once built; the payload always carries the `id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedEntity {
    id: RecordId,
    entity: EntityKind,
    data: Value,
}

impl ConfirmedEntity {
    /// Creates a confirmed entity from a remote JSON object carrying a string `id`.
    pub fn from_payload(entity: EntityKind, data: Value) -> AppResult<Self> {
        let Some(object) = data.as_object() else {
            return Err(AppError::Validation(format!(
                "confirmed {entity} payload must be a JSON object"
            )));
        };

        let id = match object.get("id") {
            Some(Value::String(id)) => RecordId::new(id.as_str())?,
            Some(Value::Number(id)) => RecordId::new(id.to_string())?,
            _ => {
                return Err(AppError::Validation(format!(
                    "confirmed {entity} payload is missing its id"
                )));
            }
        };

        Ok(Self { id, entity, data })
    }

    /// Returns the server-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns the entity kind.
    #[must_use]
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Returns one field of the payload.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Returns the record JSON object.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ConfirmedEntity;
    use crate::EntityKind;

    #[test]
    fn confirmed_entity_requires_object_payload() {
        let result = ConfirmedEntity::from_payload(EntityKind::Product, json!("p1"));
        assert!(result.is_err());
    }

    #[test]
    fn confirmed_entity_requires_id() {
        let result = ConfirmedEntity::from_payload(EntityKind::Product, json!({"name": "Widget"}));
        assert!(result.is_err());

        let blank = ConfirmedEntity::from_payload(EntityKind::Product, json!({"id": " "}));
        assert!(blank.is_err());
    }

    #[test]
    fn confirmed_entity_keeps_full_payload() {
        let entity = ConfirmedEntity::from_payload(
            EntityKind::Product,
            json!({"id": "p1", "name": "Widget", "stock": 5, "price": 9.99}),
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(entity.id().as_str(), "p1");
        assert_eq!(entity.get("stock"), Some(&json!(5)));
        assert_eq!(entity.data()["id"], json!("p1"));
    }
}
