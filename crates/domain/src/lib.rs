//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod entity;
mod field_rule;
mod order;
mod record;

pub use entity::{EntityKind, ListQuery, MutationOperation, NavigationTarget};
pub use field_rule::{
    FieldDefinition, FieldErrors, FieldInput, FieldKind, FieldRule, FieldRuleSet,
    ValidationError, ValidationErrorKind, validate,
};
pub use order::{OrderClient, OrderLine, OrderStatus, OrderSummary};
pub use record::{ConfirmedEntity, EntityDraft};
