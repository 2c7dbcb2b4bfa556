use std::collections::{BTreeMap, BTreeSet};

use salesdesk_core::{AppError, AppResult};
use salesdesk_domain::{
    EntityDraft, EntityKind, FieldDefinition, FieldErrors, FieldInput, FieldRuleSet,
    MutationOperation, ValidationError,
};
use serde_json::Map;

/// Draft values, touched fields, and derived errors of one data-entry form.
///
/// Errors are recomputed synchronously on every edit or blur and cover every
/// field, touched or not. Only touched fields display their error, while
/// submit readiness always looks at all of them.
#[derive(Debug, Clone)]
pub struct FormSession {
    rules: FieldRuleSet,
    operation: MutationOperation,
    values: BTreeMap<String, FieldInput>,
    touched: BTreeSet<String>,
    errors: FieldErrors,
}

impl FormSession {
    /// Creates an empty form for an entity kind that has a create mutation.
    pub fn new(entity: EntityKind) -> AppResult<Self> {
        let operation = entity.create_operation().ok_or_else(|| {
            AppError::Validation(format!("entity '{entity}' has no data-entry form"))
        })?;
        let rules = FieldRuleSet::for_entity(entity);
        let values: BTreeMap<String, FieldInput> = rules
            .fields()
            .iter()
            .map(|field| (field.name().to_owned(), FieldInput::default()))
            .collect();
        let errors = rules.validate(&values);

        Ok(Self {
            rules,
            operation,
            values,
            touched: BTreeSet::new(),
            errors,
        })
    }

    /// Returns the entity kind being drafted.
    #[must_use]
    pub fn entity(&self) -> EntityKind {
        self.rules.entity()
    }

    /// Returns the mutation a submit of this form runs.
    #[must_use]
    pub fn operation(&self) -> MutationOperation {
        self.operation
    }

    /// Updates a value, marks the field touched, and revalidates it.
    pub fn set_value(&mut self, field: &str, raw: impl Into<FieldInput>) -> AppResult<()> {
        let definition = self.definition(field)?;
        self.values
            .insert(definition.name().to_owned(), raw.into());
        self.touch(definition);
        Ok(())
    }

    /// Marks a field touched without changing it, as on blur.
    pub fn mark_touched(&mut self, field: &str) -> AppResult<()> {
        let definition = self.definition(field)?;
        self.touch(definition);
        Ok(())
    }

    /// Marks every field touched so all errors become visible after a submit attempt.
    pub fn mark_all_touched(&mut self) {
        for definition in self.rules.fields() {
            self.touch(definition);
        }
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&FieldInput> {
        self.values.get(field)
    }

    /// Returns all raw values.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, FieldInput> {
        &self.values
    }

    /// Returns whether the user interacted with a field.
    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Returns the computed error of a field, displayed or not.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    /// Returns every computed error.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the error to display for a field: only touched fields show one.
    #[must_use]
    pub fn visible_error(&self, field: &str) -> Option<&ValidationError> {
        self.errors
            .get(field)
            .filter(|_| self.touched.contains(field))
    }

    /// Returns the errors currently displayed.
    pub fn visible_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors
            .iter()
            .filter(|(field, _)| self.touched.contains(field.as_str()))
            .map(|(_, error)| error)
    }

    /// Returns whether no field has an error, regardless of touch state.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the draft with values coerced to their semantic types.
    pub fn snapshot(&self) -> AppResult<EntityDraft> {
        if !self.is_submittable() {
            return Err(AppError::Validation(format!(
                "{} form has {} invalid field(s)",
                self.entity(),
                self.errors.len()
            )));
        }

        let mut data = Map::new();
        for definition in self.rules.fields() {
            let input = self
                .values
                .get(definition.name())
                .cloned()
                .unwrap_or_default();

            match definition.coerce(&input) {
                Some(value) => {
                    data.insert(definition.name().to_owned(), value);
                }
                None if definition.rule().is_required() => {
                    return Err(AppError::Validation(format!(
                        "field '{}' has no usable value",
                        definition.name()
                    )));
                }
                None => {}
            }
        }

        Ok(EntityDraft::new(self.entity(), data))
    }

    fn definition(&self, field: &str) -> AppResult<&'static FieldDefinition> {
        self.rules.field(field).ok_or_else(|| {
            AppError::Validation(format!(
                "unknown field '{field}' for entity '{}'",
                self.entity()
            ))
        })
    }

    fn touch(&mut self, definition: &FieldDefinition) {
        let name = definition.name();
        self.touched.insert(name.to_owned());

        match self.rules.validate_field(name, self.values.get(name)) {
            Some(error) => {
                self.errors.insert(name.to_owned(), error);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }
}
