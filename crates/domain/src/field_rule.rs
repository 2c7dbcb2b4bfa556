//! Declarative per-field validation rules for the data-entry forms.
//!
//! Every entity with a form has a fixed rule table: each field has exactly one
//! rule and rules never look at other fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::EntityKind;

/// Maximum accepted length of an email address.
const EMAIL_MAX_LENGTH: usize = 254;

/// Semantic type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, trimmed on submit.
    Text,
    /// Whole number greater than zero.
    Integer,
    /// Number greater than zero.
    PositiveDecimal,
    /// `local@domain` address.
    Email,
}

impl FieldKind {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::PositiveDecimal => "positive_decimal",
            Self::Email => "email",
        }
    }

    fn check(self, input: &FieldInput) -> Option<ValidationErrorKind> {
        match self {
            Self::Text => None,
            Self::Integer => match input.as_number() {
                Some(number) if is_whole(number) => {
                    (number <= 0.0).then_some(ValidationErrorKind::OutOfRange)
                }
                _ => Some(ValidationErrorKind::InvalidType),
            },
            Self::PositiveDecimal => match input.as_number() {
                Some(number) => (number <= 0.0).then_some(ValidationErrorKind::OutOfRange),
                None => Some(ValidationErrorKind::InvalidType),
            },
            Self::Email => (!is_email_shape(input.as_text().as_str()))
                .then_some(ValidationErrorKind::InvalidFormat),
        }
    }

    fn coerce(self, input: &FieldInput) -> Option<Value> {
        match self {
            Self::Text | Self::Email => Some(Value::String(input.as_text())),
            Self::Integer => input
                .as_number()
                .filter(|number| is_whole(*number))
                .map(|number| Value::from(number as i64)),
            Self::PositiveDecimal => input
                .as_number()
                .and_then(Number::from_f64)
                .map(Value::Number),
        }
    }
}

/// Validation rule attached to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    required: bool,
    kind: FieldKind,
    min_length: Option<usize>,
}

impl FieldRule {
    /// Creates a rule for a field that must be filled in.
    #[must_use]
    pub const fn required(kind: FieldKind) -> Self {
        Self {
            required: true,
            kind,
            min_length: None,
        }
    }

    /// Creates a rule for a field that may be left empty.
    #[must_use]
    pub const fn optional(kind: FieldKind) -> Self {
        Self {
            required: false,
            kind,
            min_length: None,
        }
    }

    /// Adds a minimum character count.
    #[must_use]
    pub const fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Returns whether the field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the semantic kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the minimum length, if any.
    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Evaluates the rule. `None` input is treated as an empty value.
    ///
    /// Only the first failure is reported: missing value, then kind, then length.
    #[must_use]
    pub fn check(&self, input: Option<&FieldInput>) -> Option<ValidationErrorKind> {
        let Some(input) = input.filter(|input| !input.is_blank()) else {
            return self.required.then_some(ValidationErrorKind::MissingValue);
        };

        if let Some(kind) = self.kind.check(input) {
            return Some(kind);
        }

        let min_length = self.min_length?;
        (input.as_text().chars().count() < min_length).then_some(ValidationErrorKind::TooShort)
    }
}

/// A field name, its display label, and its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    name: &'static str,
    label: &'static str,
    rule: FieldRule,
}

impl FieldDefinition {
    const fn new(name: &'static str, label: &'static str, rule: FieldRule) -> Self {
        Self { name, label, rule }
    }

    /// Returns the field name used in drafts and on the wire.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Returns the validation rule.
    #[must_use]
    pub fn rule(&self) -> FieldRule {
        self.rule
    }

    fn message(&self, kind: ValidationErrorKind) -> String {
        let label = self.label;
        match kind {
            ValidationErrorKind::MissingValue => format!("{label} is required"),
            ValidationErrorKind::InvalidType => match self.rule.kind {
                FieldKind::Integer => format!("{label} must be a whole number"),
                _ => format!("{label} must be a number"),
            },
            ValidationErrorKind::OutOfRange => format!("{label} must be greater than zero"),
            ValidationErrorKind::InvalidFormat => format!("{label} is not a valid email address"),
            ValidationErrorKind::TooShort => format!(
                "{label} must be at least {} characters",
                self.rule.min_length.unwrap_or_default()
            ),
        }
    }

    /// Coerces a raw value to its JSON representation for submission.
    #[must_use]
    pub fn coerce(&self, input: &FieldInput) -> Option<Value> {
        self.rule.kind.coerce(input)
    }
}

static USER_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::new("name", "Name", FieldRule::required(FieldKind::Text)),
    FieldDefinition::new("lastName", "Last name", FieldRule::required(FieldKind::Text)),
    FieldDefinition::new("email", "Email", FieldRule::required(FieldKind::Email)),
    FieldDefinition::new(
        "password",
        "Password",
        FieldRule::required(FieldKind::Text).with_min_length(6),
    ),
];

static CLIENT_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::new("name", "Client name", FieldRule::required(FieldKind::Text)),
    FieldDefinition::new(
        "lastName",
        "Client last name",
        FieldRule::required(FieldKind::Text),
    ),
    FieldDefinition::new("company", "Company", FieldRule::required(FieldKind::Text)),
    FieldDefinition::new("email", "Client email", FieldRule::required(FieldKind::Email)),
    FieldDefinition::new("phone", "Phone", FieldRule::optional(FieldKind::Text)),
];

static PRODUCT_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::new("name", "Product name", FieldRule::required(FieldKind::Text)),
    FieldDefinition::new("stock", "Stock", FieldRule::required(FieldKind::Integer)),
    FieldDefinition::new(
        "price",
        "Price",
        FieldRule::required(FieldKind::PositiveDecimal),
    ),
];

/// Raw value entered into a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    /// Text typed by the user.
    Text(String),
    /// Value from a numeric input.
    Number(f64),
}

impl FieldInput {
    /// Returns whether the value counts as not filled in.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Returns the value as a finite number, parsing text when needed.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Number(number) => *number,
        };

        number.is_finite().then_some(number)
    }

    /// Returns the trimmed textual form of the value.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_owned(),
            Self::Number(number) if is_whole(*number) => format!("{}", *number as i64),
            Self::Number(number) => number.to_string(),
        }
    }
}

impl Default for FieldInput {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldInput {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for FieldInput {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for FieldInput {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Category of a field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Required value is empty.
    MissingValue,
    /// Value is not of the field's type.
    InvalidType,
    /// Numeric value is not greater than zero.
    OutOfRange,
    /// Value does not have the expected shape.
    InvalidFormat,
    /// Value is shorter than the minimum length.
    TooShort,
}

impl ValidationErrorKind {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingValue => "missing_value",
            Self::InvalidType => "invalid_type",
            Self::OutOfRange => "out_of_range",
            Self::InvalidFormat => "invalid_format",
            Self::TooShort => "too_short",
        }
    }
}

/// Failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    field: String,
    kind: ValidationErrorKind,
    message: String,
}

impl ValidationError {
    /// Returns the field name.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Returns the message shown next to the field.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Failing fields keyed by field name. Passing fields are absent.
pub type FieldErrors = BTreeMap<String, ValidationError>;

/// Fixed rule table for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRuleSet {
    entity: EntityKind,
    fields: &'static [FieldDefinition],
}

impl FieldRuleSet {
    /// Returns the rule table for an entity kind. Orders have no form fields.
    #[must_use]
    pub fn for_entity(entity: EntityKind) -> Self {
        let fields = match entity {
            EntityKind::User => USER_FIELDS,
            EntityKind::Client => CLIENT_FIELDS,
            EntityKind::Product => PRODUCT_FIELDS,
            EntityKind::Order => &[],
        };

        Self { entity, fields }
    }

    /// Returns the entity kind.
    #[must_use]
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Returns the field definitions in form order.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldDefinition] {
        self.fields
    }

    /// Finds one field definition.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Validates one field value. Unknown fields never fail.
    #[must_use]
    pub fn validate_field(
        &self,
        name: &str,
        input: Option<&FieldInput>,
    ) -> Option<ValidationError> {
        let field = self.field(name)?;
        let kind = field.rule.check(input)?;

        Some(ValidationError {
            field: field.name.to_owned(),
            kind,
            message: field.message(kind),
        })
    }

    /// Validates every field in the table. Missing values count as empty.
    #[must_use]
    pub fn validate(&self, values: &BTreeMap<String, FieldInput>) -> FieldErrors {
        self.fields
            .iter()
            .filter_map(|field| self.validate_field(field.name, values.get(field.name)))
            .map(|error| (error.field.clone(), error))
            .collect()
    }
}

/// Validates a value set against the fixed rules of an entity kind.
#[must_use]
pub fn validate(entity: EntityKind, values: &BTreeMap<String, FieldInput>) -> FieldErrors {
    FieldRuleSet::for_entity(entity).validate(values)
}

fn is_whole(number: f64) -> bool {
    number.fract() == 0.0 && number.abs() < 9.0e15
}

/// Structural `local@domain.tld` check.
fn is_email_shape(value: &str) -> bool {
    if value.is_empty() || value.len() > EMAIL_MAX_LENGTH || value.chars().any(char::is_whitespace)
    {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::{FieldInput, FieldRuleSet, ValidationErrorKind, validate};
    use crate::EntityKind;

    fn values(pairs: &[(&str, FieldInput)]) -> BTreeMap<String, FieldInput> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect()
    }

    fn valid_values(entity: EntityKind) -> BTreeMap<String, FieldInput> {
        match entity {
            EntityKind::User => values(&[
                ("name", "Ana".into()),
                ("lastName", "Ruiz".into()),
                ("email", "ana@example.com".into()),
                ("password", "secret1".into()),
            ]),
            EntityKind::Client => values(&[
                ("name", "Luis".into()),
                ("lastName", "Mora".into()),
                ("company", "Acme".into()),
                ("email", "luis@acme.io".into()),
                ("phone", "".into()),
            ]),
            EntityKind::Product => values(&[
                ("name", "Widget".into()),
                ("stock", 5.into()),
                ("price", 9.99.into()),
            ]),
            EntityKind::Order => BTreeMap::new(),
        }
    }

    fn kind_of(entity: EntityKind, field: &str, input: FieldInput) -> Option<ValidationErrorKind> {
        FieldRuleSet::for_entity(entity)
            .validate_field(field, Some(&input))
            .map(|error| error.kind())
    }

    #[test]
    fn fully_valid_values_have_no_errors() {
        for entity in [
            EntityKind::User,
            EntityKind::Client,
            EntityKind::Product,
            EntityKind::Order,
        ] {
            assert!(validate(entity, &valid_values(entity)).is_empty(), "{entity}");
        }
    }

    #[test]
    fn every_form_field_has_exactly_one_rule() {
        for entity in [EntityKind::User, EntityKind::Client, EntityKind::Product] {
            let rules = FieldRuleSet::for_entity(entity);
            let mut names: Vec<&str> = rules.fields().iter().map(|field| field.name()).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total);
        }
        assert!(FieldRuleSet::for_entity(EntityKind::Order).fields().is_empty());
    }

    #[test]
    fn stock_must_be_a_positive_whole_number() {
        let product = EntityKind::Product;
        assert_eq!(
            kind_of(product, "stock", "2.5".into()),
            Some(ValidationErrorKind::InvalidType)
        );
        assert_eq!(
            kind_of(product, "stock", "many".into()),
            Some(ValidationErrorKind::InvalidType)
        );
        assert_eq!(
            kind_of(product, "stock", 0.into()),
            Some(ValidationErrorKind::OutOfRange)
        );
        assert_eq!(
            kind_of(product, "stock", "-3".into()),
            Some(ValidationErrorKind::OutOfRange)
        );
        assert_eq!(kind_of(product, "stock", " 12 ".into()), None);
    }

    #[test]
    fn price_must_be_positive() {
        let product = EntityKind::Product;
        assert_eq!(
            kind_of(product, "price", (-1.5).into()),
            Some(ValidationErrorKind::OutOfRange)
        );
        assert_eq!(
            kind_of(product, "price", 0.0.into()),
            Some(ValidationErrorKind::OutOfRange)
        );
        assert_eq!(
            kind_of(product, "price", "abc".into()),
            Some(ValidationErrorKind::InvalidType)
        );
        assert_eq!(kind_of(product, "price", "0.01".into()), None);
    }

    #[test]
    fn email_shape_is_checked() {
        let client = EntityKind::Client;
        for bad in ["luis", "luis@", "@acme.io", "luis@acme", "a@b@c.io", "a b@c.io"] {
            assert_eq!(
                kind_of(client, "email", bad.into()),
                Some(ValidationErrorKind::InvalidFormat),
                "{bad}"
            );
        }
        assert_eq!(kind_of(client, "email", "luis@acme.io".into()), None);
    }

    #[test]
    fn password_needs_six_characters() {
        assert_eq!(
            kind_of(EntityKind::User, "password", "abc12".into()),
            Some(ValidationErrorKind::TooShort)
        );
        assert_eq!(kind_of(EntityKind::User, "password", "abc123".into()), None);
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let error = FieldRuleSet::for_entity(EntityKind::Client)
            .validate_field("company", Some(&"   ".into()))
            .unwrap_or_else(|| panic!("company should fail"));
        assert_eq!(error.kind(), ValidationErrorKind::MissingValue);
        assert_eq!(error.field(), "company");
        assert!(!error.message().is_empty());
    }

    #[test]
    fn optional_phone_accepts_empty_value() {
        let rules = FieldRuleSet::for_entity(EntityKind::Client);
        assert!(rules.validate_field("phone", None).is_none());
        assert!(rules.validate_field("phone", Some(&"".into())).is_none());
    }

    proptest! {
        #[test]
        fn removing_a_required_field_adds_exactly_one_missing_value(
            entity_index in 0usize..3,
            field_index in 0usize..5,
        ) {
            let entity = [EntityKind::User, EntityKind::Client, EntityKind::Product][entity_index];
            let rules = FieldRuleSet::for_entity(entity);
            let required: Vec<&str> = rules
                .fields()
                .iter()
                .filter(|field| field.rule().is_required())
                .map(|field| field.name())
                .collect();
            let removed = required[field_index % required.len()];

            let mut values = valid_values(entity);
            values.remove(removed);
            let errors = validate(entity, &values);

            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(
                errors.get(removed).map(|error| error.kind()),
                Some(ValidationErrorKind::MissingValue)
            );
        }
    }
}
