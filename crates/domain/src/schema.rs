//! Declarative validation schemas.
//!
//! A schema is a table of [`FieldRule`]s. The same table drives form
//! normalization (through [`FieldKind`]) and validation, so create and update
//! actions cannot drift apart on how a field is typed.

use rentline_core::{FORM_FIELD, FieldErrors};
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

/// Structural kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// UTF-8 string.
    Text,
    /// JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// Ordered list of strings.
    List,
}

impl FieldKind {
    /// Returns the name used in type mismatch messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::List => "array",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::List => value.is_array(),
        }
    }
}

/// Value a field takes when it is absent from full (non-partial) input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Int(i64),
    /// Text default.
    Text(&'static str),
    /// Empty list default.
    EmptyList,
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            Self::Bool(value) => Value::Bool(value),
            Self::Int(value) => Value::from(value),
            Self::Text(value) => Value::String(value.to_owned()),
            Self::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// How a field behaves when missing or null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    /// Must be present and non-null.
    Required,
    /// May be missing or null.
    Optional,
    /// Takes the default when missing; null is rejected.
    Defaulted(DefaultValue),
}

/// Semantic constraint applied after the kind check passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// Minimum string length in characters.
    MinLength(usize, &'static str),
    /// Maximum string length in characters.
    MaxLength(usize, &'static str),
    /// Number must be integral. Integral values are canonicalized to JSON integers.
    Integer,
    /// Number must be strictly greater than zero.
    Positive(&'static str),
    /// Number must be zero or greater.
    NonNegative(&'static str),
    /// String must look like an email address.
    Email(&'static str),
    /// String must be an absolute URL.
    Url(&'static str),
    /// String must be a UUID.
    Uuid(&'static str),
    /// String must be one of the listed values.
    OneOf(&'static [&'static str]),
    /// Every list item must be an absolute URL.
    EachUrl(&'static str),
}

/// One row of a schema table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    name: &'static str,
    kind: FieldKind,
    presence: Presence,
    checks: &'static [Check],
}

impl FieldRule {
    /// Declares a field that must be present.
    #[must_use]
    pub const fn required(name: &'static str, kind: FieldKind, checks: &'static [Check]) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
            checks,
        }
    }

    /// Declares a field that may be missing or null.
    #[must_use]
    pub const fn optional(name: &'static str, kind: FieldKind, checks: &'static [Check]) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
            checks,
        }
    }

    /// Declares a field that falls back to a default when missing.
    #[must_use]
    pub const fn defaulted(
        name: &'static str,
        kind: FieldKind,
        default: DefaultValue,
        checks: &'static [Check],
    ) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Defaulted(default),
            checks,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the presence rule.
    #[must_use]
    pub fn presence(&self) -> Presence {
        self.presence
    }

    fn validate_present(&self, value: &Value, errors: &mut FieldErrors) -> Option<Value> {
        if !self.kind.accepts(value) {
            errors.push(
                self.name,
                format!(
                    "Expected {}, received {}",
                    self.kind.as_str(),
                    json_type_name(value)
                ),
            );
            return None;
        }

        if let Value::Array(items) = value {
            let mut item_type_failed = false;
            for (index, item) in items.iter().enumerate() {
                if !item.is_string() {
                    item_type_failed = true;
                    errors.push(
                        format!("{}.{index}", self.name),
                        format!("Expected string, received {}", json_type_name(item)),
                    );
                }
            }
            if item_type_failed {
                return None;
            }
        }

        let mut accepted = value.clone();
        let mut failed = false;
        for check in self.checks {
            match check.apply(self.name, value, errors) {
                CheckOutcome::Passed => {}
                CheckOutcome::Canonical(canonical) => accepted = canonical,
                CheckOutcome::Failed => failed = true,
            }
        }

        (!failed).then_some(accepted)
    }
}

enum CheckOutcome {
    Passed,
    Canonical(Value),
    Failed,
}

impl Check {
    fn apply(&self, field: &str, value: &Value, errors: &mut FieldErrors) -> CheckOutcome {
        let outcome = match (self, value) {
            (Self::MinLength(min, message), Value::String(text)) => {
                (text.chars().count() >= *min).then_some(()).ok_or(*message)
            }
            (Self::MaxLength(max, message), Value::String(text)) => {
                (text.chars().count() <= *max).then_some(()).ok_or(*message)
            }
            (Self::Email(message), Value::String(text)) => {
                looks_like_email(text).then_some(()).ok_or(*message)
            }
            (Self::Url(message), Value::String(text)) => {
                Url::parse(text).is_ok().then_some(()).ok_or(*message)
            }
            (Self::Uuid(message), Value::String(text)) => {
                Uuid::parse_str(text).is_ok().then_some(()).ok_or(*message)
            }
            (Self::OneOf(allowed), Value::String(text)) => {
                if allowed.contains(&text.as_str()) {
                    Ok(())
                } else {
                    errors.push(
                        field,
                        format!(
                            "Invalid enum value. Expected {}, received '{text}'",
                            allowed
                                .iter()
                                .map(|value| format!("'{value}'"))
                                .collect::<Vec<_>>()
                                .join(" | ")
                        ),
                    );
                    return CheckOutcome::Failed;
                }
            }
            (Self::EachUrl(message), Value::Array(items)) => {
                let mut failed = false;
                for (index, item) in items.iter().enumerate() {
                    let is_url = item.as_str().is_some_and(|text| Url::parse(text).is_ok());
                    if !is_url {
                        failed = true;
                        errors.push(format!("{field}.{index}"), *message);
                    }
                }
                return if failed {
                    CheckOutcome::Failed
                } else {
                    CheckOutcome::Passed
                };
            }
            (Self::Integer, Value::Number(number)) => {
                if number.is_i64() || number.is_u64() {
                    Ok(())
                } else {
                    match number.as_f64() {
                        Some(float) if float.fract() == 0.0 => {
                            return CheckOutcome::Canonical(Value::from(float as i64));
                        }
                        _ => Err("Expected integer, received float"),
                    }
                }
            }
            (Self::Positive(message), Value::Number(number)) => number
                .as_f64()
                .is_some_and(|float| float > 0.0)
                .then_some(())
                .ok_or(*message),
            (Self::NonNegative(message), Value::Number(number)) => number
                .as_f64()
                .is_some_and(|float| float >= 0.0)
                .then_some(())
                .ok_or(*message),
            _ => Ok(()),
        };

        match outcome {
            Ok(()) => CheckOutcome::Passed,
            Err(message) => {
                errors.push(field, message);
                CheckOutcome::Failed
            }
        }
    }
}

/// A named table of field rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySchema {
    name: &'static str,
    groups: &'static [&'static [FieldRule]],
    partial: bool,
}

impl EntitySchema {
    /// Creates a full schema from one or more rule groups.
    #[must_use]
    pub const fn new(name: &'static str, groups: &'static [&'static [FieldRule]]) -> Self {
        Self {
            name,
            groups,
            partial: false,
        }
    }

    /// Derives the update variant: every field optional, no defaults, same checks.
    #[must_use]
    pub const fn partial(self) -> Self {
        Self {
            partial: true,
            ..self
        }
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether this is the partial (update) variant.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Iterates over every rule in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldRule> {
        self.groups.iter().flat_map(|group| group.iter())
    }

    /// Looks up a rule by field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldRule> {
        self.fields().find(|rule| rule.name == name)
    }

    /// Returns the kind declared for a field name.
    #[must_use]
    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(FieldRule::kind)
    }

    /// Validates raw input, returning the accepted object with defaults applied
    /// and unknown keys removed, or every failure keyed by field path.
    pub fn validate(&self, raw: &Value) -> Result<Map<String, Value>, FieldErrors> {
        let Some(input) = raw.as_object() else {
            return Err(FieldErrors::single(
                FORM_FIELD,
                format!("Expected object, received {}", json_type_name(raw)),
            ));
        };

        let mut errors = FieldErrors::new();
        let mut accepted = Map::new();

        for rule in self.fields() {
            match input.get(rule.name) {
                None => {
                    if self.partial {
                        continue;
                    }
                    match rule.presence {
                        Presence::Required => errors.push(rule.name, "Required"),
                        Presence::Optional => {}
                        Presence::Defaulted(default) => {
                            accepted.insert(rule.name.to_owned(), default.to_value());
                        }
                    }
                }
                Some(Value::Null) if rule.presence == Presence::Optional => {
                    accepted.insert(rule.name.to_owned(), Value::Null);
                }
                Some(value) => {
                    if let Some(value) = rule.validate_present(value, &mut errors) {
                        accepted.insert(rule.name.to_owned(), value);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(accepted)
        } else {
            Err(errors)
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, suffix)| !host.is_empty() && !suffix.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Check, DefaultValue, EntitySchema, FieldKind, FieldRule};

    const WIDGET_FIELDS: &[FieldRule] = &[
        FieldRule::required(
            "name",
            FieldKind::Text,
            &[Check::MinLength(3, "Name is too short")],
        ),
        FieldRule::optional(
            "size",
            FieldKind::Number,
            &[Check::Integer, Check::Positive("Size must be positive")],
        ),
        FieldRule::defaulted(
            "enabled",
            FieldKind::Boolean,
            DefaultValue::Bool(false),
            &[],
        ),
        FieldRule::defaulted(
            "links",
            FieldKind::List,
            DefaultValue::EmptyList,
            &[Check::EachUrl("Invalid link")],
        ),
    ];

    const WIDGET: EntitySchema = EntitySchema::new("widget", &[WIDGET_FIELDS]);

    #[test]
    fn applies_defaults_and_drops_unknown_keys() {
        let accepted = WIDGET.validate(&json!({"name": "gear", "colour": "red"}));

        assert_eq!(
            accepted.map(serde_json::Value::Object).ok(),
            Some(json!({"name": "gear", "enabled": false, "links": []}))
        );
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = WIDGET
            .validate(&json!({"size": -2.5, "links": ["nope"]}))
            .err()
            .unwrap_or_default();

        assert_eq!(errors.get("name"), Some(["Required".to_owned()].as_slice()));
        assert_eq!(
            errors.get("size"),
            Some(
                [
                    "Expected integer, received float".to_owned(),
                    "Size must be positive".to_owned()
                ]
                .as_slice()
            )
        );
        assert_eq!(
            errors.get("links.0"),
            Some(["Invalid link".to_owned()].as_slice())
        );
    }

    #[test]
    fn canonicalizes_integral_floats() {
        let accepted = WIDGET.validate(&json!({"name": "gear", "size": 4.0}));
        let size = accepted.ok().and_then(|object| object.get("size").cloned());

        assert_eq!(size, Some(json!(4)));
        assert!(size.is_some_and(|value| value.is_i64()));
    }

    #[test]
    fn type_mismatch_names_both_types() {
        let errors = WIDGET
            .validate(&json!({"name": 12}))
            .err()
            .unwrap_or_default();

        assert_eq!(
            errors.get("name"),
            Some(["Expected string, received number".to_owned()].as_slice())
        );
    }

    #[test]
    fn partial_schema_skips_required_and_defaults() {
        let accepted = WIDGET.partial().validate(&json!({"size": 3}));

        assert_eq!(
            accepted.map(serde_json::Value::Object).ok(),
            Some(json!({"size": 3}))
        );
    }

    #[test]
    fn partial_schema_keeps_field_checks() {
        let errors = WIDGET
            .partial()
            .validate(&json!({"name": "ab"}))
            .err()
            .unwrap_or_default();

        assert!(errors.contains("name"));
    }

    #[test]
    fn optional_fields_accept_null_but_defaulted_do_not() {
        assert!(
            WIDGET
                .validate(&json!({"name": "gear", "size": null}))
                .is_ok()
        );
        assert!(
            WIDGET
                .validate(&json!({"name": "gear", "enabled": null}))
                .is_err()
        );
    }

    #[test]
    fn non_object_input_is_a_form_error() {
        let errors = WIDGET.validate(&json!([1, 2])).err().unwrap_or_default();
        assert!(errors.contains("form"));
    }
}
