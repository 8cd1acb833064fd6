//! Validation adapter between raw action input and typed values.

use serde::de::DeserializeOwned;
use serde_json::Value;

use rentline_core::{AppResult, FORM_FIELD, FieldErrors};
use rentline_domain::{EntitySchema, normalize_form};

/// Raw input handed to a mutation action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionInput {
    /// Structured object, such as a JSON request body.
    Object(Value),
    /// Ordered form-encoded key/value pairs.
    Form(Vec<(String, String)>),
}

impl ActionInput {
    /// Converts the input to the raw object a schema validates. Form pairs are
    /// normalized using the schema's field kinds.
    #[must_use]
    pub fn into_raw(self, schema: &EntitySchema) -> Value {
        match self {
            Self::Object(value) => value,
            Self::Form(pairs) => normalize_form(schema, pairs),
        }
    }
}

impl From<Value> for ActionInput {
    fn from(value: Value) -> Self {
        Self::Object(value)
    }
}

/// Validates raw input against a schema and decodes the accepted object.
pub fn validate_input<T>(schema: &EntitySchema, raw: &Value) -> Result<T, FieldErrors>
where
    T: DeserializeOwned,
{
    let accepted = schema.validate(raw)?;

    serde_json::from_value(Value::Object(accepted))
        .map_err(|error| FieldErrors::single(FORM_FIELD, format!("Invalid input: {error}")))
}

/// Normalizes and validates action input, failing with
/// [`rentline_core::AppError::InvalidFields`].
pub fn validate_action_input<T>(schema: &EntitySchema, input: ActionInput) -> AppResult<T>
where
    T: DeserializeOwned,
{
    let raw = input.into_raw(schema);
    Ok(validate_input(schema, &raw)?)
}
