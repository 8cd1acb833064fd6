use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Field path used when a failure is not attached to any single field.
pub const FORM_FIELD: &str = "form";

/// Mapping from field path to the validation messages raised for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a map holding one message for one field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Appends a message for a field path. An empty path is recorded under [`FORM_FIELD`].
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let field = if field.is_empty() {
            FORM_FIELD.to_owned()
        } else {
            field
        };

        self.0.entry(field).or_default().push(message.into());
    }

    /// Returns whether no messages were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for a field path.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns whether a field path has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterates over field paths and their messages in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                formatter.write_str("; ")?;
            }
            first = false;
            write!(formatter, "{field}: {}", messages.join(", "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FORM_FIELD, FieldErrors};

    #[test]
    fn empty_path_is_recorded_as_form() {
        let mut errors = FieldErrors::new();
        errors.push("", "passwords do not match");

        assert_eq!(
            errors.get(FORM_FIELD),
            Some(["passwords do not match".to_owned()].as_slice())
        );
    }

    #[test]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("title", "Title must be at least 5 characters");
        errors.push("title", "Expected string");
        errors.push("city", "City is required");

        assert_eq!(errors.get("title").map(<[String]>::len), Some(2));
        assert_eq!(
            errors.to_string(),
            "city: City is required; title: Title must be at least 5 characters, Expected string"
        );
    }

    #[test]
    fn serializes_as_plain_object() {
        let errors = FieldErrors::single("price", "Price must be positive");
        let encoded = serde_json::to_value(&errors).unwrap_or_default();
        assert_eq!(
            encoded,
            serde_json::json!({"price": ["Price must be positive"]})
        );
    }
}
