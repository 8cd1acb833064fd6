//! Form-encoded submission normalization.
//!
//! Browser forms deliver every value as a string. The schema's field kinds
//! decide which keys become numbers, booleans or lists before validation runs.

use serde_json::{Map, Number, Value};

use crate::schema::{EntitySchema, FieldKind};

/// Key suffix marking a repeated, list-valued form field.
pub const LIST_MARKER: &str = "[]";

/// Converts ordered form pairs into the raw object a schema validates.
///
/// Empty values are skipped. Keys ending in [`LIST_MARKER`] accumulate into a
/// list under the bare key. Number fields are parsed when the text is numeric
/// and kept as text otherwise, so validation reports the type mismatch.
/// Boolean fields are `true` for `"true"` or `"on"` and `false` for anything
/// else. Repeated scalar keys keep the last value.
#[must_use]
pub fn normalize_form<K, V>(schema: &EntitySchema, pairs: impl IntoIterator<Item = (K, V)>) -> Value
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut object = Map::new();

    for (key, value) in pairs {
        let key = key.as_ref();
        let value = value.as_ref();
        if value.is_empty() {
            continue;
        }

        if let Some(base) = key.strip_suffix(LIST_MARKER) {
            let entry = object
                .entry(base.to_owned())
                .or_insert_with(|| Value::Array(Vec::new()));
            match entry {
                Value::Array(items) => items.push(Value::String(value.to_owned())),
                other => *other = Value::Array(vec![Value::String(value.to_owned())]),
            }
            continue;
        }

        let normalized = match schema.field_kind(key) {
            Some(FieldKind::Number) => parse_number(value),
            Some(FieldKind::Boolean) => Value::Bool(matches!(value, "true" | "on")),
            _ => Value::String(value.to_owned()),
        };
        object.insert(key.to_owned(), normalized);
    }

    Value::Object(object)
}

fn parse_number(value: &str) -> Value {
    let trimmed = value.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::from(integer);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(value.to_owned()), Value::Number)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::normalize_form;
    use crate::schemas::{CREATE_LISTING, UPDATE_LISTING};

    #[test]
    fn coerces_by_declared_kind() {
        let raw = normalize_form(
            &CREATE_LISTING,
            [
                ("title", "Sunny loft"),
                ("price", "1850"),
                ("bathrooms", "1.5"),
                ("parking", "on"),
                ("pet_friendly", "false"),
                ("zip_code", "02134"),
            ],
        );

        assert_eq!(
            raw,
            json!({
                "title": "Sunny loft",
                "price": 1850,
                "bathrooms": 1.5,
                "parking": true,
                "pet_friendly": false,
                "zip_code": "02134",
            })
        );
    }

    #[test]
    fn list_marker_accumulates_in_order() {
        let raw = normalize_form(
            &CREATE_LISTING,
            [
                ("amenities[]", "gym"),
                ("amenities[]", ""),
                ("amenities[]", "pool"),
            ],
        );

        assert_eq!(raw, json!({"amenities": ["gym", "pool"]}));
    }

    #[test]
    fn empty_values_are_absent() {
        let raw = normalize_form(&CREATE_LISTING, [("description", ""), ("price", "")]);
        assert_eq!(raw, json!({}));
    }

    #[test]
    fn non_numeric_text_is_left_for_validation() {
        let raw = normalize_form(&CREATE_LISTING, [("price", "cheap")]);
        assert_eq!(raw, json!({"price": "cheap"}));

        let errors = CREATE_LISTING.validate(&raw).err().unwrap_or_default();
        assert_eq!(
            errors.get("price"),
            Some(["Expected number, received string".to_owned()].as_slice())
        );
    }

    #[test]
    fn moderation_flags_are_booleans_only_on_update() {
        let update = normalize_form(&UPDATE_LISTING, [("approved", "on")]);
        assert_eq!(update, json!({"approved": true}));

        let create = normalize_form(&CREATE_LISTING, [("approved", "on")]);
        assert_eq!(create, json!({"approved": "on"}));
    }

    proptest! {
        #[test]
        fn integer_fields_round_trip(value in any::<i64>()) {
            let text = value.to_string();
            let raw = normalize_form(&CREATE_LISTING, [("parking_fee", text.as_str())]);
            prop_assert_eq!(raw, json!({"parking_fee": value}));
        }

        #[test]
        fn boolean_fields_only_accept_true_or_on(text in "[a-z]{1,8}") {
            let raw = normalize_form(&CREATE_LISTING, [("parking", text.as_str())]);
            let expected = text == "true" || text == "on";
            prop_assert_eq!(raw, json!({"parking": expected}));
        }

        #[test]
        fn text_fields_are_never_coerced(text in "[0-9a-z ]{1,16}") {
            let raw = normalize_form(&CREATE_LISTING, [("city", text.as_str())]);
            prop_assert_eq!(raw, json!({"city": text}));
        }
    }
}
