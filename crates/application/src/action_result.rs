use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::error;

use rentline_core::{AppError, AppResult, FieldErrors};

/// Message returned when a failure carries nothing safe to show.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Uniform outcome of a mutation action.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": ..., "fieldErrors": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    /// Action committed.
    Success(T),
    /// Action failed; nothing was changed.
    Failure {
        /// Human-readable message.
        error: String,
        /// Per-field messages for schema validation failures.
        field_errors: Option<FieldErrors>,
    },
}

impl<T> ActionResult<T> {
    /// Converts an action outcome, logging failures once under the action name.
    pub fn from_result(action: &str, result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(app_error) => {
                error!(action, error = %app_error, "action failed");
                Self::from_error(app_error)
            }
        }
    }

    /// Converts an error into the failure shape.
    #[must_use]
    pub fn from_error(app_error: AppError) -> Self {
        match app_error {
            AppError::InvalidFields(field_errors) => Self::Failure {
                error: "Validation failed".to_owned(),
                field_errors: Some(field_errors),
            },
            AppError::Internal(_) => Self::Failure {
                error: UNEXPECTED_ERROR_MESSAGE.to_owned(),
                field_errors: None,
            },
            other => {
                let message = other.message();
                Self::Failure {
                    error: if message.trim().is_empty() {
                        UNEXPECTED_ERROR_MESSAGE.to_owned()
                    } else {
                        message
                    },
                    field_errors: None,
                }
            }
        }
    }

    /// Returns whether the action committed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success(data) => {
                let mut state = serializer.serialize_struct("ActionResult", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            Self::Failure {
                error,
                field_errors,
            } => {
                let field_count = if field_errors.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct("ActionResult", field_count)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                if let Some(field_errors) = field_errors {
                    state.serialize_field("fieldErrors", field_errors)?;
                } else {
                    state.skip_field("fieldErrors")?;
                }
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use rentline_core::{AppError, FieldErrors};

    use super::ActionResult;

    #[test]
    fn success_wraps_data() {
        let result = ActionResult::from_result("delete listing", Ok(json!({"id": "abc"})));

        assert!(result.is_success());
        assert_eq!(
            serde_json::to_value(&result).unwrap_or_default(),
            json!({"success": true, "data": {"id": "abc"}})
        );
    }

    #[test]
    fn validation_failure_carries_field_errors() {
        let result = ActionResult::<()>::from_result(
            "create listing",
            Err(AppError::InvalidFields(FieldErrors::single(
                "price",
                "Price must be positive",
            ))),
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap_or_default(),
            json!({
                "success": false,
                "error": "Validation failed",
                "fieldErrors": {"price": ["Price must be positive"]},
            })
        );
    }

    #[test]
    fn other_failures_expose_their_message_only() {
        let result = ActionResult::<()>::from_result(
            "approve listing",
            Err(AppError::Forbidden("Only admins can approve listings".to_owned())),
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap_or_default(),
            json!({"success": false, "error": "Only admins can approve listings"})
        );
    }

    #[test]
    fn internal_and_empty_failures_use_fallback_message() {
        for error in [
            AppError::Internal("pool timed out".to_owned()),
            AppError::Remote(String::new()),
        ] {
            let result = ActionResult::<()>::from_error(error);
            assert!(matches!(
                result,
                ActionResult::Failure { ref error, field_errors: None }
                    if error == "An unexpected error occurred"
            ));
        }
    }
}
